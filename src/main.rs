//! TLDR command-line front end
//!
//! Analyzes a policy document against the configured analysis service, prints
//! the summary and clause panel, writes the report and optionally opens a chat
//! about the document.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use tldr_analyzer::adapters::{HttpAnalysisClient, PdfReportRenderer, TextReportRenderer};
use tldr_analyzer::application::{
    AnalysisWorkflow, ChatGateway, ChatReply, ExportReportHandler, RunOutcome, WorkflowOptions,
};
use tldr_analyzer::config::AppConfig;
use tldr_analyzer::domain::foundation::Timestamp;
use tldr_analyzer::domain::policy::{AnalysisResult, Document, RiskTier};
use tldr_analyzer::ports::{AnalysisClient, ExportFormat, ReportRenderer};

#[derive(Parser)]
#[command(name = "tldr")]
#[command(about = "TLDR - Insurance policy simplification", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a policy document and write its report
    Analyze {
        /// Policy file (.pdf, .txt, .doc, .docx)
        file: PathBuf,
        /// Directory for the report (defaults to the configured output dir)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
        /// Report format: pdf or text
        #[arg(short, long, default_value = "pdf")]
        format: ExportFormat,
        /// Ask questions about the document afterwards (one per line on stdin)
        #[arg(long)]
        chat: bool,
    },
    /// Ask the analysis service a single question
    Ask {
        /// The question
        question: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = config.validate() {
        eprintln!("invalid configuration: {}", e);
        return ExitCode::FAILURE;
    }
    config.logging.init();

    let result = match cli.command {
        Commands::Analyze {
            file,
            output_dir,
            format,
            chat,
        } => {
            let output_dir = output_dir.unwrap_or_else(|| config.report.output_dir.clone());
            analyze(&config, file, output_dir, format, chat).await
        }
        Commands::Ask { question } => ask(&config, &question).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn build_client(config: &AppConfig) -> Result<Arc<dyn AnalysisClient>, Box<dyn std::error::Error>> {
    let client = HttpAnalysisClient::new(&config.service)?;
    Ok(Arc::new(client))
}

fn build_workflow(config: &AppConfig, client: Arc<dyn AnalysisClient>) -> Arc<AnalysisWorkflow> {
    let options = WorkflowOptions::from_config(&config.service, &config.chat);
    Arc::new(AnalysisWorkflow::new(client, options))
}

async fn analyze(
    config: &AppConfig,
    file: PathBuf,
    output_dir: PathBuf,
    format: ExportFormat,
    chat: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let content = tokio::fs::read(&file).await?;
    let doc = Document::new(name, content)?;

    let client = build_client(config)?;
    let workflow = build_workflow(config, Arc::clone(&client));

    println!("Analyzing {} ...", doc.name());
    let result = match workflow.submit(doc).await {
        RunOutcome::Ready(result) => result,
        RunOutcome::Failed(err) => {
            tracing::debug!(error = %err, "analysis failed");
            let message = workflow.failure_message().unwrap_or_else(|| err.to_string());
            return Err(message.into());
        }
        RunOutcome::Superseded => return Err("analysis was superseded".into()),
    };

    print_result(&result);

    let renderer: Arc<dyn ReportRenderer> = match format {
        ExportFormat::Pdf => Arc::new(PdfReportRenderer::new()),
        ExportFormat::Text => Arc::new(TextReportRenderer::new()),
    };
    let exporter = ExportReportHandler::new(renderer);
    let report = exporter.handle(&workflow, Timestamp::now())?;
    let path = exporter.write_to(&report, &output_dir)?;
    println!("\nReport written to {}", path.display());

    if chat {
        let gateway = ChatGateway::from_config(
            &config.chat,
            Arc::clone(&workflow),
            client,
            None,
            config.service.timeout(),
        );
        chat_loop(&workflow, &gateway).await?;
    }

    Ok(())
}

async fn ask(config: &AppConfig, question: &str) -> Result<(), Box<dyn std::error::Error>> {
    let client = build_client(config)?;
    let workflow = build_workflow(config, Arc::clone(&client));
    let gateway = ChatGateway::from_config(
        &config.chat,
        workflow,
        client,
        None,
        config.service.timeout(),
    );

    if let Some(turn) = gateway.ask(question).await?.turn() {
        println!("{}", turn.content);
    }
    Ok(())
}

async fn chat_loop(
    workflow: &AnalysisWorkflow,
    gateway: &ChatGateway,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(greeting) = workflow.transcript().first() {
        println!("\n{}", greeting.content);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match gateway.ask(&line).await? {
            ChatReply::Answered(turn) | ChatReply::Fallback(turn) => {
                println!("[{}] {}\n", turn.timestamp.time_label(), turn.content)
            }
            ChatReply::Discarded => {}
        }
    }
    Ok(())
}

fn print_result(result: &AnalysisResult) {
    println!("\nEXECUTIVE SUMMARY\n");
    println!("{}", result.summary());

    println!(
        "\nClauses: {} high, {} moderate, {} low",
        result.count(RiskTier::High),
        result.count(RiskTier::Moderate),
        result.count(RiskTier::Low),
    );
    for entry in result.clause_panel() {
        println!(
            "\n[{}] {} ({})\n  {}\n  {}",
            entry.id + 1,
            entry.badge,
            entry.category,
            entry.text,
            entry.explanation
        );
    }
}
