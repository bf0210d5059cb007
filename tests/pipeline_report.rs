//! End-to-end: document selection through to the exported report.
//!
//! Runs the workflow against the in-process mock service, then composes and
//! renders the report exactly as the CLI does.

use std::sync::Arc;
use std::time::Duration;

use tldr_analyzer::adapters::{MockAnalysisClient, PdfReportRenderer, TextReportRenderer};
use tldr_analyzer::application::{
    AnalysisWorkflow, ExportReportHandler, RunOutcome, WorkflowOptions,
};
use tldr_analyzer::domain::foundation::Timestamp;
use tldr_analyzer::domain::policy::{
    AnalysisError, Document, ExtractedClause, PipelineState, RiskTier, PIPELINE_FAILURE_MESSAGE,
};
use tldr_analyzer::domain::report::{ReportComposer, FOOTER_TEXT, SUMMARY_HEADING};
use tldr_analyzer::ports::ExportError;

fn generated_at() -> Timestamp {
    Timestamp::from_unix_secs(1_718_000_000)
}

fn workflow(client: MockAnalysisClient) -> AnalysisWorkflow {
    AnalysisWorkflow::new(Arc::new(client), WorkflowOptions::default())
}

fn health_policy() -> Document {
    Document::new("health_plan.pdf", b"%PDF-1.4 health plan".to_vec()).unwrap()
}

#[tokio::test]
async fn single_high_risk_clause_flows_into_report() {
    let client = MockAnalysisClient::new()
        .with_clauses(vec![ExtractedClause::new(
            "Pre-existing conditions excluded for 12 months",
            "high",
            "12-month wait",
            "Pre-existing",
        )])
        .with_answer("**Summary** text");
    let workflow = workflow(client);
    let doc = health_policy();

    let result = match workflow.submit(doc.clone()).await {
        RunOutcome::Ready(result) => result,
        other => panic!("expected ready, got {:?}", other),
    };

    let buckets = result.buckets();
    assert_eq!(buckets.high().len(), 1);
    assert_eq!(buckets.high()[0].id(), 0);
    assert!(buckets.moderate().is_empty());
    assert!(buckets.low().is_empty());
    assert_eq!(result.summary(), "Summary text");

    let report = ReportComposer::new().compose(&doc, &result, generated_at());
    assert_eq!(report.sections.len(), 1);
    let high = report.section(RiskTier::High).unwrap();
    assert_eq!(high.rows.len(), 1);
    assert_eq!(high.rows[0].index, 1);
    assert_eq!(high.rows[0].risk_label, "High");
    assert!(report.section(RiskTier::Moderate).is_none());
    assert!(report.section(RiskTier::Low).is_none());

    let text = report.all_text();
    assert!(text.contains(&"HIGH-RISK CLAUSES:"));
    assert!(!text.contains(&"MODERATE-RISK CLAUSES:"));
    assert!(!text.contains(&"LOW-RISK CLAUSES:"));

    let exporter = ExportReportHandler::new(Arc::new(PdfReportRenderer::new()));
    let exported = exporter.handle(&workflow, generated_at()).unwrap();
    assert_eq!(exported.filename, "TLDR_Report_health_plan.pdf");

    let pdf = lopdf::Document::load_mem(&exported.content).unwrap();
    assert_eq!(pdf.get_pages().len(), report.page_count());
    let raw = String::from_utf8_lossy(&exported.content);
    assert!(raw.contains("Pre-existing conditions excluded for 12 months"));
}

#[tokio::test]
async fn zero_clauses_still_render_summary_and_footer() {
    let client = MockAnalysisClient::new()
        .with_clauses(Vec::new())
        .with_answer("Nothing notable.");
    let workflow = workflow(client);
    let doc = health_policy();

    let result = match workflow.submit(doc.clone()).await {
        RunOutcome::Ready(result) => result,
        other => panic!("expected ready, got {:?}", other),
    };
    let report = ReportComposer::new().compose(&doc, &result, generated_at());

    assert!(report.sections.is_empty());
    let text = report.all_text();
    assert!(text.contains(&SUMMARY_HEADING));
    assert!(text.contains(&"Nothing notable."));
    assert!(text.contains(&FOOTER_TEXT));
    assert!(!text.iter().any(|t| t.ends_with("RISK CLAUSES:")));
}

#[tokio::test]
async fn summarization_failure_leaves_nothing_to_export() {
    let client = MockAnalysisClient::new()
        .with_clauses(vec![ExtractedClause::new("c", "low", "e", "k")])
        .with_ask_error(AnalysisError::query_failed("service returned 500"));
    let workflow = workflow(client);

    let outcome = workflow.submit(health_policy()).await;

    assert!(matches!(outcome, RunOutcome::Failed(AnalysisError::QueryFailed { .. })));
    assert_eq!(workflow.state(), PipelineState::Failed);
    assert!(workflow.result().is_none());
    assert_eq!(
        workflow.failure_message().as_deref(),
        Some(PIPELINE_FAILURE_MESSAGE)
    );

    let exporter = ExportReportHandler::new(Arc::new(PdfReportRenderer::new()));
    assert!(matches!(
        exporter.handle(&workflow, generated_at()),
        Err(ExportError::NoResult)
    ));
}

#[tokio::test]
async fn newer_document_wins_the_exported_report() {
    let client = MockAnalysisClient::new()
        .with_clauses_after(
            vec![ExtractedClause::new("Old clause", "high", "e", "k")],
            Duration::from_millis(200),
        )
        .with_clauses(vec![ExtractedClause::new("New clause", "low", "e", "k")])
        .with_answer("New summary");
    let workflow = Arc::new(workflow(client));

    let first = {
        let workflow = Arc::clone(&workflow);
        tokio::spawn(async move {
            let doc = Document::new("old.pdf", b"old".to_vec()).unwrap();
            workflow.submit(doc).await
        })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    let second = workflow
        .submit(Document::new("new.pdf", b"new".to_vec()).unwrap())
        .await;

    assert!(second.is_ready());
    assert!(matches!(first.await.unwrap(), RunOutcome::Superseded));
    assert_eq!(workflow.state(), PipelineState::Ready);

    let exporter = ExportReportHandler::new(Arc::new(TextReportRenderer::new()));
    let exported = exporter.handle(&workflow, generated_at()).unwrap();
    let text = String::from_utf8(exported.content).unwrap();

    assert_eq!(exported.filename, "TLDR_Report_new.txt");
    assert!(text.contains("New clause"));
    assert!(text.contains("New summary"));
    assert!(!text.contains("Old clause"));
}
