//! Integration tests for the HTTP analysis client.
//!
//! Each test starts an in-process fake analysis service on an ephemeral port
//! and drives the real reqwest adapter against it:
//! 1. Multipart upload and clause payload parsing
//! 2. JSON question answering
//! 3. Non-success statuses, malformed bodies and unreachable hosts
//! 4. The full workflow and chat gateway over the wire

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use tldr_analyzer::adapters::HttpAnalysisClient;
use tldr_analyzer::application::{
    AnalysisWorkflow, ChatGateway, ChatReply, ChatResponder, RunOutcome, WorkflowOptions,
};
use tldr_analyzer::config::ServiceConfig;
use tldr_analyzer::domain::policy::{
    AnalysisError, Document, PipelineState, RiskTier, CHAT_FAILURE_MESSAGE,
};
use tldr_analyzer::ports::AnalysisClient;

// =============================================================================
// Fake analysis service
// =============================================================================

#[derive(Debug, Clone, Default)]
struct Upload {
    field: String,
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

#[derive(Clone, Default)]
struct Recorded {
    uploads: Arc<Mutex<Vec<Upload>>>,
    queries: Arc<Mutex<Vec<String>>>,
}

fn sample_clauses() -> Value {
    json!({
        "clauses": [
            {
                "clause": "Flood damage is excluded.",
                "prediction": {"risk": "high", "explanation": "Common peril not covered", "category": "Exclusions"}
            },
            {
                "clause": "Claims must be filed within 30 days.",
                "prediction": {"risk": "moderate", "explanation": "Short window", "category": "Claims"}
            },
            {
                "clause": "Glass breakage covered in full.",
                "prediction": {"risk": "low", "explanation": "Favourable", "category": "Coverage"}
            }
        ],
        "extracted_text_file": "policy.txt"
    })
}

async fn extract(State(recorded): State<Recorded>, mut multipart: Multipart) -> Json<Value> {
    while let Ok(Some(field)) = multipart.next_field().await {
        let upload = Upload {
            field: field.name().unwrap_or_default().to_string(),
            file_name: field.file_name().map(str::to_string),
            content_type: field.content_type().map(str::to_string),
            bytes: field.bytes().await.map(|b| b.to_vec()).unwrap_or_default(),
        };
        recorded.uploads.lock().unwrap().push(upload);
    }
    Json(sample_clauses())
}

async fn answer(State(recorded): State<Recorded>, Json(body): Json<Value>) -> Json<Value> {
    let query = body["query"].as_str().unwrap_or_default().to_string();
    recorded.queries.lock().unwrap().push(query.clone());

    let answer = if query.contains("Summarize") {
        "**Dwelling** coverage up to __$300,000__."
    } else {
        "Flood is *not* covered."
    };
    Json(json!({ "answer": answer }))
}

fn healthy_service(recorded: Recorded) -> Router {
    Router::new()
        .route("/extract-text/", post(extract))
        .route("/ask-question/", post(answer))
        .with_state(recorded)
}

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client_for(base_url: String) -> HttpAnalysisClient {
    let config = ServiceConfig {
        base_url,
        timeout_secs: 5,
        ..Default::default()
    };
    HttpAnalysisClient::new(&config).unwrap()
}

fn policy() -> Document {
    Document::new("home_policy.pdf", b"%PDF-1.4 policy body".to_vec()).unwrap()
}

// =============================================================================
// Adapter contract
// =============================================================================

#[tokio::test]
async fn extract_uploads_document_as_multipart_file() {
    let recorded = Recorded::default();
    let base = spawn(healthy_service(recorded.clone())).await;
    let client = client_for(base);

    let clauses = client.extract_clauses(&policy()).await.unwrap();

    assert_eq!(clauses.len(), 3);
    assert_eq!(clauses[0].text, "Flood damage is excluded.");
    assert_eq!(clauses[0].risk, "high");
    assert_eq!(clauses[1].category, "Claims");
    assert_eq!(clauses[2].explanation, "Favourable");

    let uploads = recorded.uploads.lock().unwrap().clone();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].field, "file");
    assert_eq!(uploads[0].file_name.as_deref(), Some("home_policy.pdf"));
    assert_eq!(uploads[0].content_type.as_deref(), Some("application/pdf"));
    assert_eq!(uploads[0].bytes, b"%PDF-1.4 policy body");
}

#[tokio::test]
async fn ask_posts_query_and_returns_raw_answer() {
    let recorded = Recorded::default();
    let base = spawn(healthy_service(recorded.clone())).await;
    let client = client_for(base);

    let answer = client.ask_question("Is flood covered?").await.unwrap();

    assert_eq!(answer, "Flood is *not* covered.");
    assert_eq!(*recorded.queries.lock().unwrap(), vec!["Is flood covered?"]);
}

#[tokio::test]
async fn trailing_slash_on_base_url_is_tolerated() {
    let base = spawn(healthy_service(Recorded::default())).await;
    let client = client_for(format!("{}/", base));

    assert!(client.ask_question("hello").await.is_ok());
}

#[tokio::test]
async fn server_error_on_extract_is_a_transport_failure() {
    let app = Router::new().route(
        "/extract-text/",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model offline") }),
    );
    let client = client_for(spawn(app).await);

    let err = client.extract_clauses(&policy()).await.unwrap_err();

    assert!(matches!(err, AnalysisError::ExtractionFailed { .. }));
    assert!(err.is_transport());
    assert!(err.to_string().contains("500"));
    assert!(err.to_string().contains("model offline"));
}

#[tokio::test]
async fn server_error_on_ask_is_a_query_failure() {
    let app = Router::new().route(
        "/ask-question/",
        post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "busy") }),
    );
    let client = client_for(spawn(app).await);

    let err = client.ask_question("anything").await.unwrap_err();

    assert!(matches!(err, AnalysisError::QueryFailed { .. }));
}

#[tokio::test]
async fn clause_missing_prediction_is_malformed() {
    let app = Router::new().route(
        "/extract-text/",
        post(|| async {
            Json(json!({
                "clauses": [
                    {"clause": "ok", "prediction": {"risk": "low", "explanation": "e", "category": "c"}},
                    {"clause": "no prediction"}
                ]
            }))
        }),
    );
    let client = client_for(spawn(app).await);

    let err = client.extract_clauses(&policy()).await.unwrap_err();

    assert!(matches!(err, AnalysisError::MalformedResponse { .. }));
    assert!(err.to_string().contains("clause 1"));
    assert!(!err.is_transport());
}

#[tokio::test]
async fn missing_clauses_field_is_malformed() {
    let app = Router::new().route(
        "/extract-text/",
        post(|| async { Json(json!({ "extracted_text_file": "x.txt" })) }),
    );
    let client = client_for(spawn(app).await);

    let err = client.extract_clauses(&policy()).await.unwrap_err();

    assert!(matches!(err, AnalysisError::MalformedResponse { .. }));
}

#[tokio::test]
async fn unparseable_answer_is_a_query_failure() {
    let app = Router::new().route("/ask-question/", post(|| async { "not json" }));
    let client = client_for(spawn(app).await);

    let err = client.ask_question("anything").await.unwrap_err();

    assert!(matches!(err, AnalysisError::QueryFailed { .. }));
}

#[tokio::test]
async fn unreachable_service_is_a_transport_failure() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let client = client_for(format!("http://{}", addr));

    let err = client.extract_clauses(&policy()).await.unwrap_err();

    assert!(err.is_transport());
}

// =============================================================================
// Workflow over the wire
// =============================================================================

#[tokio::test]
async fn workflow_publishes_result_from_live_service() {
    let recorded = Recorded::default();
    let base = spawn(healthy_service(recorded.clone())).await;
    let client: Arc<dyn AnalysisClient> = Arc::new(client_for(base));
    let workflow = Arc::new(AnalysisWorkflow::new(
        Arc::clone(&client),
        WorkflowOptions::default(),
    ));

    let outcome = workflow.submit(policy()).await;

    let result = match outcome {
        RunOutcome::Ready(result) => result,
        other => panic!("expected ready, got {:?}", other),
    };
    assert_eq!(workflow.state(), PipelineState::Ready);
    assert_eq!(result.summary(), "Dwelling coverage up to $300,000.");
    assert_eq!(result.count(RiskTier::High), 1);
    assert_eq!(result.count(RiskTier::Moderate), 1);
    assert_eq!(result.count(RiskTier::Low), 1);

    let gateway = ChatGateway::new(
        Arc::clone(&workflow),
        ChatResponder::Live(client),
        Duration::from_secs(5),
    );
    let reply = gateway.ask("Is flood covered?").await.unwrap();
    assert!(matches!(reply, ChatReply::Answered(ref turn) if turn.content == "Flood is *not* covered."));

    let queries = recorded.queries.lock().unwrap().clone();
    assert_eq!(queries.len(), 2);
    assert_eq!(queries[1], "Is flood covered?");
}

#[tokio::test]
async fn chat_falls_back_when_service_errors() {
    let app = Router::new().route(
        "/ask-question/",
        post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let client: Arc<dyn AnalysisClient> = Arc::new(client_for(spawn(app).await));
    let workflow = Arc::new(AnalysisWorkflow::new(
        Arc::clone(&client),
        WorkflowOptions::default(),
    ));
    let gateway = ChatGateway::new(
        Arc::clone(&workflow),
        ChatResponder::Live(client),
        Duration::from_secs(5),
    );

    let reply = gateway.ask("Is flood covered?").await.unwrap();

    assert!(matches!(reply, ChatReply::Fallback(_)));
    assert_eq!(
        workflow.transcript().last().map(|t| t.content.as_str()),
        Some(CHAT_FAILURE_MESSAGE)
    );
    assert_eq!(workflow.state(), PipelineState::Idle);
}
