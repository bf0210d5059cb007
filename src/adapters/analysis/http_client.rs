//! HTTP Analysis Client - reqwest implementation of the AnalysisClient port.
//!
//! # Endpoints
//!
//! - `POST {base}/extract-text/` multipart upload, field `file`, answered with
//!   `{ "clauses": [ { "clause", "prediction": { "risk", "explanation", "category" } } ] }`
//! - `POST {base}/ask-question/` JSON `{ "query" }`, answered with `{ "answer" }`
//!
//! Fields the service adds beyond these (e.g. `extracted_text_file`) are
//! ignored. Each method performs exactly one request; retry policy belongs to
//! the caller.

use async_trait::async_trait;
use reqwest::{multipart, Client, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::ServiceConfig;
use crate::domain::policy::{Document, ExtractedClause};
use crate::ports::{AnalysisClient, AnalysisError};

/// reqwest-backed client for the analysis service.
#[derive(Debug, Clone)]
pub struct HttpAnalysisClient {
    client: Client,
    extract_url: String,
    ask_url: String,
    timeout: Duration,
}

impl HttpAnalysisClient {
    /// Creates a client for the configured service.
    ///
    /// Endpoint URLs are resolved once here.
    pub fn new(config: &ServiceConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            client,
            extract_url: config.extract_url(),
            ask_url: config.ask_url(),
            timeout: config.timeout(),
        })
    }

    fn describe_send_error(&self, err: &reqwest::Error) -> String {
        if err.is_timeout() {
            format!("timed out after {}s", self.timeout.as_secs())
        } else if err.is_connect() {
            format!("connection failed: {}", err)
        } else {
            err.to_string()
        }
    }

    /// Returns the response if its status is a success, else the status and body.
    async fn check_status(response: Response) -> Result<Response, String> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(format!("service returned {}: {}", status, body.trim()))
    }
}

#[async_trait]
impl AnalysisClient for HttpAnalysisClient {
    async fn extract_clauses(&self, doc: &Document) -> Result<Vec<ExtractedClause>, AnalysisError> {
        tracing::debug!(
            endpoint = %self.extract_url,
            document_id = %doc.id(),
            bytes = doc.byte_size(),
            "uploading document for clause extraction"
        );

        let part = multipart::Part::bytes(doc.content().to_vec())
            .file_name(doc.name().to_string())
            .mime_str(doc.mime_hint())
            .map_err(|e| AnalysisError::extraction_failed(format!("invalid mime type: {}", e)))?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(&self.extract_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AnalysisError::extraction_failed(self.describe_send_error(&e)))?;

        let response = Self::check_status(response)
            .await
            .map_err(AnalysisError::extraction_failed)?;

        let body = response
            .text()
            .await
            .map_err(|e| AnalysisError::extraction_failed(format!("failed to read body: {}", e)))?;

        parse_extraction(&body)
    }

    async fn ask_question(&self, query: &str) -> Result<String, AnalysisError> {
        tracing::debug!(
            endpoint = %self.ask_url,
            query_chars = query.chars().count(),
            "asking analysis service"
        );

        let response = self
            .client
            .post(&self.ask_url)
            .json(&AskRequest { query })
            .send()
            .await
            .map_err(|e| AnalysisError::query_failed(self.describe_send_error(&e)))?;

        let response = Self::check_status(response)
            .await
            .map_err(AnalysisError::query_failed)?;

        let answer: AskResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::query_failed(format!("failed to parse answer: {}", e)))?;

        Ok(answer.answer)
    }
}

/// Validates an extraction payload element by element.
///
/// A single malformed element fails the whole response; nothing is dropped.
fn parse_extraction(body: &str) -> Result<Vec<ExtractedClause>, AnalysisError> {
    let payload: ExtractResponse = serde_json::from_str(body)
        .map_err(|e| AnalysisError::malformed(format!("invalid extraction payload: {}", e)))?;

    payload
        .clauses
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            let dto: ClauseDto = serde_json::from_value(value)
                .map_err(|e| AnalysisError::malformed(format!("clause {}: {}", index, e)))?;
            Ok(ExtractedClause::new(
                dto.clause,
                dto.prediction.risk,
                dto.prediction.explanation,
                dto.prediction.category,
            ))
        })
        .collect()
}

// ════════════════════════════════════════════════════════════════════════════════
// Wire types
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
struct AskRequest<'a> {
    query: &'a str,
}

#[derive(Debug, Deserialize)]
struct AskResponse {
    answer: String,
}

#[derive(Debug, Deserialize)]
struct ExtractResponse {
    clauses: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ClauseDto {
    clause: String,
    prediction: PredictionDto,
}

#[derive(Debug, Deserialize)]
struct PredictionDto {
    risk: String,
    explanation: String,
    category: String,
}
