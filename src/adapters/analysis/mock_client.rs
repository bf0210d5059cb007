//! Mock Analysis Client for testing.
//!
//! Provides a configurable mock implementation of the AnalysisClient port,
//! allowing the workflow and chat gateway to run without a live service.
//!
//! # Features
//!
//! - Separate response queues for extraction and question answering
//! - Per-response delays for supersession and ordering tests
//! - Error injection
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let client = MockAnalysisClient::new()
//!     .with_clauses(vec![ExtractedClause::new("Flood excluded", "high", "why", "Exclusions")])
//!     .with_answer("**Summary** text");
//!
//! let clauses = client.extract_clauses(&doc).await?;
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::policy::{Document, ExtractedClause};
use crate::ports::{AnalysisClient, AnalysisError};

/// Answer returned when the ask queue is empty.
const DEFAULT_ANSWER: &str = "Mock answer";

/// A queued outcome with its simulated latency.
#[derive(Debug, Clone)]
struct Scripted<T> {
    outcome: Result<T, AnalysisError>,
    delay: Option<Duration>,
}

/// Mock analysis client for testing.
///
/// Responses are consumed in call order, so the first call gets the first
/// queued response even if a later call finishes sooner.
#[derive(Debug, Clone, Default)]
pub struct MockAnalysisClient {
    extractions: Arc<Mutex<VecDeque<Scripted<Vec<ExtractedClause>>>>>,
    answers: Arc<Mutex<VecDeque<Scripted<String>>>>,
    /// Latency for responses queued without their own delay.
    delay: Duration,
    extract_calls: Arc<Mutex<Vec<String>>>,
    ask_calls: Arc<Mutex<Vec<String>>>,
}

impl MockAnalysisClient {
    /// Creates a mock with empty queues and no latency.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful extraction.
    pub fn with_clauses(self, clauses: Vec<ExtractedClause>) -> Self {
        self.push_extraction(Ok(clauses), None)
    }

    /// Queues a successful extraction that takes `delay` to arrive.
    pub fn with_clauses_after(self, clauses: Vec<ExtractedClause>, delay: Duration) -> Self {
        self.push_extraction(Ok(clauses), Some(delay))
    }

    /// Queues a failed extraction.
    pub fn with_extract_error(self, error: AnalysisError) -> Self {
        self.push_extraction(Err(error), None)
    }

    /// Queues a successful answer.
    pub fn with_answer(self, answer: impl Into<String>) -> Self {
        self.push_answer(Ok(answer.into()), None)
    }

    /// Queues a successful answer that takes `delay` to arrive.
    pub fn with_answer_after(self, answer: impl Into<String>, delay: Duration) -> Self {
        self.push_answer(Ok(answer.into()), Some(delay))
    }

    /// Queues a failed answer.
    pub fn with_ask_error(self, error: AnalysisError) -> Self {
        self.push_answer(Err(error), None)
    }

    /// Sets the default latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of extraction calls made.
    pub fn extract_count(&self) -> usize {
        self.extract_calls.lock().unwrap().len()
    }

    /// Names of documents sent for extraction, in call order.
    pub fn extracted_documents(&self) -> Vec<String> {
        self.extract_calls.lock().unwrap().clone()
    }

    /// Number of question calls made.
    pub fn ask_count(&self) -> usize {
        self.ask_calls.lock().unwrap().len()
    }

    /// Questions asked, in call order.
    pub fn questions(&self) -> Vec<String> {
        self.ask_calls.lock().unwrap().clone()
    }

    fn push_extraction(
        self,
        outcome: Result<Vec<ExtractedClause>, AnalysisError>,
        delay: Option<Duration>,
    ) -> Self {
        self.extractions
            .lock()
            .unwrap()
            .push_back(Scripted { outcome, delay });
        self
    }

    fn push_answer(self, outcome: Result<String, AnalysisError>, delay: Option<Duration>) -> Self {
        self.answers
            .lock()
            .unwrap()
            .push_back(Scripted { outcome, delay });
        self
    }

    async fn settle<T>(&self, scripted: Scripted<T>) -> Result<T, AnalysisError> {
        let delay = scripted.delay.unwrap_or(self.delay);
        if !delay.is_zero() {
            sleep(delay).await;
        }
        scripted.outcome
    }
}

#[async_trait]
impl AnalysisClient for MockAnalysisClient {
    async fn extract_clauses(&self, doc: &Document) -> Result<Vec<ExtractedClause>, AnalysisError> {
        self.extract_calls
            .lock()
            .unwrap()
            .push(doc.name().to_string());

        let scripted = self
            .extractions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Scripted {
                outcome: Ok(Vec::new()),
                delay: None,
            });
        self.settle(scripted).await
    }

    async fn ask_question(&self, query: &str) -> Result<String, AnalysisError> {
        self.ask_calls.lock().unwrap().push(query.to_string());

        let scripted = self
            .answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Scripted {
                outcome: Ok(DEFAULT_ANSWER.to_string()),
                delay: None,
            });
        self.settle(scripted).await
    }
}
