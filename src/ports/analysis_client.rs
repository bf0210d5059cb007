//! Analysis Client Port - Interface to the remote document analysis service.
//!
//! The service exposes two calls: clause extraction over an uploaded file and
//! free-form question answering. This port lets the workflow and the chat
//! gateway drive either call without coupling to HTTP.
//!
//! # Contract
//!
//! Implementations must:
//! - Perform exactly one remote call per method invocation (no internal retries)
//! - Map non-success transport outcomes to `ExtractionFailed` / `QueryFailed`
//! - Reject success payloads of the wrong shape with `MalformedResponse`,
//!   never dropping individual malformed clauses
//!
//! # Example
//!
//! ```ignore
//! let client: Arc<dyn AnalysisClient> = Arc::new(HttpAnalysisClient::new(config)?);
//! let clauses = client.extract_clauses(&document).await?;
//! let answer = client.ask_question("What is my deductible?").await?;
//! ```

use async_trait::async_trait;

use crate::domain::policy::{Document, ExtractedClause};

pub use crate::domain::policy::AnalysisError;

/// Port for the remote analysis service.
#[async_trait]
pub trait AnalysisClient: Send + Sync {
    /// Uploads the document and returns its clauses in service order.
    ///
    /// Risk tiers are returned as raw text; classification happens later.
    async fn extract_clauses(&self, doc: &Document) -> Result<Vec<ExtractedClause>, AnalysisError>;

    /// Asks a free-form question and returns the raw (unsanitized) answer.
    async fn ask_question(&self, query: &str) -> Result<String, AnalysisError>;
}
