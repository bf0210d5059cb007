//! Policy analysis domain.
//!
//! Value types for a selected document, its extracted clauses and the
//! published analysis, plus the pure services the workflow sequences:
//! `ClauseClassifier` (risk-tier buckets) and `TextSanitizer` (markup
//! stripping).

mod chat;
mod classifier;
mod clause;
mod document;
mod errors;
mod pipeline_state;
mod prompts;
mod result;
mod sanitizer;

pub use chat::{ChatRole, ChatTranscript, ChatTurn};
pub use classifier::{ClauseClassifier, RiskBuckets};
pub use clause::{Clause, ExtractedClause, RiskTier};
pub use document::{Document, DocumentKind};
pub use errors::AnalysisError;
pub use pipeline_state::PipelineState;
pub use prompts::{CHAT_FAILURE_MESSAGE, DEFAULT_GREETING, PIPELINE_FAILURE_MESSAGE, SUMMARY_PROMPT};
pub use result::{AnalysisResult, ClausePanelEntry};
pub use sanitizer::TextSanitizer;
