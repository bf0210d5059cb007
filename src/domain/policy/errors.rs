//! Analysis error taxonomy.

use thiserror::Error;

/// Errors raised while analyzing a policy document.
///
/// Transport-level failures (`ExtractionFailed`, `QueryFailed`) come from the
/// remote service; `MalformedResponse` and `UnknownRiskTier` mean the service
/// answered but broke the data contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// The extraction endpoint could not be reached or returned non-success.
    #[error("clause extraction failed: {reason}")]
    ExtractionFailed {
        /// Error details.
        reason: String,
    },

    /// The question endpoint could not be reached, returned non-success,
    /// or answered with unparseable JSON.
    #[error("question answering failed: {reason}")]
    QueryFailed {
        /// Error details.
        reason: String,
    },

    /// A success response did not have the expected shape.
    #[error("malformed response: {reason}")]
    MalformedResponse {
        /// What was wrong with the payload.
        reason: String,
    },

    /// A clause carried a risk tier outside `high | moderate | low`.
    #[error("unknown risk tier '{value}' on clause {index}")]
    UnknownRiskTier {
        /// Position of the clause in extraction order.
        index: usize,
        /// The rejected tier value.
        value: String,
    },
}

impl AnalysisError {
    /// Creates an extraction failure.
    pub fn extraction_failed(reason: impl Into<String>) -> Self {
        Self::ExtractionFailed {
            reason: reason.into(),
        }
    }

    /// Creates a query failure.
    pub fn query_failed(reason: impl Into<String>) -> Self {
        Self::QueryFailed {
            reason: reason.into(),
        }
    }

    /// Creates a malformed response error.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            reason: reason.into(),
        }
    }

    /// Creates an unknown risk tier error.
    pub fn unknown_risk_tier(index: usize, value: impl Into<String>) -> Self {
        Self::UnknownRiskTier {
            index,
            value: value.into(),
        }
    }

    /// Returns true for network / non-success failures.
    ///
    /// Only these are eligible for the workflow's optional retry policy;
    /// contract violations fail the same way on every attempt.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            AnalysisError::ExtractionFailed { .. } | AnalysisError::QueryFailed { .. }
        )
    }
}
