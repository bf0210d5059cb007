//! The published outcome of a successful pipeline run.

use serde::Serialize;

use super::{Clause, RiskBuckets, RiskTier, TextSanitizer};
use crate::domain::foundation::ValidationError;

/// Summary plus classified clauses for one document.
///
/// Only ever built from a run where both extraction and summarization
/// succeeded; replaced wholesale by the next successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisResult {
    summary: String,
    clauses: Vec<Clause>,
}

impl AnalysisResult {
    /// Creates a result from a raw summary and clauses in extraction order.
    ///
    /// The summary is passed through [`TextSanitizer::clean`], so a result
    /// never holds emphasis markup.
    ///
    /// # Errors
    ///
    /// `InvalidFormat("clauses")` if clause ids are not exactly `0..n` in order.
    pub fn new(summary: impl Into<String>, clauses: Vec<Clause>) -> Result<Self, ValidationError> {
        if let Some((position, clause)) = clauses
            .iter()
            .enumerate()
            .find(|(position, clause)| clause.id() != *position)
        {
            return Err(ValidationError::invalid_format(
                "clauses",
                format!("clause at position {} has id {}", position, clause.id()),
            ));
        }

        Ok(Self {
            summary: TextSanitizer::clean(&summary.into()),
            clauses,
        })
    }

    /// Sanitized executive summary.
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// All clauses in extraction order.
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Clauses grouped by tier.
    pub fn buckets(&self) -> RiskBuckets {
        RiskBuckets::from_clauses(&self.clauses)
    }

    /// Number of clauses in one tier.
    pub fn count(&self, tier: RiskTier) -> usize {
        self.clauses.iter().filter(|c| c.risk_tier() == tier).count()
    }

    /// Rows for the clause panel, in extraction order.
    pub fn clause_panel(&self) -> Vec<ClausePanelEntry> {
        self.clauses.iter().map(ClausePanelEntry::from).collect()
    }
}

/// Display-ready view of one clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClausePanelEntry {
    pub id: usize,
    pub tier: RiskTier,
    pub badge: String,
    pub category: String,
    pub text: String,
    pub explanation: String,
}

impl From<&Clause> for ClausePanelEntry {
    fn from(clause: &Clause) -> Self {
        Self {
            id: clause.id(),
            tier: clause.risk_tier(),
            badge: clause.risk_tier().badge(),
            category: clause.category().to_string(),
            text: clause.text().to_string(),
            explanation: clause.explanation().to_string(),
        }
    }
}
