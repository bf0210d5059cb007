//! Clauses and their risk tiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Risk tier assigned to a clause by the analysis service.
///
/// Variant order is descending urgency; reports list tiers in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    High,
    Moderate,
    Low,
}

impl RiskTier {
    /// All tiers, most urgent first.
    pub const ALL: [RiskTier; 3] = [RiskTier::High, RiskTier::Moderate, RiskTier::Low];

    /// Parses a tier as sent by the service.
    ///
    /// Only the exact lowercase spellings are accepted.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "high" => Some(RiskTier::High),
            "moderate" => Some(RiskTier::Moderate),
            "low" => Some(RiskTier::Low),
            _ => None,
        }
    }

    /// Wire spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::High => "high",
            RiskTier::Moderate => "moderate",
            RiskTier::Low => "low",
        }
    }

    /// Capitalized label used in report tables.
    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::High => "High",
            RiskTier::Moderate => "Moderate",
            RiskTier::Low => "Low",
        }
    }

    /// Badge text used by the clause panel.
    pub fn badge(&self) -> String {
        format!("{} Risk", self.label())
    }

    /// Report section heading for this tier.
    pub fn section_title(&self) -> &'static str {
        match self {
            RiskTier::High => "HIGH-RISK CLAUSES:",
            RiskTier::Moderate => "MODERATE-RISK CLAUSES:",
            RiskTier::Low => "LOW-RISK CLAUSES:",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A clause exactly as the extraction endpoint returned it.
///
/// Shape has been checked (all fields present) but the tier is still raw text;
/// the classifier turns these into [`Clause`] values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedClause {
    pub text: String,
    pub risk: String,
    pub explanation: String,
    pub category: String,
}

impl ExtractedClause {
    pub fn new(
        text: impl Into<String>,
        risk: impl Into<String>,
        explanation: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            risk: risk.into(),
            explanation: explanation.into(),
            category: category.into(),
        }
    }
}

/// One classified policy provision. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clause {
    id: usize,
    text: String,
    risk_tier: RiskTier,
    category: String,
    explanation: String,
}

impl Clause {
    pub fn new(
        id: usize,
        text: impl Into<String>,
        risk_tier: RiskTier,
        category: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            id,
            text: text.into(),
            risk_tier,
            category: category.into(),
            explanation: explanation.into(),
        }
    }

    /// Position in extraction order (0-based).
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn risk_tier(&self) -> RiskTier {
        self.risk_tier
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_the_three_tiers() {
        assert_eq!(RiskTier::parse("high"), Some(RiskTier::High));
        assert_eq!(RiskTier::parse("moderate"), Some(RiskTier::Moderate));
        assert_eq!(RiskTier::parse("low"), Some(RiskTier::Low));
    }

    #[test]
    fn parse_is_case_and_whitespace_sensitive() {
        assert_eq!(RiskTier::parse("High"), None);
        assert_eq!(RiskTier::parse(" high "), None);
        assert_eq!(RiskTier::parse("LOW"), None);
    }

    #[test]
    fn parse_rejects_anything_else() {
        assert_eq!(RiskTier::parse("medium"), None);
        assert_eq!(RiskTier::parse("critical"), None);
        assert_eq!(RiskTier::parse(""), None);
    }

    #[test]
    fn labels_and_titles() {
        assert_eq!(RiskTier::Moderate.label(), "Moderate");
        assert_eq!(RiskTier::Low.badge(), "Low Risk");
        assert_eq!(RiskTier::High.section_title(), "HIGH-RISK CLAUSES:");
    }

    #[test]
    fn all_is_in_descending_urgency() {
        assert_eq!(
            RiskTier::ALL,
            [RiskTier::High, RiskTier::Moderate, RiskTier::Low]
        );
        let mut sorted = RiskTier::ALL;
        sorted.sort();
        assert_eq!(sorted, RiskTier::ALL);
    }

    #[test]
    fn tier_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&RiskTier::High).unwrap(), "\"high\"");
        let tier: RiskTier = serde_json::from_str("\"moderate\"").unwrap();
        assert_eq!(tier, RiskTier::Moderate);
    }
}
