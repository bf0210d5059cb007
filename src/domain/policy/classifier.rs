//! Clause classification into risk-tier buckets.

use super::{AnalysisError, Clause, ExtractedClause, RiskTier};

/// Clauses grouped by risk tier.
///
/// Each bucket keeps the relative extraction order of its clauses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RiskBuckets {
    high: Vec<Clause>,
    moderate: Vec<Clause>,
    low: Vec<Clause>,
}

impl RiskBuckets {
    /// Stable partition of already-typed clauses.
    pub fn from_clauses(clauses: &[Clause]) -> Self {
        let mut buckets = Self::default();
        for clause in clauses {
            buckets.bucket_mut(clause.risk_tier()).push(clause.clone());
        }
        buckets
    }

    /// Clauses of one tier, in extraction order.
    pub fn get(&self, tier: RiskTier) -> &[Clause] {
        match tier {
            RiskTier::High => &self.high,
            RiskTier::Moderate => &self.moderate,
            RiskTier::Low => &self.low,
        }
    }

    pub fn high(&self) -> &[Clause] {
        &self.high
    }

    pub fn moderate(&self) -> &[Clause] {
        &self.moderate
    }

    pub fn low(&self) -> &[Clause] {
        &self.low
    }

    /// Total number of clauses across all buckets.
    pub fn len(&self) -> usize {
        self.high.len() + self.moderate.len() + self.low.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Non-empty buckets, most urgent tier first.
    pub fn non_empty(&self) -> impl Iterator<Item = (RiskTier, &[Clause])> {
        RiskTier::ALL
            .into_iter()
            .map(move |tier| (tier, self.get(tier)))
            .filter(|(_, clauses)| !clauses.is_empty())
    }

    /// Reassembles the flat list in extraction order.
    pub fn into_ordered(self) -> Vec<Clause> {
        let mut all: Vec<Clause> = self
            .high
            .into_iter()
            .chain(self.moderate)
            .chain(self.low)
            .collect();
        all.sort_by_key(Clause::id);
        all
    }

    fn bucket_mut(&mut self, tier: RiskTier) -> &mut Vec<Clause> {
        match tier {
            RiskTier::High => &mut self.high,
            RiskTier::Moderate => &mut self.moderate,
            RiskTier::Low => &mut self.low,
        }
    }
}

/// Turns raw extracted clauses into typed, bucketed clauses.
pub struct ClauseClassifier;

impl ClauseClassifier {
    /// Validates and partitions extracted clauses.
    ///
    /// Clause ids are the 0-based extraction positions. Every clause lands in
    /// exactly one bucket.
    ///
    /// # Errors
    ///
    /// - `UnknownRiskTier` for a tier outside `high | moderate | low`;
    ///   nothing is coerced into a default bucket
    /// - `MalformedResponse` for a clause with blank text
    pub fn classify(extracted: &[ExtractedClause]) -> Result<RiskBuckets, AnalysisError> {
        let mut buckets = RiskBuckets::default();

        for (index, raw) in extracted.iter().enumerate() {
            if raw.text.trim().is_empty() {
                return Err(AnalysisError::malformed(format!(
                    "clause {} has empty text",
                    index
                )));
            }

            let tier = RiskTier::parse(&raw.risk)
                .ok_or_else(|| AnalysisError::unknown_risk_tier(index, raw.risk.clone()))?;

            buckets.bucket_mut(tier).push(Clause::new(
                index,
                raw.text.clone(),
                tier,
                raw.category.clone(),
                raw.explanation.clone(),
            ));
        }

        Ok(buckets)
    }
}
