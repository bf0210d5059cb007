//! Fixed prompt and message texts.

/// Instruction sent to the question endpoint to produce the executive summary.
pub const SUMMARY_PROMPT: &str = r#"You are an expert insurance analyst reviewing an insurance policy document. Summarize the coverage categories in the policy, describe what each category provides, and call out any hidden clauses or special conditions that are easy to miss in the fine print.

Instructions:

1. **Identify Coverage Categories**: List the major categories the policy covers, for example:
   - Hospitalization Expenses
   - Pre-existing Conditions
   - Waiting Periods
   - Room Rent Limits
   - Co-payment
   - Day Care Treatment
   - Post-Hospitalization Coverage
   - Optional Covers (e.g., AYUSH, Organ Donor)
   - Exclusions or additional features (e.g., Worldwide Coverage, Ambulance)

2. **Describe What Each Provides**: For every category, state what is covered and under which conditions (sums insured, limits, treatment types).

3. **Highlight Hidden Clauses/Special Conditions**: For every category, list hidden clauses or exclusions such as:
   - Waiting periods for specific treatments or pre-existing conditions.
   - Proportionate deductions when a higher room category is chosen.
   - Exclusions for overseas treatment or for conditions like maternity.
   - Sub-limits on specific treatments (AYUSH, organ donor, ambulance).
   - Mandatory co-payment or pre-authorization requirements.

Format each category like this, with the category name in **bold** and a blank line between categories:

- **Pre-existing Conditions**:
  Coverage for pre-existing conditions is eventually provided.
  Excluded from coverage for the first 12 months of the policy.

- **Network/Provider Coverage (Out-of-Network)**:
  Coverage for services received from out-of-network providers.
  Limited to 60% of costs, only after a $2,000 deductible has been met.
"#;

/// Shown in place of the summary when a pipeline run fails.
pub const PIPELINE_FAILURE_MESSAGE: &str =
    "Failed to process or summarize document. Please try again.";

/// Appended as the assistant turn when a chat question fails.
pub const CHAT_FAILURE_MESSAGE: &str =
    "Sorry, I couldn't process your request. Please try again later.";

/// Opening assistant turn of every transcript.
pub const DEFAULT_GREETING: &str =
    "Hello! I'm your AI assistant. Ask me anything about your insurance policy.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_prompt_asks_for_hidden_clauses_per_category() {
        assert!(SUMMARY_PROMPT.contains("Coverage Categories"));
        assert!(SUMMARY_PROMPT.contains("Hidden Clauses"));
        assert!(SUMMARY_PROMPT.contains("**bold**"));
    }

    #[test]
    fn failure_messages_are_distinct() {
        assert_ne!(PIPELINE_FAILURE_MESSAGE, CHAT_FAILURE_MESSAGE);
    }
}
