//! State machine trait for status enums.
//!
//! Gives lifecycle enums (such as the analysis pipeline state) one way to
//! validate and perform transitions.

use super::ValidationError;

/// Trait for status enums that represent state machines.
///
/// Implementors define the valid transitions and get a validated
/// `transition_to` for free.
///
/// ```ignore
/// let next = PipelineState::Extracting.transition_to(PipelineState::Summarizing)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs transition with validation, returning error if invalid.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Upload {
        Pending,
        Sending,
        Sent,
    }

    impl StateMachine for Upload {
        fn can_transition_to(&self, target: &Self) -> bool {
            self.valid_transitions().contains(target)
        }

        fn valid_transitions(&self) -> Vec<Self> {
            match self {
                Upload::Pending => vec![Upload::Sending],
                Upload::Sending => vec![Upload::Sent, Upload::Pending],
                Upload::Sent => vec![],
            }
        }
    }

    #[test]
    fn transition_to_succeeds_for_valid_transition() {
        assert_eq!(
            Upload::Pending.transition_to(Upload::Sending),
            Ok(Upload::Sending)
        );
    }

    #[test]
    fn transition_to_fails_for_invalid_transition() {
        let err = Upload::Pending.transition_to(Upload::Sent).unwrap_err();
        assert_eq!(err.field(), "state_transition");
        assert!(err.to_string().contains("Pending"));
    }

    #[test]
    fn terminal_state_has_no_transitions() {
        assert!(Upload::Sent.is_terminal());
        assert!(!Upload::Sending.is_terminal());
    }
}
