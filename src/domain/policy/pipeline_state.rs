//! PipelineState enum for tracking one analysis run.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Lifecycle state of the analysis pipeline.
///
/// Within one run the state only moves forward:
/// `Idle -> Uploading -> Extracting -> Summarizing -> Ready`, with `Failed`
/// reachable from the three in-flight states. A new submission starts a new
/// run from `Uploading`; that reset is handled by the workflow, not by a
/// transition listed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    #[default]
    Idle,
    Uploading,
    Extracting,
    Summarizing,
    Ready,
    Failed,
}

impl PipelineState {
    /// Returns true while a run is waiting on the analysis service.
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            PipelineState::Uploading | PipelineState::Extracting | PipelineState::Summarizing
        )
    }

    /// Returns true if a run has finished, successfully or not.
    pub fn is_settled(&self) -> bool {
        matches!(self, PipelineState::Ready | PipelineState::Failed)
    }
}

impl StateMachine for PipelineState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use PipelineState::*;
        matches!(
            (self, target),
            (Idle, Uploading)
                | (Ready, Uploading)
                | (Failed, Uploading)
                | (Uploading, Extracting)
                | (Uploading, Failed)
                | (Extracting, Summarizing)
                | (Extracting, Failed)
                | (Summarizing, Ready)
                | (Summarizing, Failed)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use PipelineState::*;
        match self {
            Idle | Ready | Failed => vec![Uploading],
            Uploading => vec![Extracting, Failed],
            Extracting => vec![Summarizing, Failed],
            Summarizing => vec![Ready, Failed],
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PipelineState::Idle => "idle",
            PipelineState::Uploading => "uploading",
            PipelineState::Extracting => "extracting",
            PipelineState::Summarizing => "summarizing",
            PipelineState::Ready => "ready",
            PipelineState::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}
