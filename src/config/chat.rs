//! Chat gateway configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::policy::DEFAULT_GREETING;

/// Chat gateway configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Where answers come from
    #[serde(default)]
    pub mode: ChatMode,

    /// First assistant turn of every transcript (empty disables it)
    #[serde(default = "default_greeting")]
    pub greeting: String,

    /// Replies served in order by canned mode
    #[serde(default)]
    pub canned_responses: Vec<String>,

    /// Accept questions from an injected speech input
    #[serde(default)]
    pub voice_enabled: bool,
}

/// Chat answer source
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChatMode {
    /// Ask the analysis service
    #[default]
    Live,
    /// Reply from a fixed list without any remote call
    Canned,
}

impl ChatConfig {
    /// Validate chat configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.mode == ChatMode::Canned
            && self.canned_responses.iter().all(|r| r.trim().is_empty())
        {
            return Err(ValidationError::NoCannedResponses);
        }
        Ok(())
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            mode: ChatMode::default(),
            greeting: default_greeting(),
            canned_responses: Vec::new(),
            voice_enabled: false,
        }
    }
}

fn default_greeting() -> String {
    DEFAULT_GREETING.to_string()
}
