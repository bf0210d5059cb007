//! Speech Input Port - Optional voice capture for chat questions.
//!
//! Capture mechanics are out of scope for this crate; a front end that can
//! record speech injects an implementation and the chat gateway treats the
//! transcription like typed input.

use async_trait::async_trait;
use thiserror::Error;

/// Port for turning one spoken utterance into text.
#[async_trait]
pub trait SpeechInput: Send + Sync {
    /// Listens for a single utterance and returns its transcription.
    async fn listen(&self) -> Result<String, SpeechError>;
}

/// Speech capture errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpeechError {
    /// No input device or recognizer is available.
    #[error("speech input unavailable: {0}")]
    Unavailable(String),

    /// Recognition ran but produced nothing usable.
    #[error("no speech recognized")]
    NothingRecognized,
}
