//! Scripted speech input.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::ports::{SpeechError, SpeechInput};

/// Speech input that returns queued transcriptions in order.
///
/// Once the queue is drained every call reports `NothingRecognized`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSpeechInput {
    utterances: Arc<Mutex<VecDeque<Result<String, SpeechError>>>>,
}

impl ScriptedSpeechInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a recognized utterance.
    pub fn with_utterance(self, text: impl Into<String>) -> Self {
        self.utterances.lock().unwrap().push_back(Ok(text.into()));
        self
    }

    /// Queues a capture failure.
    pub fn with_error(self, error: SpeechError) -> Self {
        self.utterances.lock().unwrap().push_back(Err(error));
        self
    }
}

#[async_trait]
impl SpeechInput for ScriptedSpeechInput {
    async fn listen(&self) -> Result<String, SpeechError> {
        self.utterances
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(SpeechError::NothingRecognized))
    }
}
