//! Chat turns and the per-document transcript.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

/// Who produced a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One message in the document conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
    pub timestamp: Timestamp,
}

impl ChatTurn {
    /// Creates a user turn stamped now.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            timestamp: Timestamp::now(),
        }
    }

    /// Creates an assistant turn stamped now.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
            timestamp: Timestamp::now(),
        }
    }
}

/// Append-only conversation for the current document.
///
/// Turns are never reordered or removed; a new document gets a new transcript.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatTranscript {
    turns: Vec<ChatTurn>,
}

impl ChatTranscript {
    /// Creates an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transcript opened by an assistant greeting.
    pub fn with_greeting(greeting: &str) -> Self {
        let mut transcript = Self::new();
        if !greeting.trim().is_empty() {
            transcript.push(ChatTurn::assistant(greeting));
        }
        transcript
    }

    pub fn push(&mut self, turn: ChatTurn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&ChatTurn> {
        self.turns.last()
    }
}
