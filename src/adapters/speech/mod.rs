//! Speech Input Adapters.
//!
//! - `ScriptedSpeechInput` - replays fixed transcriptions, for tests and demos

mod scripted;

pub use scripted::ScriptedSpeechInput;
