//! Ports - Interfaces between the application and the outside world.
//!
//! - `AnalysisClient` - the remote extraction / question-answering service
//! - `ReportRenderer` - encodes composed reports into files
//! - `SpeechInput` - optional voice capture for chat

mod analysis_client;
mod report_renderer;
mod speech_input;

pub use analysis_client::{AnalysisClient, AnalysisError};
pub use report_renderer::{ExportError, ExportFormat, ExportedReport, ReportRenderer};
pub use speech_input::{SpeechError, SpeechInput};
