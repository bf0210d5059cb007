//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the application to external systems:
//! - `analysis` - Remote analysis service (HTTP) and its test double
//! - `report` - Report encoders (PDF, plain text)
//! - `speech` - Speech input implementations

pub mod analysis;
pub mod report;
pub mod speech;

pub use analysis::{HttpAnalysisClient, MockAnalysisClient};
pub use report::{PdfReportRenderer, TextReportRenderer};
pub use speech::ScriptedSpeechInput;
