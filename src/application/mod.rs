//! Application layer - Workflow orchestration and handlers.
//!
//! Sequences the domain services against the ports:
//! - `AnalysisWorkflow` - the per-document pipeline state machine
//! - `ChatGateway` - questions about the current document
//! - `ExportReportHandler` - composes and encodes reports

mod chat_gateway;
mod export_report;
mod workflow;

pub use chat_gateway::{ChatError, ChatGateway, ChatReply, ChatResponder};
pub use export_report::ExportReportHandler;
pub use workflow::{AnalysisWorkflow, RunOutcome, WorkflowOptions, WorkflowSnapshot};
