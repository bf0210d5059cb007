//! ExportReportHandler - Turns the current analysis into a downloadable report.
//!
//! The report is composed fresh on every request from the selected document
//! and its published result; nothing about it is stored in the workflow.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::workflow::AnalysisWorkflow;
use crate::domain::foundation::Timestamp;
use crate::domain::policy::{AnalysisResult, Document};
use crate::domain::report::ReportComposer;
use crate::ports::{ExportError, ExportedReport, ReportRenderer};

/// Handler for exporting reports.
pub struct ExportReportHandler {
    composer: ReportComposer,
    renderer: Arc<dyn ReportRenderer>,
}

impl ExportReportHandler {
    pub fn new(renderer: Arc<dyn ReportRenderer>) -> Self {
        Self {
            composer: ReportComposer::new(),
            renderer,
        }
    }

    /// Exports the workflow's current analysis.
    ///
    /// Fails with `NoResult` unless the current document finished successfully.
    pub fn handle(
        &self,
        workflow: &AnalysisWorkflow,
        generated_at: Timestamp,
    ) -> Result<ExportedReport, ExportError> {
        let (doc, result) = workflow.published().ok_or(ExportError::NoResult)?;
        self.export(&doc, &result, generated_at)
    }

    /// Exports an explicit document/result pair.
    pub fn export(
        &self,
        doc: &Document,
        result: &AnalysisResult,
        generated_at: Timestamp,
    ) -> Result<ExportedReport, ExportError> {
        let report = self.composer.compose(doc, result, generated_at);
        let content = self.renderer.render(&report)?;

        tracing::info!(
            document_id = %doc.id(),
            format = %self.renderer.format(),
            pages = report.page_count(),
            bytes = content.len(),
            "report exported"
        );

        Ok(ExportedReport::new(
            content,
            self.renderer.format(),
            &report.base_filename,
        ))
    }

    /// Writes an exported report into `dir` under its suggested filename.
    pub fn write_to(&self, report: &ExportedReport, dir: &Path) -> Result<PathBuf, ExportError> {
        std::fs::create_dir_all(dir)
            .map_err(|e| ExportError::io_error(format!("{}: {}", dir.display(), e)))?;

        let path = dir.join(&report.filename);
        std::fs::write(&path, &report.content)
            .map_err(|e| ExportError::io_error(format!("{}: {}", path.display(), e)))?;

        tracing::debug!(path = %path.display(), "report written");
        Ok(path)
    }
}
