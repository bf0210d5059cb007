//! Report Renderer Port - Turns a composed report into downloadable bytes.
//!
//! The domain composes a [`ReportDocument`] (positioned text and shapes);
//! adapters encode it into a concrete file format.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::report::ReportDocument;

/// Port for encoding composed reports.
///
/// Implementations must be deterministic: the same report always encodes to
/// the same bytes.
pub trait ReportRenderer: Send + Sync {
    /// Format this renderer produces.
    fn format(&self) -> ExportFormat;

    /// Encodes the report.
    fn render(&self, report: &ReportDocument) -> Result<Vec<u8>, ExportError>;
}

/// Report file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    /// PDF document.
    Pdf,
    /// Plain UTF-8 text.
    Text,
}

impl ExportFormat {
    /// Get the MIME content type for this format.
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Text => "text/plain; charset=utf-8",
        }
    }

    /// Get the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Text => "txt",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Pdf => write!(f, "pdf"),
            ExportFormat::Text => write!(f, "text"),
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "text" | "txt" => Ok(ExportFormat::Text),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Exported report with content and metadata.
#[derive(Debug, Clone)]
pub struct ExportedReport {
    /// The encoded content.
    pub content: Vec<u8>,
    /// The MIME content type.
    pub content_type: String,
    /// Suggested filename for download.
    pub filename: String,
    /// The format that was used.
    pub format: ExportFormat,
}

impl ExportedReport {
    /// Create a new exported report.
    pub fn new(content: Vec<u8>, format: ExportFormat, base_filename: &str) -> Self {
        Self {
            content,
            content_type: format.content_type().to_string(),
            filename: format!("{}.{}", base_filename, format.extension()),
            format,
        }
    }
}

/// Errors that can occur during report export.
#[derive(Debug, Clone, Error)]
pub enum ExportError {
    /// Unsupported export format requested.
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    /// No analysis has been published yet.
    #[error("No analysis result available for export")]
    NoResult,

    /// Encoding to PDF failed.
    #[error("PDF rendering failed: {0}")]
    PdfRenderFailed(String),

    /// I/O error while writing the report.
    #[error("I/O error during export: {0}")]
    IoError(String),
}

impl ExportError {
    /// Create a PDF rendering error.
    pub fn pdf_failed(reason: impl Into<String>) -> Self {
        Self::PdfRenderFailed(reason.into())
    }

    /// Create an I/O error.
    pub fn io_error(reason: impl Into<String>) -> Self {
        Self::IoError(reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_format_content_types_are_correct() {
        assert_eq!(ExportFormat::Pdf.content_type(), "application/pdf");
        assert_eq!(ExportFormat::Text.content_type(), "text/plain; charset=utf-8");
    }

    #[test]
    fn export_format_parses_from_string() {
        assert_eq!("pdf".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
        assert_eq!("TXT".parse::<ExportFormat>().unwrap(), ExportFormat::Text);
        assert!(matches!(
            "docx".parse::<ExportFormat>(),
            Err(ExportError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn exported_report_names_file_from_base() {
        let report = ExportedReport::new(b"%PDF".to_vec(), ExportFormat::Pdf, "TLDR_Report_home");
        assert_eq!(report.filename, "TLDR_Report_home.pdf");
        assert_eq!(report.content_type, "application/pdf");
    }

    #[test]
    fn export_error_displays_messages() {
        assert!(ExportError::pdf_failed("bad font")
            .to_string()
            .contains("PDF rendering failed"));
        assert!(ExportError::io_error("disk full").to_string().contains("disk full"));
    }
}
