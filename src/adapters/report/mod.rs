//! Report Renderer Adapters.
//!
//! - `PdfReportRenderer` - lopdf PDF output for downloads
//! - `TextReportRenderer` - plain-text output for terminals

mod pdf_renderer;
mod text_renderer;

pub use pdf_renderer::PdfReportRenderer;
pub use text_renderer::TextReportRenderer;
