//! Report composition.
//!
//! `ReportComposer` turns a published analysis into a paginated
//! [`ReportDocument`] (positioned text, rules and filled rectangles in
//! millimetres). Rendering to bytes lives behind the `ReportRenderer` port.

mod composer;
mod layout;
mod metrics;

pub use composer::{ReportComposer, FOOTER_TEXT, REPORT_TITLE, SUMMARY_HEADING};
pub use layout::{
    Align, LayoutElement, ReportDocument, ReportPage, ReportRow, ReportSection, Rgb, TextRun,
    COLUMN_HEADERS, COLUMN_WIDTHS, CONTENT_BOTTOM, CONTENT_WIDTH, CONTINUATION_TOP, FOOTER_LIMIT,
    MARGIN, PAGE_HEIGHT, PAGE_WIDTH,
};
pub use metrics::{text_width, wrap_text, MM_PER_PT};
