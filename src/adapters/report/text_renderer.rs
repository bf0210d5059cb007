//! Plain-text renderer for terminals.
//!
//! Projects each page's text runs onto a character grid: runs sharing a
//! baseline form one line and their x position picks the starting column.
//! Rules become dashed lines; fills are dropped.

use std::collections::BTreeMap;

use crate::domain::report::{LayoutElement, ReportDocument, ReportPage, CONTENT_WIDTH, MARGIN};
use crate::ports::{ExportError, ExportFormat, ReportRenderer};

/// Horizontal millimetres per output column.
const MM_PER_COLUMN: f64 = 2.0;

/// Renders reports as plain UTF-8 text.
#[derive(Debug, Clone, Default)]
pub struct TextReportRenderer;

impl TextReportRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Renders straight to a `String`.
    pub fn render_string(&self, report: &ReportDocument) -> String {
        let mut out = String::new();
        for (index, page) in report.pages.iter().enumerate() {
            if index > 0 {
                out.push_str(&format!("\n--- page {} ---\n\n", index + 1));
            }
            render_page(&mut out, page);
        }
        out
    }
}

impl ReportRenderer for TextReportRenderer {
    fn format(&self) -> ExportFormat {
        ExportFormat::Text
    }

    fn render(&self, report: &ReportDocument) -> Result<Vec<u8>, ExportError> {
        Ok(self.render_string(report).into_bytes())
    }
}

fn render_page(out: &mut String, page: &ReportPage) {
    // Keyed by baseline in tenths of a millimetre so lines sort top to bottom.
    let mut lines: BTreeMap<i64, Vec<(usize, &str)>> = BTreeMap::new();
    let mut rules: Vec<i64> = Vec::new();

    for element in &page.elements {
        match element {
            LayoutElement::Text(run) => {
                lines
                    .entry(baseline_key(run.y))
                    .or_default()
                    .push((column(run.x), run.text.as_str()));
            }
            LayoutElement::Rule { y1, .. } => {
                let key = baseline_key(*y1);
                rules.push(key);
                lines.entry(key).or_default();
            }
            LayoutElement::FilledRect { .. } => {}
        }
    }

    let rule_line = "-".repeat(column(MARGIN + CONTENT_WIDTH));
    for (key, mut runs) in lines {
        if runs.is_empty() && rules.contains(&key) {
            out.push_str(&rule_line);
        } else {
            runs.sort_by_key(|(col, _)| *col);
            out.push_str(&compose_line(&runs));
        }
        out.push('\n');
    }
}

fn compose_line(runs: &[(usize, &str)]) -> String {
    let mut line = String::new();
    let mut width = 0;
    for (col, text) in runs {
        if width < *col {
            line.push_str(&" ".repeat(col - width));
            width = *col;
        } else if width > 0 {
            line.push(' ');
            width += 1;
        }
        line.push_str(text);
        width += text.chars().count();
    }
    line.trim_end().to_string()
}

fn baseline_key(y: f64) -> i64 {
    (y * 10.0).round() as i64
}

fn column(x: f64) -> usize {
    ((x - MARGIN).max(0.0) / MM_PER_COLUMN).round() as usize
}
