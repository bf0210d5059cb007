//! Report layout model and page geometry.
//!
//! All coordinates are millimetres on an A4 page with the origin at the
//! top-left corner; text `y` is the baseline.

use serde::Serialize;

use crate::domain::policy::RiskTier;

/// Page width.
pub const PAGE_WIDTH: f64 = 210.0;
/// Page height.
pub const PAGE_HEIGHT: f64 = 297.0;
/// Left and right page margin.
pub const MARGIN: f64 = 14.0;
/// Usable width between the margins.
pub const CONTENT_WIDTH: f64 = 182.0;
/// Lowest baseline / row bottom allowed before breaking to a new page.
pub const CONTENT_BOTTOM: f64 = PAGE_HEIGHT - MARGIN;
/// Cursor position at the top of a continuation page.
pub const CONTINUATION_TOP: f64 = 20.0;
/// Footer must fit below the cursor within this limit.
pub const FOOTER_LIMIT: f64 = 290.0;

/// Table column widths: index, clause text, risk label, explanation.
pub const COLUMN_WIDTHS: [f64; 4] = [8.0, 80.0, 25.0, 70.0];
/// Table header labels, same order as [`COLUMN_WIDTHS`].
pub const COLUMN_HEADERS: [&str; 4] = ["#", "Clause Text", "Risk Level", "Explanation"];

/// 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    /// Metadata lines under the title.
    pub const MUTED: Rgb = Rgb(100, 100, 100);
    /// Attribution footer.
    pub const FAINT: Rgb = Rgb(150, 150, 150);
    /// Table header fill.
    pub const HEADER_FILL: Rgb = Rgb(41, 128, 185);
    /// Fill of every second body row.
    pub const STRIPE_FILL: Rgb = Rgb(240, 240, 240);
}

/// Horizontal text alignment inside a table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Center,
}

/// One positioned line of text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextRun {
    pub x: f64,
    pub y: f64,
    /// Font size in points.
    pub size: f64,
    pub bold: bool,
    pub color: Rgb,
    pub text: String,
}

/// A drawing primitive placed on a page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayoutElement {
    Text(TextRun),
    Rule {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        width: f64,
    },
    FilledRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: Rgb,
    },
}

/// Everything drawn on one page, in paint order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportPage {
    pub elements: Vec<LayoutElement>,
}

impl ReportPage {
    /// Text runs on this page, in paint order.
    pub fn texts(&self) -> impl Iterator<Item = &TextRun> + '_ {
        self.elements.iter().filter_map(|e| match e {
            LayoutElement::Text(run) => Some(run),
            _ => None,
        })
    }
}

/// One table row of a risk section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    /// 1-based position within the section.
    pub index: usize,
    pub clause_text: String,
    pub risk_label: String,
    pub explanation: String,
}

impl ReportRow {
    /// Cell texts in column order.
    pub fn cells(&self) -> [String; 4] {
        [
            self.index.to_string(),
            self.clause_text.clone(),
            self.risk_label.clone(),
            self.explanation.clone(),
        ]
    }
}

/// A risk-tier section of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSection {
    pub tier: RiskTier,
    pub title: String,
    pub rows: Vec<ReportRow>,
    /// Page (0-based) holding the section header.
    pub start_page: usize,
}

/// A composed, paginated report.
///
/// Derived on demand from an analysis; never stored as workflow state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportDocument {
    /// Download name without extension.
    pub base_filename: String,
    pub title: String,
    pub document_name: String,
    pub generated_on: String,
    pub summary_lines: Vec<String>,
    pub sections: Vec<ReportSection>,
    pub footer: String,
    pub pages: Vec<ReportPage>,
}

impl ReportDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Section for a tier, if that tier had any clauses.
    pub fn section(&self, tier: RiskTier) -> Option<&ReportSection> {
        self.sections.iter().find(|s| s.tier == tier)
    }

    /// Every text run in reading order across pages.
    pub fn all_text(&self) -> Vec<&str> {
        self.pages
            .iter()
            .flat_map(|page| page.texts().map(|run| run.text.as_str()))
            .collect()
    }
}
