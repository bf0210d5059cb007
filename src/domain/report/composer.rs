//! Deterministic report layout.
//!
//! Lays out a title block, document metadata, the wrapped executive summary
//! and one table per non-empty risk tier (high, moderate, low), then an
//! attribution footer. Pages break on vertical overflow: before a section
//! that cannot fit its header and first row, inside a table (the header row is
//! repeated on the new page and rows taller than the remaining space are
//! split by line), inside a long summary, and before the footer.

use super::layout::{
    Align, LayoutElement, ReportDocument, ReportPage, ReportRow, ReportSection, Rgb, TextRun,
    COLUMN_HEADERS, COLUMN_WIDTHS, CONTENT_BOTTOM, CONTENT_WIDTH, CONTINUATION_TOP, FOOTER_LIMIT,
    MARGIN,
};
use super::metrics::{text_width, wrap_text, MM_PER_PT};
use crate::domain::foundation::Timestamp;
use crate::domain::policy::{AnalysisResult, Clause, Document, RiskTier, TextSanitizer};

pub const REPORT_TITLE: &str = "TLDR Insurance Policy Analysis Report";
pub const SUMMARY_HEADING: &str = "EXECUTIVE SUMMARY:";
pub const FOOTER_TEXT: &str = "Generated by TLDR - Insurance Policy Simplification Platform";

const TITLE_SIZE: f64 = 18.0;
const META_SIZE: f64 = 11.0;
const HEADING_SIZE: f64 = 14.0;
const BODY_SIZE: f64 = 11.0;
const TABLE_SIZE: f64 = 9.0;
const FOOTER_SIZE: f64 = 10.0;

const TITLE_Y: f64 = 20.0;
const DOCUMENT_LINE_Y: f64 = 30.0;
const DATE_LINE_Y: f64 = 37.0;
const RULE_Y: f64 = 42.0;
const RULE_WIDTH: f64 = 0.5;
const SUMMARY_HEADING_Y: f64 = 50.0;
const SUMMARY_TOP: f64 = 57.0;
const SUMMARY_LINE_HEIGHT: f64 = 5.5;

/// Gap between a block and the next section header.
const SECTION_GAP: f64 = 10.0;
/// Gap between a section header baseline and its table.
const TABLE_OFFSET: f64 = 5.0;
/// Inner cell padding on every side.
const CELL_PADDING: f64 = 1.76;
/// Distance from footer check position to footer baseline.
const FOOTER_OFFSET: f64 = 15.0;
const FOOTER_CLEARANCE: f64 = 20.0;

fn table_line_height() -> f64 {
    TABLE_SIZE * 1.15 * MM_PER_PT
}

/// Builds [`ReportDocument`]s from completed analyses.
#[derive(Debug, Clone, Default)]
pub struct ReportComposer;

impl ReportComposer {
    pub fn new() -> Self {
        Self
    }

    /// Download name (without extension) for a document's report.
    pub fn base_filename(doc: &Document) -> String {
        format!("TLDR_Report_{}", doc.stem())
    }

    /// Lays out the report.
    ///
    /// Output depends only on the arguments: the same document, result and
    /// generation time always produce an identical report.
    pub fn compose(
        &self,
        doc: &Document,
        result: &AnalysisResult,
        generated_at: Timestamp,
    ) -> ReportDocument {
        let mut canvas = Canvas::new();
        let generated_on = generated_at.date_label();

        canvas.text(MARGIN, TITLE_Y, TITLE_SIZE, true, Rgb::BLACK, REPORT_TITLE);
        canvas.text(
            MARGIN,
            DOCUMENT_LINE_Y,
            META_SIZE,
            false,
            Rgb::MUTED,
            format!("Document: {}", doc.name()),
        );
        canvas.text(
            MARGIN,
            DATE_LINE_Y,
            META_SIZE,
            false,
            Rgb::MUTED,
            format!("Analysis Date: {}", generated_on),
        );
        canvas.push(LayoutElement::Rule {
            x1: MARGIN,
            y1: RULE_Y,
            x2: MARGIN + CONTENT_WIDTH,
            y2: RULE_Y,
            width: RULE_WIDTH,
        });

        canvas.text(
            MARGIN,
            SUMMARY_HEADING_Y,
            HEADING_SIZE,
            true,
            Rgb::BLACK,
            SUMMARY_HEADING,
        );

        let summary_lines = wrap_text(result.summary(), CONTENT_WIDTH, BODY_SIZE);
        let mut y = SUMMARY_TOP;
        for line in &summary_lines {
            if y > CONTENT_BOTTOM {
                canvas.new_page();
                y = CONTINUATION_TOP;
            }
            if !line.is_empty() {
                canvas.text(MARGIN, y, BODY_SIZE, false, Rgb::BLACK, line.clone());
            }
            y += SUMMARY_LINE_HEIGHT;
        }
        y += SECTION_GAP;

        let buckets = result.buckets();
        let mut sections = Vec::new();
        for (tier, clauses) in buckets.non_empty() {
            let (section, next_y) = layout_section(&mut canvas, tier, clauses, y);
            sections.push(section);
            y = next_y;
        }

        if y + FOOTER_CLEARANCE > FOOTER_LIMIT {
            canvas.new_page();
            y = MARGIN;
        }
        canvas.text(
            MARGIN,
            y + FOOTER_OFFSET,
            FOOTER_SIZE,
            false,
            Rgb::FAINT,
            FOOTER_TEXT,
        );

        ReportDocument {
            base_filename: Self::base_filename(doc),
            title: REPORT_TITLE.to_string(),
            document_name: doc.name().to_string(),
            generated_on,
            summary_lines,
            sections,
            footer: FOOTER_TEXT.to_string(),
            pages: canvas.into_pages(),
        }
    }
}

/// A table row with its cells already wrapped to column width.
struct WrappedRow {
    cells: [Vec<String>; 4],
    height: f64,
}

impl WrappedRow {
    fn new(cells: [String; 4]) -> Self {
        Self::from_lines([0, 1, 2, 3].map(|i| {
            wrap_text(&cells[i], COLUMN_WIDTHS[i] - 2.0 * CELL_PADDING, TABLE_SIZE)
        }))
    }

    fn from_lines(cells: [Vec<String>; 4]) -> Self {
        let lines = cells.iter().map(Vec::len).max().unwrap_or(1).max(1);
        let height = lines as f64 * table_line_height() + 2.0 * CELL_PADDING;
        Self { cells, height }
    }

    /// Whole lines a row fragment can hold within `space`.
    fn lines_fitting(space: f64) -> usize {
        ((space - 2.0 * CELL_PADDING) / table_line_height())
            .floor()
            .max(0.0) as usize
    }

    /// Splits after the first `lines` lines of every cell.
    fn split(mut self, lines: usize) -> (WrappedRow, WrappedRow) {
        let tail = [0, 1, 2, 3].map(|i| {
            let cell = &mut self.cells[i];
            cell.split_off(lines.min(cell.len()))
        });
        (Self::from_lines(self.cells), Self::from_lines(tail))
    }
}

fn layout_section(
    canvas: &mut Canvas,
    tier: RiskTier,
    clauses: &[Clause],
    start_y: f64,
) -> (ReportSection, f64) {
    let rows: Vec<ReportRow> = clauses
        .iter()
        .enumerate()
        .map(|(i, clause)| ReportRow {
            index: i + 1,
            clause_text: TextSanitizer::clean(clause.text()),
            risk_label: tier.label().to_string(),
            explanation: TextSanitizer::clean(clause.explanation()),
        })
        .collect();

    let header = WrappedRow::new(COLUMN_HEADERS.map(String::from));
    let body: Vec<WrappedRow> = rows.iter().map(|r| WrappedRow::new(r.cells())).collect();

    // Header, table header row and first body row must share a page. A first
    // row taller than a page starts a fresh one and is split there.
    let needed = TABLE_OFFSET + header.height + body.first().map_or(0.0, |r| r.height);
    let mut y = start_y;
    if y + needed > CONTENT_BOTTOM {
        canvas.new_page();
        y = CONTINUATION_TOP;
    }

    let start_page = canvas.current_page();
    canvas.text(MARGIN, y, HEADING_SIZE, true, Rgb::BLACK, tier.section_title());

    let mut cursor = y + TABLE_OFFSET;
    draw_row(canvas, &header, cursor, Some(Rgb::HEADER_FILL), Rgb::WHITE, true);
    cursor += header.height;
    let mut rows_top = cursor;

    let page_rows_space = CONTENT_BOTTOM - MARGIN - header.height;
    for (i, row) in body.into_iter().enumerate() {
        let fill = (i % 2 == 1).then_some(Rgb::STRIPE_FILL);
        let mut pending = row;
        loop {
            let space = CONTENT_BOTTOM - cursor;
            if pending.height <= space {
                draw_row(canvas, &pending, cursor, fill, Rgb::BLACK, false);
                cursor += pending.height;
                break;
            }

            // Rows that fit on a fresh page move there whole; taller rows
            // are split by line and continue under a repeated header.
            let fit = WrappedRow::lines_fitting(space);
            if fit == 0 || (cursor > rows_top && pending.height <= page_rows_space) {
                cursor = continue_table(canvas, &header);
                rows_top = cursor;
                continue;
            }
            let (head, tail) = pending.split(fit);
            draw_row(canvas, &head, cursor, fill, Rgb::BLACK, false);
            cursor = continue_table(canvas, &header);
            rows_top = cursor;
            pending = tail;
        }
    }

    let section = ReportSection {
        tier,
        title: tier.section_title().to_string(),
        rows,
        start_page,
    };
    (section, cursor + SECTION_GAP)
}

/// Starts a new page with the table header row; returns the cursor below it.
fn continue_table(canvas: &mut Canvas, header: &WrappedRow) -> f64 {
    canvas.new_page();
    draw_row(canvas, header, MARGIN, Some(Rgb::HEADER_FILL), Rgb::WHITE, true);
    MARGIN + header.height
}

fn draw_row(
    canvas: &mut Canvas,
    row: &WrappedRow,
    top: f64,
    fill: Option<Rgb>,
    color: Rgb,
    bold: bool,
) {
    if let Some(fill) = fill {
        canvas.push(LayoutElement::FilledRect {
            x: MARGIN,
            y: top,
            width: COLUMN_WIDTHS.iter().sum(),
            height: row.height,
            fill,
        });
    }

    let line_height = table_line_height();
    let mut x = MARGIN;
    for (column, lines) in row.cells.iter().enumerate() {
        let width = COLUMN_WIDTHS[column];
        let align = column_align(column);
        for (i, line) in lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let text_x = match align {
                Align::Left => x + CELL_PADDING,
                Align::Center => x + (width - text_width(line, TABLE_SIZE)) / 2.0,
            };
            let baseline = top + CELL_PADDING + line_height * (i as f64 + 0.8);
            canvas.text(text_x, baseline, TABLE_SIZE, bold, color, line.clone());
        }
        x += width;
    }
}

fn column_align(column: usize) -> Align {
    match column {
        0 | 2 => Align::Center,
        _ => Align::Left,
    }
}

/// Page list with a current page that elements are appended to.
struct Canvas {
    pages: Vec<ReportPage>,
}

impl Canvas {
    fn new() -> Self {
        Self {
            pages: vec![ReportPage::default()],
        }
    }

    fn current_page(&self) -> usize {
        self.pages.len() - 1
    }

    fn new_page(&mut self) {
        self.pages.push(ReportPage::default());
    }

    fn push(&mut self, element: LayoutElement) {
        if let Some(page) = self.pages.last_mut() {
            page.elements.push(element);
        }
    }

    fn text(
        &mut self,
        x: f64,
        y: f64,
        size: f64,
        bold: bool,
        color: Rgb,
        text: impl Into<String>,
    ) {
        self.push(LayoutElement::Text(TextRun {
            x,
            y,
            size,
            bold,
            color,
            text: text.into(),
        }));
    }

    fn into_pages(self) -> Vec<ReportPage> {
        self.pages
    }
}
