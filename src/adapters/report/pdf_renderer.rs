//! PDF Renderer - lopdf implementation of the ReportRenderer port.
//!
//! Each [`ReportPage`] becomes one A4 page whose content stream draws the
//! page's elements in order with the base-14 Helvetica fonts. Layout
//! coordinates (millimetres, origin top-left) are converted to PDF user space
//! (points, origin bottom-left).

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::domain::report::{
    LayoutElement, ReportDocument, ReportPage, Rgb, TextRun, PAGE_HEIGHT, PAGE_WIDTH,
};
use crate::ports::{ExportError, ExportFormat, ReportRenderer};

const PT_PER_MM: f64 = 72.0 / 25.4;

const REGULAR_FONT: &[u8] = b"F1";
const BOLD_FONT: &[u8] = b"F2";

/// Renders reports as PDF.
///
/// Output is byte-for-byte reproducible: no creation dates or random
/// document ids are written.
#[derive(Debug, Clone, Default)]
pub struct PdfReportRenderer;

impl PdfReportRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl ReportRenderer for PdfReportRenderer {
    fn format(&self) -> ExportFormat {
        ExportFormat::Pdf
    }

    fn render(&self, report: &ReportDocument) -> Result<Vec<u8>, ExportError> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let regular_id = doc.add_object(font_dictionary("Helvetica"));
        let bold_id = doc.add_object(font_dictionary("Helvetica-Bold"));
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => regular_id,
                "F2" => bold_id,
            },
        });

        let mut kids = Vec::with_capacity(report.pages.len());
        for page in &report.pages {
            let page_id = add_page(&mut doc, page, pages_id, resources_id)?;
            kids.push(Object::Reference(page_id));
        }

        let page_count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_count,
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(mm_to_pt(PAGE_WIDTH)),
                    Object::Real(mm_to_pt(PAGE_HEIGHT)),
                ],
            }),
        );

        let info_id = doc.add_object(dictionary! {
            "Title" => Object::String(encode_text(&report.title), StringFormat::Literal),
            "Producer" => Object::string_literal("TLDR"),
        });
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));
        doc.trailer.set("Info", Object::Reference(info_id));

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| ExportError::pdf_failed(e.to_string()))?;

        tracing::debug!(
            pages = report.page_count(),
            bytes = buffer.len(),
            "rendered PDF report"
        );
        Ok(buffer)
    }
}

fn font_dictionary(base_font: &str) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => Object::Name(base_font.as_bytes().to_vec()),
        "Encoding" => "WinAnsiEncoding",
    }
}

fn add_page(
    doc: &mut Document,
    page: &ReportPage,
    pages_id: ObjectId,
    resources_id: ObjectId,
) -> Result<ObjectId, ExportError> {
    let mut operations = Vec::new();
    for element in &page.elements {
        draw_element(&mut operations, element);
    }

    let content = Content { operations };
    let bytes = content
        .encode()
        .map_err(|e| ExportError::pdf_failed(format!("content stream: {}", e)))?;
    let content_id = doc.add_object(Stream::new(Dictionary::new(), bytes));

    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
    }))
}

fn draw_element(ops: &mut Vec<Operation>, element: &LayoutElement) {
    match element {
        LayoutElement::Text(run) => draw_text(ops, run),
        LayoutElement::Rule {
            x1,
            y1,
            x2,
            y2,
            width,
        } => {
            ops.push(Operation::new("w", vec![Object::Real(mm_to_pt(*width))]));
            ops.push(Operation::new("RG", color_operands(Rgb::BLACK)));
            ops.push(Operation::new("m", vec![x_pt(*x1), y_pt(*y1)]));
            ops.push(Operation::new("l", vec![x_pt(*x2), y_pt(*y2)]));
            ops.push(Operation::new("S", vec![]));
        }
        LayoutElement::FilledRect {
            x,
            y,
            width,
            height,
            fill,
        } => {
            ops.push(Operation::new("rg", color_operands(*fill)));
            ops.push(Operation::new(
                "re",
                vec![
                    x_pt(*x),
                    y_pt(y + height),
                    Object::Real(mm_to_pt(*width)),
                    Object::Real(mm_to_pt(*height)),
                ],
            ));
            ops.push(Operation::new("f", vec![]));
        }
    }
}

fn draw_text(ops: &mut Vec<Operation>, run: &TextRun) {
    let font = if run.bold { BOLD_FONT } else { REGULAR_FONT };

    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new(
        "Tf",
        vec![Object::Name(font.to_vec()), Object::Real(run.size as f32)],
    ));
    ops.push(Operation::new("rg", color_operands(run.color)));
    ops.push(Operation::new("Td", vec![x_pt(run.x), y_pt(run.y)]));
    ops.push(Operation::new(
        "Tj",
        vec![Object::String(encode_text(&run.text), StringFormat::Literal)],
    ));
    ops.push(Operation::new("ET", vec![]));
}

fn mm_to_pt(mm: f64) -> f32 {
    (mm * PT_PER_MM) as f32
}

fn x_pt(x: f64) -> Object {
    Object::Real(mm_to_pt(x))
}

/// Flips a top-origin y coordinate into PDF space.
fn y_pt(y: f64) -> Object {
    Object::Real(mm_to_pt(PAGE_HEIGHT - y))
}

fn color_operands(color: Rgb) -> Vec<Object> {
    let Rgb(r, g, b) = color;
    [r, g, b]
        .into_iter()
        .map(|c| Object::Real(c as f32 / 255.0))
        .collect()
}

/// Encodes text for a WinAnsi-encoded standard font.
///
/// Characters outside the encoding become `?`.
fn encode_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\u{a0}'..='\u{ff}' => c as u32 as u8,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201c}' => 0x93,
            '\u{201d}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{20ac}' => 0x80,
            _ => b'?',
        })
        .collect()
}
