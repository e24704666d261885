//! PDF rendering of the summary: A4, Helvetica, concept on the left,
//! amount right-aligned, continued on a new page when the rows run out of
//! room.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, StringFormat, dictionary};
use std::fs;
use std::path::Path;
use sumatoria_core::format_amount;

use super::{RowKind, Summary};

const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN_X: f32 = 40.0;
const BOTTOM_LIMIT: f32 = 60.0;
const ROW_STEP: f32 = 16.0;
const TITLE_SIZE: f32 = 14.0;
const BODY_SIZE: f32 = 10.0;

const REGULAR: &str = "F1";
const BOLD: &str = "F2";

#[derive(Debug, Clone)]
pub struct PdfOptions {
    pub title: String,
    /// Printed under the title when set
    pub generated_at: Option<NaiveDateTime>,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            title: "Resumen de importes".to_string(),
            generated_at: None,
        }
    }
}

/// Helvetica advance widths (1/1000 em) for the glyphs amounts use.
/// Regular and bold agree on all of them.
fn glyph_width(c: char) -> f32 {
    match c {
        '0'..='9' | '$' => 556.0,
        ',' | '.' | ' ' => 278.0,
        '-' => 333.0,
        '%' => 889.0,
        _ => 556.0,
    }
}

fn text_width(s: &str, size: f32) -> f32 {
    s.chars().map(glyph_width).sum::<f32>() * size / 1000.0
}

/// WinAnsi bytes for the standard Type1 fonts; unmappable chars become `?`.
fn win_ansi(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| match u32::from(c) {
            0x20..=0x7e | 0xa0..=0xff => c as u8,
            _ => b'?',
        })
        .collect()
}

fn show_text(ops: &mut Vec<Operation>, font: &str, size: f32, x: f32, y: f32, text: &str) {
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new("Tf", vec![font.into(), size.into()]));
    ops.push(Operation::new("Td", vec![x.into(), y.into()]));
    ops.push(Operation::new(
        "Tj",
        vec![Object::String(win_ansi(text), StringFormat::Literal)],
    ));
    ops.push(Operation::new("ET", vec![]));
}

/// Lay the rows out into per-page operation lists.
fn layout(summary: &Summary, opts: &PdfOptions) -> Vec<Vec<Operation>> {
    let mut pages = Vec::new();
    let mut ops = Vec::new();

    let mut y = PAGE_HEIGHT - 40.0;
    show_text(&mut ops, BOLD, TITLE_SIZE, MARGIN_X, y, &opts.title);
    if let Some(at) = opts.generated_at {
        y -= ROW_STEP;
        let stamp = format!("Generado: {}", at.format("%d/%m/%Y %H:%M"));
        show_text(&mut ops, REGULAR, BODY_SIZE, MARGIN_X, y, &stamp);
    }
    y = PAGE_HEIGHT - 80.0;

    for row in &summary.rows {
        let font = if row.kind == RowKind::Total { BOLD } else { REGULAR };
        let amount = format_amount(row.amount);
        let amount_x = PAGE_WIDTH - MARGIN_X - text_width(&amount, BODY_SIZE);

        show_text(&mut ops, font, BODY_SIZE, MARGIN_X, y, &row.concept);
        show_text(&mut ops, font, BODY_SIZE, amount_x, y, &amount);

        y -= ROW_STEP;
        if y < BOTTOM_LIMIT {
            pages.push(std::mem::take(&mut ops));
            y = PAGE_HEIGHT - 60.0;
        }
    }

    if !ops.is_empty() || pages.is_empty() {
        pages.push(ops);
    }
    pages
}

/// Render the summary as PDF bytes.
pub fn render_pdf(summary: &Summary, opts: &PdfOptions) -> Result<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let font_bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            REGULAR => font_regular,
            BOLD => font_bold,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for operations in layout(summary, opts) {
        let content = Content { operations };
        let encoded = content.encode().context("encode page content")?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id: ObjectId = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).context("serialize pdf")?;
    Ok(buf)
}

/// Render and write the summary PDF to `path`.
pub fn write_pdf(path: &Path, summary: &Summary, opts: &PdfOptions) -> Result<()> {
    let bytes = render_pdf(summary, opts)?;
    fs::write(path, bytes).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
