use crate::adapters::decode::join_wrapped_rows;
use crate::core::DocumentDecoder;
use crate::domain::model::{Document, Page, Row, Table};
use crate::utils::error::{GradeCalcError, Result};
use pdf_extract::{MediaBox, OutputDev, OutputError, Transform};

type DeviceResult = std::result::Result<(), OutputError>;

fn unreadable(e: impl std::fmt::Display) -> GradeCalcError {
    GradeCalcError::extraction(format!("unreadable PDF: {}", e))
}

// Distances below are in units of the glyph's rendered font size.
const CELL_GAP: f64 = 1.0;
const WORD_GAP: f64 = 0.1;
const LINE_TOLERANCE: f64 = 0.5;
const TABLE_GAP: f64 = 3.0;

#[derive(Debug, Clone)]
struct Glyph {
    x: f64,
    end: f64,
    y: f64,
    size: f64,
    text: String,
}

/// Records every drawn glyph with its position, one list per page.
#[derive(Debug, Default)]
struct GlyphCollector {
    page_height: f64,
    pages: Vec<Vec<Glyph>>,
}

impl OutputDev for GlyphCollector {
    fn begin_page(
        &mut self,
        _page_num: u32,
        media_box: &MediaBox,
        _art_box: Option<(f64, f64, f64, f64)>,
    ) -> DeviceResult {
        self.page_height = media_box.ury - media_box.lly;
        self.pages.push(Vec::new());
        Ok(())
    }

    fn end_page(&mut self) -> DeviceResult {
        Ok(())
    }

    fn output_character(
        &mut self,
        trm: &Transform,
        width: f64,
        _spacing: f64,
        font_size: f64,
        char: &str,
    ) -> DeviceResult {
        if char.trim().is_empty() {
            return Ok(());
        }

        let scale_x = font_size * (trm.m11 + trm.m21);
        let scale_y = font_size * (trm.m12 + trm.m22);
        let size = (scale_x * scale_y).abs().sqrt().max(1.0);
        let x = trm.m31;

        // y grows downwards so lines sort top to bottom
        let glyph = Glyph {
            x,
            end: x + width * size,
            y: self.page_height - trm.m32,
            size,
            text: char.to_string(),
        };
        if let Some(page) = self.pages.last_mut() {
            page.push(glyph);
        }
        Ok(())
    }

    fn begin_word(&mut self) -> DeviceResult {
        Ok(())
    }

    fn end_word(&mut self) -> DeviceResult {
        Ok(())
    }

    fn end_line(&mut self) -> DeviceResult {
        Ok(())
    }
}

fn group_lines(mut glyphs: Vec<Glyph>) -> Vec<Vec<Glyph>> {
    glyphs.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));

    let mut lines: Vec<Vec<Glyph>> = Vec::new();
    for glyph in glyphs {
        match lines.last_mut() {
            Some(line) if (glyph.y - line[0].y).abs() <= glyph.size * LINE_TOLERANCE => {
                line.push(glyph)
            }
            _ => lines.push(vec![glyph]),
        }
    }
    for line in &mut lines {
        line.sort_by(|a, b| a.x.total_cmp(&b.x));
    }
    lines
}

fn line_cells(line: &[Glyph]) -> Row {
    let mut row = Vec::new();
    let mut cell = String::new();
    let mut last_end: Option<f64> = None;

    for glyph in line {
        if let Some(end) = last_end {
            let gap = glyph.x - end;
            if gap > glyph.size * CELL_GAP {
                row.push(Some(std::mem::take(&mut cell)));
            } else if gap > glyph.size * WORD_GAP {
                cell.push(' ');
            }
        }
        cell.push_str(&glyph.text);
        last_end = Some(glyph.end);
    }
    if !cell.is_empty() {
        row.push(Some(cell));
    }
    row
}

fn page_tables(glyphs: Vec<Glyph>) -> Vec<Table> {
    let mut tables = Vec::new();
    let mut rows = Vec::new();
    let mut previous_y: Option<f64> = None;

    for line in group_lines(glyphs) {
        let (y, size) = (line[0].y, line[0].size);
        if previous_y.is_some_and(|previous| y - previous > size * TABLE_GAP) && !rows.is_empty() {
            tables.push(Table {
                rows: join_wrapped_rows(std::mem::take(&mut rows)),
            });
        }
        previous_y = Some(y);
        rows.push(line_cells(&line));
    }
    if !rows.is_empty() {
        tables.push(Table {
            rows: join_wrapped_rows(rows),
        });
    }
    tables
}

/// Rebuilds table rows from glyph positions: glyphs sharing a baseline form a
/// row, wide horizontal gaps separate cells, tall vertical gaps separate tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfDecoder;

impl DocumentDecoder for PdfDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<Document> {
        if !bytes.starts_with(b"%PDF-") {
            return Err(GradeCalcError::extraction("document is not a PDF file"));
        }

        let mut pdf = pdf_extract::Document::load_mem(bytes).map_err(unreadable)?;
        if pdf.is_encrypted() {
            pdf.decrypt("").map_err(unreadable)?;
        }

        let mut collector = GlyphCollector::default();
        pdf_extract::output_doc(&pdf, &mut collector).map_err(unreadable)?;
        tracing::debug!(
            "Collected {} glyph(s) over {} page(s)",
            collector.pages.iter().map(Vec::len).sum::<usize>(),
            collector.pages.len()
        );

        let pages = collector
            .pages
            .into_iter()
            .map(|glyphs| Page {
                tables: page_tables(glyphs),
            })
            .collect();
        Ok(Document { pages })
    }
}
