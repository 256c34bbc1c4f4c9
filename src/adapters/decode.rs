use crate::core::parser::parse_decimal;
use crate::core::DocumentDecoder;
use crate::domain::model::{Cell, Document, Page, Row, Table};
use crate::utils::error::{GradeCalcError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;

const PAGE_BREAK: char = '\x0c';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Csv,
    Tsv,
    Text,
}

impl DocumentFormat {
    /// Guesses the format from a file extension, defaulting to PDF.
    pub fn from_path(path: &str) -> Self {
        Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
            .unwrap_or(Self::Pdf)
    }
}

impl FromStr for DocumentFormat {
    type Err = GradeCalcError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "csv" => Ok(Self::Csv),
            "tsv" => Ok(Self::Tsv),
            "txt" | "text" => Ok(Self::Text),
            other => Err(GradeCalcError::invalid_parameter(
                "format",
                other,
                "Supported formats: pdf, csv, tsv, text",
            )),
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pdf => "pdf",
            Self::Csv => "csv",
            Self::Tsv => "tsv",
            Self::Text => "text",
        };
        f.write_str(name)
    }
}

pub fn decoder_for(format: DocumentFormat) -> Result<Box<dyn DocumentDecoder>> {
    match format {
        #[cfg(feature = "pdf")]
        DocumentFormat::Pdf => Ok(Box::new(PdfDecoder)),
        #[cfg(not(feature = "pdf"))]
        DocumentFormat::Pdf => Err(GradeCalcError::config(
            "PDF support is not compiled in; rebuild with the `pdf` feature",
        )),
        DocumentFormat::Csv => Ok(Box::new(DelimitedDecoder::csv())),
        DocumentFormat::Tsv => Ok(Box::new(DelimitedDecoder::tsv())),
        DocumentFormat::Text => Ok(Box::new(LayoutTextDecoder)),
    }
}

fn as_text(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes)
        .map_err(|e| GradeCalcError::extraction(format!("document is not valid UTF-8 text: {}", e)))
}

fn to_cell(raw: &str) -> Cell {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Splits a page into blocks of consecutive non-blank lines.
fn table_blocks(page: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();

    for line in page.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

fn is_figure(cell: &str) -> bool {
    parse_decimal(cell).is_some()
}

/// The text of a row holding a single non-numeric cell, i.e. a wrapped line.
fn continuation_text(row: &Row) -> Option<&str> {
    let mut texts = row.iter().flatten();
    let only = texts.next()?;
    (texts.next().is_none() && !is_figure(only)).then_some(only.as_str())
}

fn name_cell_mut(row: &mut Row) -> Option<&mut String> {
    row.iter_mut().flatten().find(|cell| !is_figure(cell.as_str()))
}

/// Folds wrapped name lines back into the row above them. Only rows that
/// carry figures take continuations, so headings stay on their own.
pub(crate) fn join_wrapped_rows(rows: Vec<Row>) -> Vec<Row> {
    let mut joined: Vec<Row> = Vec::with_capacity(rows.len());
    for row in rows {
        if let Some(text) = continuation_text(&row) {
            let target = joined
                .last_mut()
                .filter(|previous| previous.iter().flatten().any(|cell| is_figure(cell)))
                .and_then(name_cell_mut);
            if let Some(name) = target {
                name.push(' ');
                name.push_str(text);
                continue;
            }
        }
        joined.push(row);
    }
    joined
}

fn column_gap() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\t|\s{2,}").expect("valid column gap regex"))
}

/// Plain-text layout: pages separated by form feeds, tables by blank lines,
/// columns by a tab or a run of two or more spaces. A line with a lone text
/// cell continues the name of the row above.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutTextDecoder;

impl LayoutTextDecoder {
    pub fn decode_text(&self, text: &str) -> Document {
        let pages = text
            .split(PAGE_BREAK)
            .map(|page| Page {
                tables: table_blocks(page)
                    .into_iter()
                    .map(|lines| Table {
                        rows: join_wrapped_rows(lines.into_iter().map(split_columns).collect()),
                    })
                    .collect(),
            })
            .collect();
        Document { pages }
    }
}

fn split_columns(line: &str) -> Row {
    column_gap().split(line.trim()).map(to_cell).collect()
}

impl DocumentDecoder for LayoutTextDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<Document> {
        Ok(self.decode_text(as_text(bytes)?))
    }
}

/// CSV or TSV exports of the curriculum tables, with the same page and table
/// separators as [`LayoutTextDecoder`].
#[derive(Debug, Clone, Copy)]
pub struct DelimitedDecoder {
    delimiter: u8,
}

impl DelimitedDecoder {
    pub fn csv() -> Self {
        Self { delimiter: b',' }
    }

    pub fn tsv() -> Self {
        Self { delimiter: b'\t' }
    }

    fn decode_table(&self, lines: &[&str]) -> Result<Table> {
        let block = lines.join("\n");
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .from_reader(block.as_bytes());

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record
                .map_err(|e| GradeCalcError::extraction(format!("malformed table data: {}", e)))?;
            rows.push(record.iter().map(to_cell).collect());
        }
        Ok(Table { rows })
    }
}

impl DocumentDecoder for DelimitedDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<Document> {
        let text = as_text(bytes)?;

        let mut pages = Vec::new();
        for page in text.split(PAGE_BREAK) {
            let tables = table_blocks(page)
                .iter()
                .map(|lines| self.decode_table(lines))
                .collect::<Result<Vec<_>>>()?;
            pages.push(Page { tables });
        }
        Ok(Document { pages })
    }
}

#[cfg(feature = "pdf")]
pub use crate::adapters::pdf::PdfDecoder;
