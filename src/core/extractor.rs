use crate::domain::model::{Cell, Document};
use crate::utils::error::{GradeCalcError, Result};

/// Rows shorter than this cannot hold a name and a credit value.
pub const MIN_ROW_CELLS: usize = 2;

/// Flattens every table of every page into one lazy row stream.
///
/// Order is page, then table within the page, then row within the table.
/// Cell contents are not inspected here. Fails with `ExtractionFailed` when
/// the document carries no pages or no tables at all.
pub fn extract_rows(document: &Document) -> Result<impl Iterator<Item = &[Cell]> + '_> {
    if document.pages.is_empty() {
        return Err(GradeCalcError::extraction("document has no pages"));
    }
    if document.table_count() == 0 {
        return Err(GradeCalcError::extraction(format!(
            "no tables found in {} page(s)",
            document.pages.len()
        )));
    }

    Ok(document
        .pages
        .iter()
        .flat_map(|page| page.tables.iter())
        .flat_map(|table| table.rows.iter())
        .filter(|row| row.len() >= MIN_ROW_CELLS)
        .map(Vec::as_slice))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Page, Table};

    fn table(rows: &[&[&str]]) -> Table {
        Table {
            rows: rows
                .iter()
                .map(|row| row.iter().map(|cell| Some(cell.to_string())).collect())
                .collect(),
        }
    }

    #[test]
    fn test_extract_rows_preserves_document_order() {
        let document = Document {
            pages: vec![
                Page {
                    tables: vec![table(&[&["a", "1"], &["b", "2"]]), table(&[&["c", "3"]])],
                },
                Page { tables: vec![] },
                Page {
                    tables: vec![table(&[&["d", "4"]])],
                },
            ],
        };

        let names: Vec<&str> = extract_rows(&document)
            .unwrap()
            .map(|row| row[0].as_deref().unwrap())
            .collect();
        assert_eq!(names, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_extract_rows_drops_short_rows() {
        let mut short = table(&[&["only"], &["name", "5"]]);
        short.rows.push(vec![]);
        let document = Document {
            pages: vec![Page {
                tables: vec![short],
            }],
        };

        assert_eq!(extract_rows(&document).unwrap().count(), 1);
    }

    #[test]
    fn test_extract_rows_fails_without_tables() {
        let empty = Document::default();
        assert!(matches!(
            extract_rows(&empty),
            Err(GradeCalcError::ExtractionFailed { .. })
        ));

        let no_tables = Document {
            pages: vec![Page::default(), Page::default()],
        };
        assert!(matches!(
            extract_rows(&no_tables),
            Err(GradeCalcError::ExtractionFailed { .. })
        ));
    }
}
