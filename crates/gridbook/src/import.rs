//! Document import
//!
//! Each sheet of a container is scanned by its own task. Row 1 supplies the
//! header labels. For every scanned row `i` (1-based, up to the row limit) the
//! cells of row `i + 1` are read, and each non-empty one becomes a
//! single-cell [`Row`] named after its address. Sheets that yield no rows are
//! left out of the document.

use std::path::Path;

use gridbook_core::{cell_address, Cell, Document, Header, Row, Sheet, HEADER_ROW};
use gridbook_xlsx::Container;

use crate::error::{Error, Result};
use crate::options::{FillMode, ReadOptions};
use crate::pool::fan_out;

/// Imports documents from XLSX
#[derive(Debug, Clone)]
pub struct DocumentReader {
    options: ReadOptions,
}

impl Default for DocumentReader {
    fn default() -> Self {
        Self::new(ReadOptions::default())
    }
}

impl DocumentReader {
    /// Create a reader; the options' limits are normalized
    pub fn new(options: ReadOptions) -> Self {
        Self {
            options: options.normalized(),
        }
    }

    /// Get the normalized options
    pub fn options(&self) -> &ReadOptions {
        &self.options
    }

    /// Import a document from the bytes of an `.xlsx` file
    pub fn read(&self, bytes: &[u8]) -> Result<Document> {
        let container = Container::open(bytes)?;
        self.read_container(&container)
    }

    /// Import a document from an `.xlsx` file
    pub fn read_file<P: AsRef<Path>>(&self, path: P) -> Result<Document> {
        let container = Container::open_file(path)?;
        self.read_container(&container)
    }

    /// Import a document from an open container
    ///
    /// Sheets keep the container's order. The document gets a generated name.
    pub fn read_container(&self, container: &Container) -> Result<Document> {
        let names = container.sheet_names();
        log::debug!(
            "reading {} sheet(s), up to {} row(s) x {} column(s) each",
            names.len(),
            self.options.max_rows,
            self.options.max_columns
        );

        let extracted = fan_out(&names, self.options.workers, |name| {
            self.extract_sheet(container, name)
        })?;

        let mut document = Document::new("");
        for sheet in extracted.into_iter().flatten() {
            document.add_sheet(sheet);
        }
        Ok(document)
    }

    fn extract_sheet(&self, container: &Container, name: &str) -> Result<Option<Sheet>> {
        // Nothing past the last valued cell can be non-empty
        let Some((last_row, last_col)) = container.used_extent(name)? else {
            log::debug!("sheet '{}' is empty, skipping", name);
            return Ok(None);
        };
        let columns = self.options.max_columns.min(usize::from(last_col) + 1);
        // Row i reads row i + 1, so row `last_row` (0-based) is the last one worth scanning
        let rows = (last_row as usize).min(self.options.max_rows) as u32;

        let mut sheet = Sheet::new(name);
        for col in 0..columns {
            let address = cell_address(HEADER_ROW, col)?;
            if let Some(value) = self.read_cell(container, name, &address)? {
                sheet.add_header(Header::new(value));
            }
        }

        for i in 1..=rows {
            for col in 0..columns {
                let address = cell_address(i + 1, col)?;
                if let Some(value) = self.read_cell(container, name, &address)? {
                    sheet.add_row(Row::from(Cell::new(value).with_name(address)));
                }
            }
        }

        if sheet.is_empty() {
            log::debug!("sheet '{}' has no data rows, skipping", name);
            return Ok(None);
        }
        log::debug!(
            "extracted sheet '{}' ({} header(s), {} row(s))",
            name,
            sheet.header_count(),
            sheet.row_count()
        );
        Ok(Some(sheet))
    }

    /// Read one cell; empty cells and, in best-effort mode, failed reads are `None`
    fn read_cell(&self, container: &Container, sheet: &str, address: &str) -> Result<Option<String>> {
        match container.get_cell_value(sheet, address) {
            Ok(value) if value.is_empty() => Ok(None),
            Ok(value) => Ok(Some(value)),
            Err(e) if self.options.mode == FillMode::BestEffort => {
                log::warn!("skipping cell {}!{}: {}", sheet, address, e);
                Ok(None)
            }
            Err(source) => Err(Error::CellRead {
                sheet: sheet.to_string(),
                address: address.to_string(),
                source,
            }),
        }
    }
}

/// Import a document from the bytes of an `.xlsx` file
///
/// `max_row_count` of 0 scans [`DEFAULT_MAX_ROWS`](gridbook_core::DEFAULT_MAX_ROWS)
/// rows; `max_cell_count` of 0, or above [`MAX_COLUMNS`](gridbook_core::MAX_COLUMNS),
/// scans all 26 columns.
///
/// # Examples
/// ```
/// use gridbook::prelude::*;
///
/// let mut sheet = Sheet::new("S");
/// sheet.add_header(Header::new("H1"));
/// sheet.add_row(Row::from(Cell::new("X")));
/// let mut document = Document::new("doc");
/// document.add_sheet(sheet);
///
/// let bytes = document.to_buffer().unwrap();
/// let read = read_from_buffer(&bytes, 0, 0).unwrap();
///
/// let sheet = read.sheet("S").unwrap();
/// assert_eq!(sheet.rows()[0].cells()[0].value(), &CellValue::text("X"));
/// ```
pub fn read_from_buffer(bytes: &[u8], max_row_count: usize, max_cell_count: usize) -> Result<Document> {
    DocumentReader::new(ReadOptions::new(max_row_count, max_cell_count)).read(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridbook_core::CellValue;

    fn container_with(cells: &[(&str, &str)]) -> Container {
        let container = Container::new();
        for (address, value) in cells {
            container.set_cell_value("Sheet1", address, *value).unwrap();
        }
        container
    }

    #[test]
    fn test_header_row_and_data_rows() {
        let container = container_with(&[("A1", "id"), ("B1", "name"), ("A2", "1"), ("B2", "ann")]);
        let doc = DocumentReader::default().read_container(&container).unwrap();

        let sheet = doc.sheet("Sheet1").unwrap();
        let headers: Vec<&str> = sheet.headers().iter().map(Header::name).collect();
        assert_eq!(headers, vec!["id", "name"]);

        assert_eq!(sheet.row_count(), 2);
        let first = &sheet.rows()[0].cells()[0];
        assert_eq!(first.value(), &CellValue::text("1"));
        assert_eq!(first.name(), Some("A2"));
        assert_eq!(sheet.rows()[1].cells()[0].name(), Some("B2"));
    }

    #[test]
    fn test_empty_cells_are_skipped() {
        let container = container_with(&[("C5", "far")]);
        let doc = DocumentReader::default().read_container(&container).unwrap();

        let sheet = doc.sheet("Sheet1").unwrap();
        assert_eq!(sheet.header_count(), 0);
        assert_eq!(sheet.row_count(), 1);
        assert_eq!(sheet.rows()[0].cells()[0].name(), Some("C5"));
    }

    #[test]
    fn test_header_only_sheet_is_dropped() {
        let container = container_with(&[("A1", "id"), ("B1", "name")]);
        let doc = DocumentReader::default().read_container(&container).unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn test_columns_past_z_are_never_scanned() {
        let container = container_with(&[("Z2", "last"), ("AA2", "beyond")]);
        let doc = DocumentReader::default().read_container(&container).unwrap();

        let sheet = doc.sheet("Sheet1").unwrap();
        assert_eq!(sheet.row_count(), 1);
        assert_eq!(sheet.rows()[0].cells()[0].value(), &CellValue::text("last"));
    }

    #[test]
    fn test_document_gets_generated_name() {
        let container = container_with(&[("A2", "x")]);
        let a = DocumentReader::default().read_container(&container).unwrap();
        let b = DocumentReader::default().read_container(&container).unwrap();
        assert!(!a.name().is_empty());
        assert_ne!(a.name(), b.name());
    }

    #[test]
    fn test_strict_read_of_missing_sheet() {
        let reader = DocumentReader::new(ReadOptions::default().with_mode(FillMode::Strict));
        let container = Container::new();
        assert!(matches!(
            reader.read_cell(&container, "Missing", "A1"),
            Err(Error::CellRead { .. })
        ));

        let reader = DocumentReader::default();
        assert_eq!(reader.read_cell(&container, "Missing", "A1").unwrap(), None);
    }
}
