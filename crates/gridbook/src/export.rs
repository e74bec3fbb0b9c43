//! Document export
//!
//! Every populated sheet of a document becomes one sheet of a fresh
//! [`Container`]: header labels go into row 1, body rows start at row 2, and a
//! cell's position in its row decides its column. Sheets are filled in
//! parallel, one task per sheet; each task only touches its own sheet.

use std::path::{Path, PathBuf};

use gridbook_core::{cell_address, stringify, Document, Sheet, FIRST_BODY_ROW, HEADER_ROW};
use gridbook_xlsx::{Container, StyleId, DEFAULT_SHEET_NAME, MAX_SHEET_NAME_LEN};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::options::{FillMode, WriteOptions};
use crate::pool::fan_out;

/// Exports documents to XLSX
#[derive(Debug, Clone, Default)]
pub struct DocumentWriter {
    options: WriteOptions,
}

impl DocumentWriter {
    /// Create a writer with the given options
    pub fn new(options: WriteOptions) -> Self {
        Self { options }
    }

    /// Get the options
    pub fn options(&self) -> &WriteOptions {
        &self.options
    }

    /// Build a container holding the document's populated sheets
    ///
    /// Fails with [`Error::NoSheets`] when the document has no sheets at all.
    /// Sheets without rows are skipped; if none are left the container keeps
    /// its empty default sheet.
    pub fn build(&self, document: &Document) -> Result<Container> {
        if document.is_empty() {
            return Err(Error::NoSheets {
                document: document.file_name(),
            });
        }

        let container = Container::new();
        let populated: Vec<&Sheet> = document.sheets().iter().filter(|s| !s.is_empty()).collect();
        if populated.is_empty() {
            log::debug!("document '{}' has no rows to export", document.name());
            return Ok(container);
        }

        // The default sheet is swapped for a throwaway one so a document sheet
        // may itself be called "Sheet1".
        let placeholder = placeholder_name();
        container.new_sheet(&placeholder)?;
        container.delete_sheet(DEFAULT_SHEET_NAME)?;

        // Registered up front so the fill tasks never touch the style table
        let styles = FillStyles {
            header: container.register_style(&self.options.header_style),
            body: container.register_style(&self.options.body_style),
        };

        for (i, sheet) in populated.iter().enumerate() {
            let index = container.new_sheet(sheet.name())?;
            if i == 0 {
                container.set_active_sheet(index)?;
            }
            log::debug!("created sheet '{}' at index {}", sheet.name(), index);
        }

        let mode = self.options.mode;
        fan_out(&populated, self.options.workers, |sheet| {
            fill_sheet(&container, sheet, styles, mode)
        })?;

        container.delete_sheet(&placeholder)?;
        log::debug!(
            "exported document '{}' with {} sheet(s)",
            document.name(),
            populated.len()
        );
        Ok(container)
    }

    /// Export a document to the bytes of an `.xlsx` file
    pub fn to_buffer(&self, document: &Document) -> Result<Vec<u8>> {
        let container = self.build(document)?;
        Ok(container.write_to_buffer()?)
    }

    /// Export a document into the directory `location`
    ///
    /// The file is named after [`Document::file_name`]; its full path is
    /// returned.
    pub fn save<P: AsRef<Path>>(&self, document: &Document, location: P) -> Result<PathBuf> {
        let container = self.build(document)?;
        let path = location.as_ref().join(document.file_name());
        container.save_as(&path)?;
        log::debug!("saved document to {}", path.display());
        Ok(path)
    }
}

/// Extension trait for [`Document`] to export with default options
pub trait DocumentExt {
    /// Export to the bytes of an `.xlsx` file
    fn to_buffer(&self) -> Result<Vec<u8>>;

    /// Export into the directory `location`, returning the written path
    fn save<P: AsRef<Path>>(&self, location: P) -> Result<PathBuf>;

    /// Build the container without serializing it
    fn to_container(&self) -> Result<Container>;
}

impl DocumentExt for Document {
    fn to_buffer(&self) -> Result<Vec<u8>> {
        DocumentWriter::default().to_buffer(self)
    }

    fn save<P: AsRef<Path>>(&self, location: P) -> Result<PathBuf> {
        DocumentWriter::default().save(self, location)
    }

    fn to_container(&self) -> Result<Container> {
        DocumentWriter::default().build(self)
    }
}

#[derive(Debug, Clone, Copy)]
struct FillStyles {
    header: StyleId,
    body: StyleId,
}

fn placeholder_name() -> String {
    let mut name = Uuid::new_v4().simple().to_string();
    name.truncate(MAX_SHEET_NAME_LEN);
    name
}

fn fill_sheet(container: &Container, sheet: &Sheet, styles: FillStyles, mode: FillMode) -> Result<()> {
    let name = sheet.name();

    for (col, header) in sheet.headers().iter().enumerate() {
        let address = cell_address(HEADER_ROW, col)?;
        put_cell(container, mode, name, &address, header.name(), styles.header)?;
    }

    for (i, row) in sheet.rows().iter().enumerate() {
        let row_number = u32::try_from(i)
            .ok()
            .and_then(|i| i.checked_add(FIRST_BODY_ROW))
            .unwrap_or(u32::MAX);
        for (col, cell) in row.cells().iter().enumerate() {
            let address = cell_address(row_number, col)?;
            put_cell(container, mode, name, &address, &stringify(cell.value()), styles.body)?;
        }
    }

    log::debug!(
        "filled sheet '{}' ({} header(s), {} row(s))",
        name,
        sheet.header_count(),
        sheet.row_count()
    );
    Ok(())
}

fn put_cell(
    container: &Container,
    mode: FillMode,
    sheet: &str,
    address: &str,
    value: &str,
    style: StyleId,
) -> Result<()> {
    let written = container
        .set_cell_value(sheet, address, value)
        .and_then(|()| container.set_cell_style(sheet, address, address, style));

    match (written, mode) {
        (Ok(()), _) => Ok(()),
        (Err(e), FillMode::BestEffort) => {
            log::warn!("skipping cell {}!{}: {}", sheet, address, e);
            Ok(())
        }
        (Err(source), FillMode::Strict) => Err(Error::CellWrite {
            sheet: sheet.to_string(),
            address: address.to_string(),
            source,
        }),
    }
}
