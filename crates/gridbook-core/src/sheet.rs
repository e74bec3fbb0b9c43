//! Sheet and header types

use crate::row::Row;

/// A column label
///
/// Its position among the sheet's headers is its column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Header {
    name: String,
}

impl Header {
    /// Create a header
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self { name: name.into() }
    }

    /// Get the label
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl From<&str> for Header {
    fn from(name: &str) -> Self {
        Header::new(name)
    }
}

impl From<String> for Header {
    fn from(name: String) -> Self {
        Header::new(name)
    }
}

/// A named page of headers and rows
///
/// Headers and rows are sized independently: nothing ties the number of
/// headers to the number of cells in any row. Sheet names are not checked for
/// uniqueness here; the container rejects duplicates when the document is
/// exported.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sheet {
    name: String,
    headers: Vec<Header>,
    rows: Vec<Row>,
}

impl Sheet {
    /// Create an empty sheet
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            headers: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Get the sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append one header
    pub fn add_header(&mut self, header: Header) {
        self.headers.push(header);
    }

    /// Append headers in order
    pub fn add_headers<I: IntoIterator<Item = Header>>(&mut self, headers: I) {
        self.headers.extend(headers);
    }

    /// Append a row
    pub fn add_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Get the headers
    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    /// Get the rows
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of headers
    pub fn header_count(&self) -> usize {
        self.headers.len()
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// A sheet without rows is skipped on export
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
