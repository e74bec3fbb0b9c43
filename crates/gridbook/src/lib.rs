//! # gridbook
//!
//! Build tabular documents in memory and convert them to and from XLSX.
//!
//! A [`Document`] is an ordered list of [`Sheet`]s, each with a row of
//! [`Header`] labels and any number of [`Row`]s of [`Cell`]s. Exporting maps
//! headers onto row 1 and body rows onto rows 2 and below, one sheet per
//! worker. Importing scans every sheet of a container in parallel, up to a
//! row limit and at most 26 columns.
//!
//! ## Features
//!
//! - Export with a bold header style and a plain body style
//! - Blank-like values (`0`, `0.0`, `""`, no value) exported as `-`
//! - Bounded import with empty-cell filtering
//! - Best-effort or strict handling of per-cell failures
//!
//! ## Example
//!
//! ```rust
//! use gridbook::prelude::*;
//!
//! let mut sheet = Sheet::new("Orders");
//! sheet.add_headers([Header::new("Item"), Header::new("Qty")]);
//!
//! let mut row = Row::new();
//! row.add_cells([Cell::new("Widget"), Cell::new(3)]);
//! sheet.add_row(row);
//!
//! let mut document = Document::new("orders");
//! document.add_sheet(sheet);
//!
//! // Export
//! let bytes = document.to_buffer().unwrap();
//!
//! // Import
//! let imported = read_from_buffer(&bytes, 0, 0).unwrap();
//! assert_eq!(imported.sheet("Orders").unwrap().row_count(), 2);
//!
//! // Save to a directory
//! // let path = document.save("/tmp").unwrap(); // -> /tmp/orders.xlsx
//! ```

pub mod error;
pub mod export;
pub mod import;
pub mod options;
pub mod prelude;

mod pool;

pub use error::{Error, Result};
pub use export::{DocumentExt, DocumentWriter};
pub use import::{read_from_buffer, DocumentReader};
pub use options::{FillMode, ReadOptions, WriteOptions};

// Re-export model types
pub use gridbook_core::{
    cell_address, column_label, stringify, Cell, CellValue, Document, Header, Row, Sheet,
    DEFAULT_EXTENSION, DEFAULT_MAX_ROWS, EMPTY_PLACEHOLDER, MAX_COLUMNS,
};

// Re-export container types
pub use gridbook_xlsx::{Container, FontSpec, StyleId, StyleSpec, XlsxError};
