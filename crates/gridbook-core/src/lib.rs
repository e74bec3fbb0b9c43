//! # gridbook-core
//!
//! Core data structures for the gridbook tabular document library.
//!
//! This crate provides the types every gridbook pipeline operates on:
//! - [`Document`], [`Sheet`], [`Header`], [`Row`], [`Cell`] - The document model
//! - [`CellValue`] - Opaque, stringifiable cell values
//! - [`column_label`] and [`cell_address`] - Mapping indices onto A1-style coordinates
//! - [`stringify`] - Display formatting with blank normalization
//!
//! ## Example
//!
//! ```rust
//! use gridbook_core::{Cell, Document, Header, Row, Sheet};
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
//! assert_eq!(document.file_name(), "orders.xlsx");
//! ```

pub mod address;
pub mod cell;
pub mod document;
pub mod error;
pub mod row;
pub mod sheet;
pub mod value;

// Re-exports for convenience
pub use address::{cell_address, column_label};
pub use cell::Cell;
pub use document::Document;
pub use error::{Error, Result};
pub use row::Row;
pub use sheet::{Header, Sheet};
pub use value::{stringify, CellValue, EMPTY_PLACEHOLDER};

/// Number of columns the coordinate mapper can address (A through Z)
pub const MAX_COLUMNS: usize = 26;

/// Rows scanned per sheet when reading, unless the caller asks for fewer or more
pub const DEFAULT_MAX_ROWS: usize = 10_000;

/// Extension appended to a document's name when it is exported
pub const DEFAULT_EXTENSION: &str = "xlsx";

/// One-based row that holds the header labels of every sheet
pub const HEADER_ROW: u32 = 1;

/// One-based row that holds the first body row of every sheet
pub const FIRST_BODY_ROW: u32 = 2;
