//! # gridbook-xlsx
//!
//! An in-memory XLSX (Office Open XML) container for gridbook.
//!
//! A [`Container`] holds named sheets of text cells plus a table of named
//! styles, and reads or writes itself as an `.xlsx` archive. Every method takes
//! `&self`, so one container can be filled from several threads at once as long
//! as each thread writes its own sheet.
//!
//! ## Example
//!
//! ```rust
//! use gridbook_xlsx::{Container, StyleSpec};
//!
//! let container = Container::new();
//! let bold = container.register_style(&StyleSpec::new().with_bold(true));
//!
//! container.set_cell_value("Sheet1", "A1", "Hello").unwrap();
//! container.set_cell_style("Sheet1", "A1", "A1", bold).unwrap();
//!
//! let bytes = container.write_to_buffer().unwrap();
//! let reopened = Container::open(&bytes).unwrap();
//! assert_eq!(reopened.get_cell_value("Sheet1", "A1").unwrap(), "Hello");
//! ```

pub mod address;
pub mod container;
pub mod error;
pub mod reader;
pub mod style;
pub mod writer;

pub use address::CellRef;
pub use container::{Container, DEFAULT_SHEET_NAME};
pub use error::{XlsxError, XlsxResult};
pub use reader::XlsxReader;
pub use style::{FontSpec, StyleId, StyleSpec};
pub use writer::XlsxWriter;

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;
