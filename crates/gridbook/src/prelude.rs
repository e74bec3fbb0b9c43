//! Prelude module - common imports for gridbook users
//!
//! ```rust
//! use gridbook::prelude::*;
//! ```

pub use crate::{
    // Import
    read_from_buffer,
    // Model types
    Cell,
    CellValue,
    Container,
    Document,
    DocumentExt,
    DocumentReader,
    DocumentWriter,
    // Error types
    Error,
    FillMode,
    Header,
    ReadOptions,
    Result,
    Row,
    Sheet,
    StyleSpec,
    WriteOptions,
};
