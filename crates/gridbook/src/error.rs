//! Error types for the export and import pipelines

use gridbook_xlsx::XlsxError;
use thiserror::Error;

/// Result type for gridbook operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by [`DocumentWriter`](crate::DocumentWriter) and
/// [`DocumentReader`](crate::DocumentReader)
#[derive(Debug, Error)]
pub enum Error {
    /// The document handed to the exporter has no sheets
    #[error("Document '{document}' has no sheets")]
    NoSheets {
        /// File name of the rejected document
        document: String,
    },

    /// Coordinate mapping error, e.g. a column past `Z`
    #[error(transparent)]
    Core(#[from] gridbook_core::Error),

    /// Container error (open, save, sheet management)
    #[error(transparent)]
    Xlsx(#[from] XlsxError),

    /// A cell could not be written (strict mode only)
    #[error("Failed to write cell {sheet}!{address}: {source}")]
    CellWrite {
        /// Sheet name
        sheet: String,
        /// Cell address
        address: String,
        /// Underlying container error
        #[source]
        source: XlsxError,
    },

    /// A cell could not be read (strict mode only)
    #[error("Failed to read cell {sheet}!{address}: {source}")]
    CellRead {
        /// Sheet name
        sheet: String,
        /// Cell address
        address: String,
        /// Underlying container error
        #[source]
        source: XlsxError,
    },
}
