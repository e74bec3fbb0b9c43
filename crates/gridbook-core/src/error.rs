//! Error types for gridbook-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in gridbook-core
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Column index past the last addressable column
    #[error("Column index {index} out of range (supported columns: {max})")]
    ColumnOutOfRange { index: usize, max: usize },

    /// Row numbers are one-based
    #[error("Invalid row number: {0} (rows start at 1)")]
    InvalidRow(u32),
}
