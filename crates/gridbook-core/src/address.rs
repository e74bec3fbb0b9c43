//! Column labels and cell addresses
//!
//! The mapper only knows the single-letter columns `A`..`Z`. Anything past
//! [`MAX_COLUMNS`] is reported as [`Error::ColumnOutOfRange`] instead of being
//! wrapped into multi-letter labels, so documents wider than 26 columns fail
//! loudly in both the export and the import pipeline.

use crate::error::{Error, Result};
use crate::MAX_COLUMNS;

const COLUMN_LABELS: [&str; MAX_COLUMNS] = [
    "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R", "S",
    "T", "U", "V", "W", "X", "Y", "Z",
];

/// Get the label of a zero-based column index (0 = A, 25 = Z)
///
/// # Examples
/// ```
/// use gridbook_core::column_label;
///
/// assert_eq!(column_label(0).unwrap(), "A");
/// assert_eq!(column_label(25).unwrap(), "Z");
/// assert!(column_label(26).is_err());
/// ```
pub fn column_label(index: usize) -> Result<&'static str> {
    COLUMN_LABELS
        .get(index)
        .copied()
        .ok_or(Error::ColumnOutOfRange {
            index,
            max: MAX_COLUMNS,
        })
}

/// Format an A1-style address from a one-based row number and a zero-based column index
///
/// # Examples
/// ```
/// use gridbook_core::cell_address;
///
/// assert_eq!(cell_address(1, 0).unwrap(), "A1");
/// assert_eq!(cell_address(12, 2).unwrap(), "C12");
/// ```
pub fn cell_address(row: u32, col: usize) -> Result<String> {
    if row == 0 {
        return Err(Error::InvalidRow(row));
    }
    let label = column_label(col)?;
    Ok(format!("{}{}", label, row))
}
