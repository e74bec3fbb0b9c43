//! Cell type

use crate::value::CellValue;

/// A single cell of a row
///
/// The optional name records the address a cell was read from. Export never
/// looks at it: a cell's position in its row decides where it is written.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    value: CellValue,
    name: Option<String>,
}

impl Cell {
    /// Create a cell holding `value`
    pub fn new<V: Into<CellValue>>(value: V) -> Self {
        Self {
            value: value.into(),
            name: None,
        }
    }

    /// Set the source name
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Get the value
    pub fn value(&self) -> &CellValue {
        &self.value
    }

    /// Get the source name, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Set the source name
    pub fn set_name<S: Into<String>>(&mut self, name: S) {
        self.name = Some(name.into());
    }
}
