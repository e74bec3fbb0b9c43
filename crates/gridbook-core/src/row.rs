//! Row type

use crate::cell::Cell;

/// An ordered run of cells
///
/// A cell's position in the row is its column: the first cell lands in `A`,
/// the second in `B`, and so on.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Row {
    cells: Vec<Cell>,
}

impl Row {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one cell
    pub fn add_cell(&mut self, cell: Cell) {
        self.cells.push(cell);
    }

    /// Append cells in order
    pub fn add_cells<I: IntoIterator<Item = Cell>>(&mut self, cells: I) {
        self.cells.extend(cells);
    }

    /// Get the cells
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of cells in row
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if row has any cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl From<Cell> for Row {
    fn from(cell: Cell) -> Self {
        Self { cells: vec![cell] }
    }
}

impl FromIterator<Cell> for Row {
    fn from_iter<I: IntoIterator<Item = Cell>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}
