//! Container - a thread-safe in-memory workbook

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use crate::address::{rectangle, CellRef};
use crate::error::{XlsxError, XlsxResult};
use crate::reader::XlsxReader;
use crate::style::{StyleId, StyleSpec, StyleTable};
use crate::writer::XlsxWriter;
use crate::MAX_SHEET_NAME_LEN;

/// Name of the sheet a fresh container starts with
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

/// Contents of one grid position
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct CellRecord {
    pub(crate) value: Option<String>,
    pub(crate) style: StyleId,
}

/// Cells of one sheet, keyed by (row, col) so iteration is row-major
pub(crate) type SheetCells = BTreeMap<(u32, u16), CellRecord>;

#[derive(Debug)]
struct SheetEntry {
    name: String,
    cells: Arc<Mutex<SheetCells>>,
}

#[derive(Debug, Default)]
struct Directory {
    sheets: Vec<SheetEntry>,
    active: usize,
}

impl Directory {
    fn position(&self, name: &str) -> Option<usize> {
        self.sheets.iter().position(|s| s.name == name)
    }
}

/// Point-in-time copy of a container, handed to the writer
#[derive(Debug)]
pub(crate) struct Snapshot {
    pub(crate) sheets: Vec<(String, SheetCells)>,
    pub(crate) active: usize,
    pub(crate) styles: Vec<StyleSpec>,
}

/// An in-memory XLSX workbook
///
/// The sheet directory and the style table sit behind read/write locks, and
/// every sheet's cells sit behind their own mutex. Writers filling different
/// sheets therefore only contend on the (read-locked) directory lookup.
#[derive(Debug)]
pub struct Container {
    directory: RwLock<Directory>,
    styles: RwLock<StyleTable>,
}

impl Container {
    /// Create a container holding one empty sheet named [`DEFAULT_SHEET_NAME`]
    pub fn new() -> Self {
        let container = Self::empty();
        container.push_sheet(DEFAULT_SHEET_NAME.to_string(), SheetCells::new());
        container
    }

    /// A container with no sheets, only valid while a reader populates it
    pub(crate) fn empty() -> Self {
        Self {
            directory: RwLock::new(Directory::default()),
            styles: RwLock::new(StyleTable::new()),
        }
    }

    pub(crate) fn push_sheet(&self, name: String, cells: SheetCells) {
        write_lock(&self.directory).sheets.push(SheetEntry {
            name,
            cells: Arc::new(Mutex::new(cells)),
        });
    }

    pub(crate) fn replace_styles(&self, styles: Vec<StyleSpec>) {
        *write_lock(&self.styles) = StyleTable::from_styles(styles);
    }

    pub(crate) fn style_count(&self) -> usize {
        read_lock(&self.styles).styles().len()
    }

    /// Open a container from the bytes of an `.xlsx` file
    pub fn open(bytes: &[u8]) -> XlsxResult<Self> {
        XlsxReader::read(Cursor::new(bytes))
    }

    /// Open a container from a reader
    pub fn open_reader<R: Read + Seek>(reader: R) -> XlsxResult<Self> {
        XlsxReader::read(reader)
    }

    /// Open a container from a file path
    pub fn open_file<P: AsRef<Path>>(path: P) -> XlsxResult<Self> {
        XlsxReader::read_file(path)
    }

    // ==================== Sheets ====================

    /// Get sheet names in workbook order
    pub fn sheet_names(&self) -> Vec<String> {
        read_lock(&self.directory)
            .sheets
            .iter()
            .map(|s| s.name.clone())
            .collect()
    }

    /// Get the number of sheets
    pub fn sheet_count(&self) -> usize {
        read_lock(&self.directory).sheets.len()
    }

    /// Get the index of a sheet by name
    pub fn sheet_index(&self, name: &str) -> Option<usize> {
        read_lock(&self.directory).position(name)
    }

    /// Add an empty sheet at the end, returning its index
    pub fn new_sheet(&self, name: &str) -> XlsxResult<usize> {
        let mut directory = write_lock(&self.directory);
        validate_sheet_name(&directory, name)?;

        let index = directory.sheets.len();
        directory.sheets.push(SheetEntry {
            name: name.to_string(),
            cells: Arc::new(Mutex::new(SheetCells::new())),
        });
        Ok(index)
    }

    /// Remove a sheet by name
    ///
    /// The active sheet keeps pointing at the same sheet unless it is the one
    /// removed, in which case the first sheet becomes active.
    pub fn delete_sheet(&self, name: &str) -> XlsxResult<()> {
        let mut directory = write_lock(&self.directory);
        let index = directory
            .position(name)
            .ok_or_else(|| XlsxError::SheetNotFound(name.to_string()))?;
        if directory.sheets.len() == 1 {
            return Err(XlsxError::LastSheet(name.to_string()));
        }

        directory.sheets.remove(index);
        if directory.active == index {
            directory.active = 0;
        } else if directory.active > index {
            directory.active -= 1;
        }
        Ok(())
    }

    /// Get the active sheet index
    pub fn active_sheet(&self) -> usize {
        read_lock(&self.directory).active
    }

    /// Set the active sheet index
    pub fn set_active_sheet(&self, index: usize) -> XlsxResult<()> {
        let mut directory = write_lock(&self.directory);
        if index >= directory.sheets.len() {
            return Err(XlsxError::SheetOutOfBounds(index, directory.sheets.len()));
        }
        directory.active = index;
        Ok(())
    }

    // ==================== Styles ====================

    /// Register a style, returning the id of an identical existing one if any
    pub fn register_style(&self, style: &StyleSpec) -> StyleId {
        write_lock(&self.styles).get_or_insert(style)
    }

    /// Look up a registered style
    pub fn style(&self, id: StyleId) -> Option<StyleSpec> {
        read_lock(&self.styles).get(id).cloned()
    }

    // ==================== Cells ====================

    /// Set the text of a cell
    pub fn set_cell_value<S: Into<String>>(
        &self,
        sheet: &str,
        address: &str,
        value: S,
    ) -> XlsxResult<()> {
        let at = CellRef::parse(address)?;
        let cells = self.sheet_cells(sheet)?;
        lock(&cells).entry((at.row, at.col)).or_default().value = Some(value.into());
        Ok(())
    }

    /// Apply a style to every cell of the rectangle from `from` to `to`
    pub fn set_cell_style(
        &self,
        sheet: &str,
        from: &str,
        to: &str,
        style: StyleId,
    ) -> XlsxResult<()> {
        let from = CellRef::parse(from)?;
        let to = CellRef::parse(to)?;
        if !read_lock(&self.styles).contains(style) {
            return Err(XlsxError::InvalidStyle(style.0));
        }

        let cells = self.sheet_cells(sheet)?;
        let mut cells = lock(&cells);
        for at in rectangle(from, to) {
            cells.entry((at.row, at.col)).or_default().style = style;
        }
        Ok(())
    }

    /// Get the text of a cell; absent cells read as the empty string
    pub fn get_cell_value(&self, sheet: &str, address: &str) -> XlsxResult<String> {
        let at = CellRef::parse(address)?;
        let cells = self.sheet_cells(sheet)?;
        let value = lock(&cells)
            .get(&(at.row, at.col))
            .and_then(|c| c.value.clone())
            .unwrap_or_default();
        Ok(value)
    }

    /// Get the style of a cell, `None` if the cell was never styled
    pub fn cell_style(&self, sheet: &str, address: &str) -> XlsxResult<Option<StyleSpec>> {
        let at = CellRef::parse(address)?;
        let cells = self.sheet_cells(sheet)?;
        let id = lock(&cells)
            .get(&(at.row, at.col))
            .map(|c| c.style)
            .filter(|id| id.0 != 0);
        Ok(id.and_then(|id| self.style(id)))
    }

    /// Last (row, col) holding a value, both 0-based; `None` for a sheet without values
    pub fn used_extent(&self, sheet: &str) -> XlsxResult<Option<(u32, u16)>> {
        let cells = self.sheet_cells(sheet)?;
        let cells = lock(&cells);
        let extent = cells
            .iter()
            .filter(|(_, c)| c.value.is_some())
            .map(|(&pos, _)| pos)
            .fold(None, |acc: Option<(u32, u16)>, (row, col)| match acc {
                None => Some((row, col)),
                Some((r, c)) => Some((r.max(row), c.max(col))),
            });
        Ok(extent)
    }

    fn sheet_cells(&self, name: &str) -> XlsxResult<Arc<Mutex<SheetCells>>> {
        let directory = read_lock(&self.directory);
        directory
            .sheets
            .iter()
            .find(|s| s.name == name)
            .map(|s| Arc::clone(&s.cells))
            .ok_or_else(|| XlsxError::SheetNotFound(name.to_string()))
    }

    // ==================== Output ====================

    pub(crate) fn snapshot(&self) -> Snapshot {
        let directory = read_lock(&self.directory);
        let sheets = directory
            .sheets
            .iter()
            .map(|s| (s.name.clone(), lock(&s.cells).clone()))
            .collect();
        Snapshot {
            sheets,
            active: directory.active,
            styles: read_lock(&self.styles).styles().to_vec(),
        }
    }

    /// Serialize to the bytes of an `.xlsx` file
    pub fn write_to_buffer(&self) -> XlsxResult<Vec<u8>> {
        let mut buf = Vec::new();
        self.write(Cursor::new(&mut buf))?;
        Ok(buf)
    }

    /// Serialize to a writer
    pub fn write<W: Write + Seek>(&self, writer: W) -> XlsxResult<()> {
        XlsxWriter::write(self, writer)
    }

    /// Serialize to a file, replacing it if it exists
    pub fn save_as<P: AsRef<Path>>(&self, path: P) -> XlsxResult<()> {
        let file = File::create(path)?;
        self.write(file)
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_sheet_name(directory: &Directory, name: &str) -> XlsxResult<()> {
    if name.is_empty() {
        return Err(XlsxError::InvalidSheetName(
            "Sheet name cannot be empty".into(),
        ));
    }
    if name.chars().count() > MAX_SHEET_NAME_LEN {
        return Err(XlsxError::InvalidSheetName(format!(
            "Sheet name too long (max {} characters)",
            MAX_SHEET_NAME_LEN
        )));
    }

    const INVALID_CHARS: &[char] = &[':', '\\', '/', '?', '*', '[', ']'];
    if let Some(c) = name.chars().find(|c| INVALID_CHARS.contains(c)) {
        return Err(XlsxError::InvalidSheetName(format!(
            "Sheet name cannot contain '{}'",
            c
        )));
    }

    // Excel compares sheet names case-insensitively
    let name_lower = name.to_lowercase();
    if directory
        .sheets
        .iter()
        .any(|s| s.name.to_lowercase() == name_lower)
    {
        return Err(XlsxError::DuplicateSheetName(name.into()));
    }

    Ok(())
}

// A panic while holding a lock cannot leave a grid half-updated (every update
// is a single map operation), so poisoned locks are simply recovered.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn read_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
