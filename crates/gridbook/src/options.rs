//! Export and import options

use gridbook_core::{DEFAULT_MAX_ROWS, MAX_COLUMNS};
use gridbook_xlsx::StyleSpec;

/// What to do when a single cell cannot be written or read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillMode {
    /// Log the failure and carry on with the next cell
    #[default]
    BestEffort,
    /// Abort with the first failure
    Strict,
}

/// Options for exporting a document
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Per-cell failure policy
    pub mode: FillMode,
    /// Style applied to header cells (default: bold 17pt)
    pub header_style: StyleSpec,
    /// Style applied to body cells (default: plain 14pt)
    pub body_style: StyleSpec,
    /// Size of a dedicated worker pool, `None` for rayon's global pool
    pub workers: Option<usize>,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            mode: FillMode::BestEffort,
            header_style: StyleSpec::new().with_bold(true).with_size(17.0),
            body_style: StyleSpec::new().with_size(14.0),
            workers: None,
        }
    }
}

impl WriteOptions {
    /// Set the per-cell failure policy
    pub fn with_mode(mut self, mode: FillMode) -> Self {
        self.mode = mode;
        self
    }

    /// Run the per-sheet fill on a dedicated pool of `workers` threads
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }
}

/// Options for importing a document
///
/// Limits are normalized when a [`DocumentReader`](crate::DocumentReader) is
/// built: a row limit of 0 means [`DEFAULT_MAX_ROWS`], and a column limit of 0
/// or anything above [`MAX_COLUMNS`] means [`MAX_COLUMNS`].
#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// Rows scanned per sheet, not counting the header row
    pub max_rows: usize,
    /// Columns scanned per row
    pub max_columns: usize,
    /// Per-cell failure policy
    pub mode: FillMode,
    /// Size of a dedicated worker pool, `None` for rayon's global pool
    pub workers: Option<usize>,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            max_rows: DEFAULT_MAX_ROWS,
            max_columns: MAX_COLUMNS,
            mode: FillMode::BestEffort,
            workers: None,
        }
    }
}

impl ReadOptions {
    /// Create normalized options with the given scan limits
    pub fn new(max_rows: usize, max_columns: usize) -> Self {
        Self {
            max_rows,
            max_columns,
            ..Self::default()
        }
        .normalized()
    }

    /// Replace out-of-range limits with their defaults
    pub fn normalized(mut self) -> Self {
        if self.max_rows == 0 {
            self.max_rows = DEFAULT_MAX_ROWS;
        }
        if self.max_columns == 0 || self.max_columns > MAX_COLUMNS {
            self.max_columns = MAX_COLUMNS;
        }
        self
    }

    /// Set the per-cell failure policy
    pub fn with_mode(mut self, mode: FillMode) -> Self {
        self.mode = mode;
        self
    }

    /// Run the per-sheet scan on a dedicated pool of `workers` threads
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }
}
