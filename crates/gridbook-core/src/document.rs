//! Document type - the main model structure

use uuid::Uuid;

use crate::sheet::Sheet;
use crate::DEFAULT_EXTENSION;

/// A tabular document
///
/// A document is an ordered list of sheets plus the name it is exported
/// under. Sheets can only be appended.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Document {
    name: String,
    extension: String,
    sheets: Vec<Sheet>,
}

impl Document {
    /// Create a new document
    ///
    /// An empty `name` is replaced by a random UUID.
    pub fn new<S: Into<String>>(name: S) -> Self {
        let mut name = name.into();
        if name.is_empty() {
            name = Uuid::new_v4().to_string();
        }

        Self {
            name,
            extension: DEFAULT_EXTENSION.to_string(),
            sheets: Vec::new(),
        }
    }

    /// Get the document name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the file extension (without the dot)
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Get the exported file name, `<name>.<extension>`
    ///
    /// The document itself is left untouched, so exporting twice yields the
    /// same name.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.name, self.extension)
    }

    /// Append a sheet
    pub fn add_sheet(&mut self, sheet: Sheet) {
        self.sheets.push(sheet);
    }

    /// Get the sheets in insertion order
    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    /// Get the first sheet named `name`
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name() == name)
    }

    /// Get the number of sheets
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Check if the document has no sheets
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_document() {
        let doc = Document::new("report");
        assert_eq!(doc.name(), "report");
        assert_eq!(doc.extension(), "xlsx");
        assert_eq!(doc.file_name(), "report.xlsx");
        assert!(doc.is_empty());
    }

    #[test]
    fn test_file_name_is_stable() {
        let doc = Document::new("report");
        assert_eq!(doc.file_name(), doc.file_name());
        assert_eq!(doc.name(), "report");
    }

    #[test]
    fn test_empty_name_gets_generated() {
        let a = Document::new("");
        let b = Document::new(String::new());

        assert!(!a.name().is_empty());
        assert!(Uuid::parse_str(a.name()).is_ok());
        assert_ne!(a.name(), b.name());
    }

    #[test]
    fn test_sheets_keep_order() {
        let mut doc = Document::new("d");
        doc.add_sheet(Sheet::new("one"));
        doc.add_sheet(Sheet::new("two"));
        doc.add_sheet(Sheet::new("one"));

        let names: Vec<&str> = doc.sheets().iter().map(Sheet::name).collect();
        assert_eq!(names, vec!["one", "two", "one"]);
        assert_eq!(doc.sheet_count(), 3);
        assert_eq!(doc.sheet("two").map(Sheet::name), Some("two"));
        assert!(doc.sheet("three").is_none());
    }
}
