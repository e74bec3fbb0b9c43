//! A1-style cell references

use std::fmt;
use std::str::FromStr;

use crate::error::{XlsxError, XlsxResult};
use crate::{MAX_COLS, MAX_ROWS};

/// A cell reference (e.g., "A1", "$B$2")
///
/// Rows and columns are 0-based internally and 1-based/lettered in display.
/// Absolute markers are accepted when parsing and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellRef {
    /// Row index (0-based)
    pub row: u32,
    /// Column index (0-based, A=0, B=1, ..., XFD=16383)
    pub col: u16,
}

impl CellRef {
    /// Create a new cell reference
    pub fn new(row: u32, col: u16) -> Self {
        Self { row, col }
    }

    /// Parse a cell reference from A1-style notation
    ///
    /// # Examples
    /// ```
    /// use gridbook_xlsx::CellRef;
    ///
    /// let r = CellRef::parse("B3").unwrap();
    /// assert_eq!((r.row, r.col), (2, 1));
    ///
    /// let r = CellRef::parse("$AA$10").unwrap();
    /// assert_eq!((r.row, r.col), (9, 26));
    /// ```
    pub fn parse(s: &str) -> XlsxResult<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(XlsxError::InvalidAddress("empty address".into()));
        }

        let bytes = s.as_bytes();
        let mut pos = 0;

        if bytes.get(pos) == Some(&b'$') {
            pos += 1;
        }

        let col_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_alphabetic() {
            pos += 1;
        }
        if pos == col_start {
            return Err(XlsxError::InvalidAddress(format!(
                "no column letters in '{}'",
                s
            )));
        }
        let col = Self::letters_to_column(&s[col_start..pos])?;

        if bytes.get(pos) == Some(&b'$') {
            pos += 1;
        }

        let row_str = &s[pos..];
        if row_str.is_empty() {
            return Err(XlsxError::InvalidAddress(format!(
                "no row number in '{}'",
                s
            )));
        }
        let row: u32 = row_str
            .parse()
            .map_err(|_| XlsxError::InvalidAddress(format!("invalid row number in '{}'", s)))?;

        // Excel rows are 1-based
        if row == 0 || row > MAX_ROWS {
            return Err(XlsxError::InvalidAddress(format!(
                "row out of range in '{}'",
                s
            )));
        }

        Ok(Self { row: row - 1, col })
    }

    /// Convert column index to letters (0 = A, 25 = Z, 26 = AA, etc.)
    pub fn column_to_letters(col: u16) -> String {
        let mut result = String::new();
        let mut n = col as u32 + 1;

        while n > 0 {
            n -= 1;
            let c = ((n % 26) as u8 + b'A') as char;
            result.insert(0, c);
            n /= 26;
        }

        result
    }

    /// Convert column letters to index (A = 0, Z = 25, AA = 26, etc.)
    pub fn letters_to_column(letters: &str) -> XlsxResult<u16> {
        if letters.is_empty() {
            return Err(XlsxError::InvalidAddress("empty column letters".into()));
        }

        let mut col: u32 = 0;
        for c in letters.chars() {
            if !c.is_ascii_alphabetic() {
                return Err(XlsxError::InvalidAddress(format!(
                    "invalid column letter '{}'",
                    c
                )));
            }
            col = col * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
            if col > MAX_COLS as u32 {
                return Err(XlsxError::InvalidAddress(format!(
                    "column '{}' out of range",
                    letters
                )));
            }
        }

        Ok((col - 1) as u16)
    }

    /// Format as A1-style string
    pub fn to_a1_string(&self) -> String {
        format!("{}{}", Self::column_to_letters(self.col), self.row + 1)
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_a1_string())
    }
}

impl FromStr for CellRef {
    type Err = XlsxError;

    fn from_str(s: &str) -> XlsxResult<Self> {
        Self::parse(s)
    }
}

/// Every reference in the rectangle spanned by two corners, row by row
pub(crate) fn rectangle(a: CellRef, b: CellRef) -> impl Iterator<Item = CellRef> {
    let (top, bottom) = (a.row.min(b.row), a.row.max(b.row));
    let (left, right) = (a.col.min(b.col), a.col.max(b.col));
    (top..=bottom).flat_map(move |row| (left..=right).map(move |col| CellRef::new(row, col)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_to_letters() {
        assert_eq!(CellRef::column_to_letters(0), "A");
        assert_eq!(CellRef::column_to_letters(25), "Z");
        assert_eq!(CellRef::column_to_letters(26), "AA");
        assert_eq!(CellRef::column_to_letters(701), "ZZ");
        assert_eq!(CellRef::column_to_letters(16383), "XFD");
    }

    #[test]
    fn test_letters_to_column() {
        assert_eq!(CellRef::letters_to_column("A").unwrap(), 0);
        assert_eq!(CellRef::letters_to_column("z").unwrap(), 25);
        assert_eq!(CellRef::letters_to_column("AA").unwrap(), 26);
        assert_eq!(CellRef::letters_to_column("XFD").unwrap(), 16383);
        assert!(CellRef::letters_to_column("XFE").is_err());
    }

    #[test]
    fn test_parse() {
        assert_eq!(CellRef::parse("A1").unwrap(), CellRef::new(0, 0));
        assert_eq!(CellRef::parse("c100").unwrap(), CellRef::new(99, 2));
        assert_eq!(CellRef::parse("$B$2").unwrap(), CellRef::new(1, 1));
        assert_eq!(
            CellRef::parse("XFD1048576").unwrap(),
            CellRef::new(1048575, 16383)
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(CellRef::parse("").is_err());
        assert!(CellRef::parse("A").is_err());
        assert!(CellRef::parse("1").is_err());
        assert!(CellRef::parse("A0").is_err());
        assert!(CellRef::parse("A1048577").is_err());
        assert!(CellRef::parse("A1B").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(CellRef::new(0, 0).to_string(), "A1");
        assert_eq!(CellRef::new(9, 27).to_string(), "AB10");
    }

    #[test]
    fn test_rectangle() {
        let cells: Vec<_> = rectangle(CellRef::new(1, 1), CellRef::new(0, 0)).collect();
        assert_eq!(
            cells,
            vec![
                CellRef::new(0, 0),
                CellRef::new(0, 1),
                CellRef::new(1, 0),
                CellRef::new(1, 1),
            ]
        );
    }
}
