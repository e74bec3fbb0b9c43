//! Cell value types

use std::fmt;

use chrono::NaiveDateTime;

/// Text written in place of blank-like values
pub const EMPTY_PLACEHOLDER: &str = "-";

/// Represents the value stored in a cell
///
/// Values are opaque to the pipelines: they are only ever turned into text,
/// through [`stringify`] on export and as [`CellValue::Text`] on import.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellValue {
    /// No value
    #[default]
    Empty,

    /// Integer value
    Int(i64),

    /// Double precision number
    Float(f64),

    /// Single precision number
    Float32(f32),

    /// Boolean value
    Bool(bool),

    /// String value
    Text(String),

    /// Date-time reference, `None` when the reference is null
    DateTime(Option<NaiveDateTime>),
}

impl CellValue {
    /// Create a new text value
    pub fn text<S: Into<String>>(s: S) -> Self {
        CellValue::Text(s.into())
    }

    /// Check if the cell has no value
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Try to get the value as a string
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Check whether this value renders as [`EMPTY_PLACEHOLDER`]
    pub fn is_blank(&self) -> bool {
        BLANK_RULES.iter().any(|rule| rule(self))
    }

    /// Get the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Empty => "empty",
            CellValue::Int(_) => "int",
            CellValue::Float(_) => "float",
            CellValue::Float32(_) => "float32",
            CellValue::Bool(_) => "bool",
            CellValue::Text(_) => "text",
            CellValue::DateTime(_) => "datetime",
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Int(n) => write!(f, "{}", n),
            CellValue::Float(n) => write!(f, "{}", n),
            CellValue::Float32(n) => write!(f, "{}", n),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Text(s) => f.write_str(s),
            CellValue::DateTime(Some(dt)) => write!(f, "{}", dt),
            CellValue::DateTime(None) => Ok(()),
        }
    }
}

// Checked in order, first match wins.
const BLANK_RULES: [fn(&CellValue) -> bool; 6] = [
    |v| matches!(v, CellValue::Empty),
    |v| matches!(v, CellValue::Int(0)),
    |v| matches!(v, CellValue::Float(n) if *n == 0.0),
    |v| matches!(v, CellValue::Float32(n) if *n == 0.0),
    |v| matches!(v, CellValue::Text(s) if s.is_empty()),
    |v| matches!(v, CellValue::DateTime(None)),
];

/// Convert a value to the text written into a cell
///
/// Blank-like values (no value, any numeric zero, the empty string and a null
/// date-time) become [`EMPTY_PLACEHOLDER`]; everything else uses its
/// [`Display`](fmt::Display) form.
///
/// # Examples
/// ```
/// use gridbook_core::{stringify, CellValue};
///
/// assert_eq!(stringify(&CellValue::Int(0)), "-");
/// assert_eq!(stringify(&CellValue::Int(42)), "42");
/// assert_eq!(stringify(&CellValue::text("hello")), "hello");
/// ```
pub fn stringify(value: &CellValue) -> String {
    if value.is_blank() {
        EMPTY_PLACEHOLDER.to_string()
    } else {
        value.to_string()
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Int(n as i64)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Int(n)
    }
}

impl From<u32> for CellValue {
    fn from(n: u32) -> Self {
        CellValue::Int(n as i64)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Float(n)
    }
}

impl From<f32> for CellValue {
    fn from(n: f32) -> Self {
        CellValue::Float32(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(dt: NaiveDateTime) -> Self {
        CellValue::DateTime(Some(dt))
    }
}

impl From<Option<NaiveDateTime>> for CellValue {
    fn from(dt: Option<NaiveDateTime>) -> Self {
        CellValue::DateTime(dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_stringify_blank_values() {
        assert_eq!(stringify(&CellValue::Empty), "-");
        assert_eq!(stringify(&CellValue::Int(0)), "-");
        assert_eq!(stringify(&CellValue::Float(0.0)), "-");
        assert_eq!(stringify(&CellValue::Float(-0.0)), "-");
        assert_eq!(stringify(&CellValue::Float32(0.0)), "-");
        assert_eq!(stringify(&CellValue::text("")), "-");
        assert_eq!(stringify(&CellValue::DateTime(None)), "-");
    }

    #[test]
    fn test_stringify_values() {
        assert_eq!(stringify(&CellValue::Int(42)), "42");
        assert_eq!(stringify(&CellValue::Int(-7)), "-7");
        assert_eq!(stringify(&CellValue::Float(3.5)), "3.5");
        assert_eq!(stringify(&CellValue::Float32(0.25)), "0.25");
        assert_eq!(stringify(&CellValue::Bool(false)), "false");
        assert_eq!(stringify(&CellValue::text("hello")), "hello");

        let dt = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        assert_eq!(stringify(&CellValue::from(dt)), "2024-03-01 09:30:00");
    }

    #[test]
    fn test_nan_is_not_blank() {
        assert!(!CellValue::Float(f64::NAN).is_blank());
        assert_eq!(stringify(&CellValue::Float(f64::NAN)), "NaN");
    }

    #[test]
    fn test_conversions() {
        assert_eq!(CellValue::from(5), CellValue::Int(5));
        assert_eq!(CellValue::from(5u32), CellValue::Int(5));
        assert_eq!(CellValue::from(1.5f32), CellValue::Float32(1.5));
        assert_eq!(CellValue::from("x"), CellValue::text("x"));
        assert_eq!(CellValue::from(None::<NaiveDateTime>), CellValue::DateTime(None));
    }
}
