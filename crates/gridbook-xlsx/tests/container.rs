//! End-to-end tests for the container (fill -> write -> open -> verify)

use gridbook_xlsx::{Container, StyleSpec, XlsxError, XlsxReader, XlsxWriter, DEFAULT_SHEET_NAME};
use pretty_assertions::assert_eq;
use std::io::Cursor;

/// Test that text values survive a write/open cycle
#[test]
fn test_roundtrip_strings() {
    let container = Container::new();
    container.set_cell_value("Sheet1", "A1", "Hello, World!").unwrap();
    container.set_cell_value("Sheet1", "B1", "Special: <>&\"'").unwrap();
    container.set_cell_value("Sheet1", "A2", "Multi\nLine").unwrap();
    container.set_cell_value("Sheet1", "B2", "  padded  ").unwrap();
    container.set_cell_value("Sheet1", "C3", "Unicode: \u{1F600}").unwrap();

    let bytes = container.write_to_buffer().unwrap();
    let reopened = Container::open(&bytes).unwrap();

    assert_eq!(reopened.get_cell_value("Sheet1", "A1").unwrap(), "Hello, World!");
    assert_eq!(reopened.get_cell_value("Sheet1", "B1").unwrap(), "Special: <>&\"'");
    assert_eq!(reopened.get_cell_value("Sheet1", "A2").unwrap(), "Multi\nLine");
    assert_eq!(reopened.get_cell_value("Sheet1", "B2").unwrap(), "  padded  ");
    assert_eq!(reopened.get_cell_value("Sheet1", "C3").unwrap(), "Unicode: \u{1F600}");
    assert_eq!(reopened.used_extent("Sheet1").unwrap(), Some((2, 2)));
}

/// Test that sheet order, names and the active sheet survive
#[test]
fn test_roundtrip_sheets() {
    let container = Container::new();
    container.new_sheet("Q1 & Q2").unwrap();
    container.new_sheet("Totals").unwrap();
    container.delete_sheet(DEFAULT_SHEET_NAME).unwrap();
    container.set_active_sheet(1).unwrap();
    container.set_cell_value("Totals", "A1", "sum").unwrap();

    let mut buf = Vec::new();
    XlsxWriter::write(&container, Cursor::new(&mut buf)).unwrap();
    let reopened = XlsxReader::read(Cursor::new(&buf)).unwrap();

    assert_eq!(reopened.sheet_names(), vec!["Q1 & Q2", "Totals"]);
    assert_eq!(reopened.active_sheet(), 1);
    assert_eq!(reopened.get_cell_value("Totals", "A1").unwrap(), "sum");
    assert_eq!(reopened.used_extent("Q1 & Q2").unwrap(), None);
}

/// Test that registered styles are written and read back per cell
#[test]
fn test_roundtrip_styles() {
    let container = Container::new();
    let header = container.register_style(&StyleSpec::new().with_bold(true).with_size(17.0));
    let body = container.register_style(&StyleSpec::new().with_size(14.0));

    container.set_cell_value("Sheet1", "A1", "name").unwrap();
    container.set_cell_value("Sheet1", "A2", "alice").unwrap();
    container.set_cell_style("Sheet1", "A1", "C1", header).unwrap();
    container.set_cell_style("Sheet1", "A2", "A2", body).unwrap();

    let reopened = Container::open(&container.write_to_buffer().unwrap()).unwrap();

    let a1 = reopened.cell_style("Sheet1", "A1").unwrap().unwrap();
    assert!(a1.font.bold);
    assert_eq!(a1.font.size, 17.0);

    // Styled but never given a value
    let c1 = reopened.cell_style("Sheet1", "C1").unwrap().unwrap();
    assert!(c1.font.bold);
    assert_eq!(reopened.get_cell_value("Sheet1", "C1").unwrap(), "");

    let a2 = reopened.cell_style("Sheet1", "A2").unwrap().unwrap();
    assert!(!a2.font.bold);
    assert_eq!(a2.font.size, 14.0);

    assert_eq!(reopened.cell_style("Sheet1", "D4").unwrap(), None);
}

/// Test save_as / open_file through the file system
#[test]
fn test_save_and_open_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.xlsx");

    let container = Container::new();
    container.set_cell_value("Sheet1", "B2", "on disk").unwrap();
    container.save_as(&path).unwrap();

    let reopened = Container::open_file(&path).unwrap();
    assert_eq!(reopened.get_cell_value("Sheet1", "B2").unwrap(), "on disk");
}

/// Test that bytes which are not an xlsx archive are rejected
#[test]
fn test_open_invalid_bytes() {
    assert!(matches!(Container::open(b""), Err(XlsxError::Zip(_))));
    assert!(matches!(
        Container::open(b"PK\x03\x04 definitely not a workbook"),
        Err(XlsxError::Zip(_)) | Err(XlsxError::Io(_))
    ));
}

/// Test that a missing file is an IO error
#[test]
fn test_open_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        Container::open_file(dir.path().join("nope.xlsx")),
        Err(XlsxError::Io(_))
    ));
}

/// Test that text shaped like Excel escapes and control characters survive
#[test]
fn test_roundtrip_escape_like_text() {
    let container = Container::new();
    let values = [
        ("A1", "code_x0041_end"),
        ("A2", "tab_x0009_here"),
        ("A3", "_x005F_x0041_"),
        ("A4", "ctrl\u{1}\u{1f}char"),
        ("A5", "under_score_x12_"),
    ];
    for (address, value) in values {
        container.set_cell_value("Sheet1", address, value).unwrap();
    }

    let reopened = Container::open(&container.write_to_buffer().unwrap()).unwrap();
    for (address, value) in values {
        assert_eq!(reopened.get_cell_value("Sheet1", address).unwrap(), value);
    }
}
