//! XLSX writer

use std::io::{Seek, Write};

use crate::address::CellRef;
use crate::container::{Container, SheetCells, Snapshot};
use crate::error::XlsxResult;
use crate::style::to_styles_xml;

/// XLSX file writer
pub struct XlsxWriter;

impl XlsxWriter {
    /// Write a container to a writer
    pub fn write<W: Write + Seek>(container: &Container, writer: W) -> XlsxResult<()> {
        let snapshot = container.snapshot();
        let mut zip = zip::ZipWriter::new(writer);

        Self::write_content_types(&mut zip, &snapshot)?;
        Self::write_root_rels(&mut zip)?;
        Self::write_workbook_xml(&mut zip, &snapshot)?;
        Self::write_workbook_rels(&mut zip, &snapshot)?;

        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("xl/styles.xml", options)?;
        zip.write_all(to_styles_xml(&snapshot.styles).as_bytes())?;

        for (i, (_, cells)) in snapshot.sheets.iter().enumerate() {
            Self::write_worksheet(&mut zip, i, cells)?;
        }

        zip.finish()?;
        log::debug!("wrote xlsx with {} sheet(s)", snapshot.sheets.len());
        Ok(())
    }

    fn write_content_types<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        snapshot: &Snapshot,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("[Content_Types].xml", options)?;

        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="xml" ContentType="application/xml"/>
    <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
    <Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>"#,
        );

        for i in 0..snapshot.sheets.len() {
            content.push_str(&format!(
                r#"
    <Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
                i + 1
            ));
        }

        content.push_str("\n</Types>");

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_root_rels<W: Write + Seek>(zip: &mut zip::ZipWriter<W>) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("_rels/.rels", options)?;

        let content = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_workbook_xml<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        snapshot: &Snapshot,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("xl/workbook.xml", options)?;

        let mut content = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
    <bookViews>
        <workbookView activeTab="{}"/>
    </bookViews>
    <sheets>"#,
            snapshot.active
        );

        for (i, (name, _)) in snapshot.sheets.iter().enumerate() {
            content.push_str(&format!(
                r#"
        <sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                escape_xml(name),
                i + 1,
                i + 1
            ));
        }

        content.push_str(
            r#"
    </sheets>
</workbook>"#,
        );

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_workbook_rels<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        snapshot: &Snapshot,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("xl/_rels/workbook.xml.rels", options)?;

        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );

        for i in 0..snapshot.sheets.len() {
            content.push_str(&format!(
                r#"
    <Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
                i + 1,
                i + 1
            ));
        }

        let styles_rid = snapshot.sheets.len() + 1;
        content.push_str(&format!(
            r#"
    <Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#,
            styles_rid
        ));

        content.push_str("\n</Relationships>");

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_worksheet<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        index: usize,
        cells: &SheetCells,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file(format!("xl/worksheets/sheet{}.xml", index + 1), options)?;

        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
    <sheetData>"#,
        );

        let mut current_row: Option<u32> = None;
        for (&(row, col), cell) in cells {
            if current_row != Some(row) {
                if current_row.is_some() {
                    content.push_str("\n        </row>");
                }
                content.push_str(&format!("\n        <row r=\"{}\">", row + 1));
                current_row = Some(row);
            }

            let cell_ref = CellRef::new(row, col).to_a1_string();
            let style_attr = if cell.style.0 != 0 {
                format!(" s=\"{}\"", cell.style.0)
            } else {
                String::new()
            };

            match &cell.value {
                Some(text) => {
                    content.push_str(&format!(
                        "\n            <c r=\"{}\"{} t=\"inlineStr\"><is><t xml:space=\"preserve\">{}</t></is></c>",
                        cell_ref,
                        style_attr,
                        escape_xml(&encode_excel_escapes(text))
                    ));
                }
                // Preserve style-only cells
                None => {
                    content.push_str(&format!("\n            <c r=\"{}\"{}/>", cell_ref, style_attr));
                }
            }
        }

        if current_row.is_some() {
            content.push_str("\n        </row>");
        }

        content.push_str("\n    </sheetData>\n</worksheet>");

        zip.write_all(content.as_bytes())?;
        Ok(())
    }
}

/// Encode text with Excel's `_xHHHH_` escape syntax
///
/// An `_` that would start an escape sequence becomes `_x005F_`, and
/// characters XML 1.0 cannot carry (control characters other than tab, LF
/// and CR, plus U+FFFE and U+FFFF) become `_xHHHH_`.
fn encode_excel_escapes(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for (i, c) in s.char_indices() {
        match c {
            '_' if starts_escape(&s[i..]) => result.push_str("_x005F_"),
            '\t' | '\n' | '\r' => result.push(c),
            '\u{0}'..='\u{1f}' | '\u{fffe}' | '\u{ffff}' => {
                result.push_str(&format!("_x{:04X}_", c as u32));
            }
            _ => result.push(c),
        }
    }
    result
}

fn starts_escape(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 7
        && bytes[1] == b'x'
        && bytes[2..6].iter().all(u8::is_ascii_hexdigit)
        && bytes[6] == b'_'
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    fn part(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        content
    }

    #[test]
    fn test_writes_required_parts() {
        let container = Container::new();
        let bytes = container.write_to_buffer().unwrap();

        let archive = zip::ZipArchive::new(Cursor::new(&bytes)).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        for expected in [
            "[Content_Types].xml",
            "_rels/.rels",
            "xl/workbook.xml",
            "xl/_rels/workbook.xml.rels",
            "xl/styles.xml",
            "xl/worksheets/sheet1.xml",
        ] {
            assert!(names.contains(&expected), "missing {}", expected);
        }
    }

    #[test]
    fn test_worksheet_cells_are_escaped_and_styled() {
        let container = Container::new();
        let style = container.register_style(&crate::StyleSpec::new().with_bold(true));
        container.set_cell_value("Sheet1", "B1", "a < b & c").unwrap();
        container.set_cell_style("Sheet1", "B1", "B1", style).unwrap();

        let xml = part(&container.write_to_buffer().unwrap(), "xl/worksheets/sheet1.xml");
        assert!(xml.contains("<row r=\"1\">"));
        assert!(xml.contains(
            "<c r=\"B1\" s=\"1\" t=\"inlineStr\"><is><t xml:space=\"preserve\">a &lt; b &amp; c</t></is></c>"
        ));
    }

    #[test]
    fn test_encode_excel_escapes() {
        assert_eq!(encode_excel_escapes("plain_text"), "plain_text");
        assert_eq!(encode_excel_escapes("code_x0041_end"), "code_x005F_x0041_end");
        assert_eq!(encode_excel_escapes("a\u{1}b"), "a_x0001_b");
        assert_eq!(encode_excel_escapes("tab\tnew\nline\r"), "tab\tnew\nline\r");
        assert_eq!(encode_excel_escapes("\u{ffff}"), "_xFFFF_");
    }

    #[test]
    fn test_worksheet_has_no_raw_control_characters() {
        let container = Container::new();
        container.set_cell_value("Sheet1", "A1", "bell\u{7}").unwrap();

        let xml = part(&container.write_to_buffer().unwrap(), "xl/worksheets/sheet1.xml");
        assert!(!xml.contains('\u{7}'));
        assert!(xml.contains("bell_x0007_"));
    }

    #[test]
    fn test_workbook_records_active_tab() {
        let container = Container::new();
        container.new_sheet("Second").unwrap();
        container.set_active_sheet(1).unwrap();

        let xml = part(&container.write_to_buffer().unwrap(), "xl/workbook.xml");
        assert!(xml.contains("activeTab=\"1\""));
        assert!(xml.contains("<sheet name=\"Second\" sheetId=\"2\" r:id=\"rId2\"/>"));
    }
}
