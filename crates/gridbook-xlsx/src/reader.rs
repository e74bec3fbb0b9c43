//! XLSX reader

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::address::CellRef;
use crate::container::{CellRecord, Container, SheetCells};
use crate::error::{XlsxError, XlsxResult};
use crate::style::{read_styles_xml, StyleId};

/// Decode Excel's `_xHHHH_` escape sequences in strings.
///
/// Excel uses this format to encode special characters in XML:
/// - `_x000d_` = CR (carriage return)
/// - `_x000a_` = LF (line feed)
/// - `_x0009_` = Tab
/// - `_x005f_` = Underscore (escaped underscore)
fn decode_excel_escapes(s: &str) -> String {
    if !s.contains("_x") {
        return s.to_string();
    }

    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(start) = rest.find("_x") {
        result.push_str(&rest[..start]);
        let candidate = &rest[start..];
        let decoded = candidate
            .get(2..6)
            .filter(|hex| hex.chars().all(|c| c.is_ascii_hexdigit()))
            .filter(|_| candidate.as_bytes().get(6) == Some(&b'_'))
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            .and_then(char::from_u32);

        match decoded {
            Some(c) => {
                result.push(c);
                rest = &candidate[7..];
            }
            None => {
                result.push_str("_x");
                rest = &candidate[2..];
            }
        }
    }

    result.push_str(rest);
    result
}

/// A sheet listed in `xl/workbook.xml`
struct SheetInfo {
    name: String,
    r_id: String,
}

/// XLSX file reader
pub struct XlsxReader;

impl XlsxReader {
    /// Read a container from a file path
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsxResult<Container> {
        let file = File::open(path)?;
        Self::read(BufReader::new(file))
    }

    /// Read a container from a reader
    pub fn read<R: Read + Seek>(reader: R) -> XlsxResult<Container> {
        let mut archive = zip::ZipArchive::new(reader)?;

        // Verify this is an XLSX file
        if archive.by_name("[Content_Types].xml").is_err() {
            return Err(XlsxError::InvalidFormat(
                "Missing [Content_Types].xml".into(),
            ));
        }

        let shared_strings = Self::read_shared_strings(&mut archive)?;
        let styles = match archive.by_name("xl/styles.xml") {
            Ok(file) => read_styles_xml(file)?,
            Err(_) => Vec::new(),
        };
        let (sheet_info, active) = Self::read_workbook_xml(&mut archive)?;
        let sheet_paths = Self::read_workbook_rels(&mut archive)?;

        let container = Container::empty();
        container.replace_styles(styles);
        let style_count = container.style_count();

        for info in &sheet_info {
            let Some(path) = sheet_paths.get(&info.r_id) else {
                log::warn!("sheet '{}' has no worksheet relationship, skipping", info.name);
                continue;
            };
            let cells = Self::read_worksheet(&mut archive, path, &shared_strings, style_count)?;
            container.push_sheet(info.name.clone(), cells);
        }

        if container.sheet_count() == 0 {
            return Err(XlsxError::InvalidFormat("workbook has no sheets".into()));
        }
        if active < container.sheet_count() {
            container.set_active_sheet(active)?;
        }

        log::debug!("read xlsx with {} sheet(s)", container.sheet_count());
        Ok(container)
    }

    /// Read the shared strings table
    fn read_shared_strings<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<String>> {
        let mut strings = Vec::new();

        let file = match archive.by_name("xl/sharedStrings.xml") {
            Ok(f) => f,
            Err(_) => return Ok(strings), // No shared strings is valid
        };

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(false);

        let mut buf = Vec::new();
        let mut current_string = String::new();
        let mut in_si = false;
        let mut in_t = false;
        // Phonetic runs (<rPh>) carry their own <t> that is not part of the text
        let mut in_phonetic = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"si" => {
                        in_si = true;
                        current_string.clear();
                    }
                    b"rPh" => in_phonetic = true,
                    b"t" if in_si && !in_phonetic => in_t = true,
                    _ => {}
                },
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"si" => {
                        strings.push(decode_excel_escapes(&current_string));
                        current_string.clear();
                        in_si = false;
                    }
                    b"rPh" => in_phonetic = false,
                    b"t" => in_t = false,
                    _ => {}
                },
                Ok(Event::Empty(e)) if e.name().as_ref() == b"si" => {
                    strings.push(String::new());
                }
                Ok(Event::Text(e)) if in_t => {
                    if let Ok(text) = e.unescape() {
                        current_string.push_str(&text);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(strings)
    }

    /// Read workbook.xml to get sheet names, rIds and the active tab
    fn read_workbook_xml<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<(Vec<SheetInfo>, usize)> {
        let file = archive
            .by_name("xl/workbook.xml")
            .map_err(|_| XlsxError::MissingPart("xl/workbook.xml".into()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut sheets = Vec::new();
        let mut active = 0;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"sheet" => {
                        let name = attr_value(&e, b"name");
                        let r_id = attr_value(&e, b"r:id");
                        if let (Some(name), Some(r_id)) = (name, r_id) {
                            sheets.push(SheetInfo { name, r_id });
                        }
                    }
                    b"workbookView" => {
                        if let Some(tab) = attr_value(&e, b"activeTab").and_then(|v| v.parse().ok())
                        {
                            active = tab;
                        }
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok((sheets, active))
    }

    /// Read workbook.xml.rels to get sheet file paths
    fn read_workbook_rels<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<HashMap<String, String>> {
        let file = archive
            .by_name("xl/_rels/workbook.xml.rels")
            .map_err(|_| XlsxError::MissingPart("xl/_rels/workbook.xml.rels".into()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut rels = HashMap::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e))
                    if e.name().as_ref() == b"Relationship" =>
                {
                    let id = attr_value(&e, b"Id");
                    let target = attr_value(&e, b"Target");
                    let rel_type = attr_value(&e, b"Type");

                    // Only include worksheet relationships
                    if let (Some(id), Some(target), Some(rel_type)) = (id, target, rel_type) {
                        if rel_type.ends_with("/worksheet") {
                            // Target is relative to xl/ folder
                            let full_path = match target.strip_prefix('/') {
                                Some(absolute) => absolute.to_string(),
                                None => format!("xl/{}", target),
                            };
                            rels.insert(id, full_path);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(rels)
    }

    /// Read the cells of one worksheet part
    fn read_worksheet<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
        path: &str,
        shared_strings: &[String],
        style_count: usize,
    ) -> XlsxResult<SheetCells> {
        let file = archive
            .by_name(path)
            .map_err(|_| XlsxError::MissingPart(path.to_string()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(false);

        let mut buf = Vec::new();
        let mut cells = SheetCells::new();

        let mut current: Option<PendingCell> = None;
        let mut in_value = false;
        let mut in_inline_str = false;
        let mut in_inline_text = false;
        // Fallback positions for cells written without an `r` attribute
        let mut next_row: u32 = 0;
        let mut next_col: u16 = 0;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"row" => {
                        next_row = row_attr(&e).unwrap_or(next_row);
                        next_col = 0;
                    }
                    b"c" => current = Some(PendingCell::from_start(&e, next_row, next_col)),
                    b"v" if current.is_some() => in_value = true,
                    b"is" if current.is_some() => in_inline_str = true,
                    b"t" if in_inline_str => in_inline_text = true,
                    _ => {}
                },
                Ok(Event::Empty(e)) => match e.name().as_ref() {
                    b"row" => {
                        next_row = row_attr(&e).map_or(next_row + 1, |r| r + 1);
                        next_col = 0;
                    }
                    b"c" => {
                        let cell = PendingCell::from_start(&e, next_row, next_col);
                        next_col = cell.at.col.saturating_add(1);
                        cell.store(&mut cells, shared_strings, style_count);
                    }
                    _ => {}
                },
                Ok(Event::Text(e)) if in_value || in_inline_text => {
                    if let (Some(cell), Ok(text)) = (current.as_mut(), e.unescape()) {
                        cell.text.push_str(&text);
                    }
                }
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"row" => {
                        next_row += 1;
                        next_col = 0;
                    }
                    b"c" => {
                        if let Some(cell) = current.take() {
                            next_col = cell.at.col.saturating_add(1);
                            cell.store(&mut cells, shared_strings, style_count);
                        }
                    }
                    b"v" => in_value = false,
                    b"is" => in_inline_str = false,
                    b"t" => in_inline_text = false,
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(cells)
    }
}

/// A `<c>` element being read
struct PendingCell {
    at: CellRef,
    cell_type: Option<String>,
    style: u32,
    text: String,
}

impl PendingCell {
    fn from_start(e: &BytesStart<'_>, row: u32, col: u16) -> Self {
        let at = attr_value(e, b"r")
            .and_then(|r| CellRef::parse(&r).ok())
            .unwrap_or(CellRef::new(row, col));
        Self {
            at,
            cell_type: attr_value(e, b"t"),
            style: attr_value(e, b"s")
                .and_then(|s| s.parse().ok())
                .unwrap_or(0),
            text: String::new(),
        }
    }

    fn store(self, cells: &mut SheetCells, shared_strings: &[String], style_count: usize) {
        let value = match self.cell_type.as_deref() {
            Some("s") => self
                .text
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|i| shared_strings.get(i).cloned()),
            Some("b") => {
                let flag = if self.text.trim() == "1" { "TRUE" } else { "FALSE" };
                Some(flag.to_string())
            }
            Some("inlineStr") | Some("str") => Some(decode_excel_escapes(&self.text)),
            // Numbers and error codes keep their raw text
            _ if self.text.is_empty() => None,
            _ => Some(self.text.trim().to_string()),
        };

        let style = if (self.style as usize) < style_count {
            StyleId(self.style)
        } else {
            StyleId(0)
        };

        if value.is_some() || style.0 != 0 {
            cells.insert((self.at.row, self.at.col), CellRecord { value, style });
        }
    }
}

fn attr_value(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.to_string()))
}

/// 0-based row index from a `<row r="..">` attribute
fn row_attr(e: &BytesStart<'_>) -> Option<u32> {
    attr_value(e, b"r")
        .and_then(|r| r.parse::<u32>().ok())
        .map(|r| r.saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    fn build_xlsx(parts: &[(&str, &str)]) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
            let options = zip::write::SimpleFileOptions::default();
            for (name, content) in parts {
                zip.start_file(name.to_string(), options).unwrap();
                zip.write_all(content.as_bytes()).unwrap();
            }
            zip.finish().unwrap();
        }
        buf
    }

    const WORKBOOK: &str = r#"<workbook xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
        <bookViews><workbookView activeTab="1"/></bookViews>
        <sheets>
            <sheet name="First" sheetId="1" r:id="rId1"/>
            <sheet name="Second &amp; more" sheetId="2" r:id="rId2"/>
        </sheets>
    </workbook>"#;

    const RELS: &str = r#"<Relationships>
        <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
        <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="/xl/worksheets/sheet2.xml"/>
        <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>
    </Relationships>"#;

    const SHARED: &str = r#"<sst><si><t>shared</t></si><si><r><t>rich </t></r><r><t>text</t></r></si><si><t>line_x000a_break</t></si></sst>"#;

    const SHEET1: &str = r#"<worksheet><sheetData>
        <row r="1">
            <c r="A1" t="s"><v>0</v></c>
            <c r="B1" t="s"><v>1</v></c>
            <c r="C1" t="s"><v>2</v></c>
        </row>
        <row r="3">
            <c r="A3"><v>42.5</v></c>
            <c r="B3" t="b"><v>1</v></c>
            <c r="C3" t="inlineStr"><is><t>inline</t></is></c>
            <c r="D3" t="str"><v>formula text</v></c>
            <c r="E3" t="e"><v>#DIV/0!</v></c>
        </row>
    </sheetData></worksheet>"#;

    const SHEET2: &str = r#"<worksheet><sheetData>
        <row r="2"><c><v>7</v></c><c><v>8</v></c></row>
    </sheetData></worksheet>"#;

    fn sample() -> Vec<u8> {
        build_xlsx(&[
            ("[Content_Types].xml", "<Types/>"),
            ("xl/workbook.xml", WORKBOOK),
            ("xl/_rels/workbook.xml.rels", RELS),
            ("xl/sharedStrings.xml", SHARED),
            ("xl/worksheets/sheet1.xml", SHEET1),
            ("xl/worksheets/sheet2.xml", SHEET2),
        ])
    }

    #[test]
    fn test_decode_excel_escapes() {
        assert_eq!(decode_excel_escapes("a_x000a_b"), "a\nb");
        assert_eq!(decode_excel_escapes("_x005f_x"), "_x");
        assert_eq!(decode_excel_escapes("plain_xyz_"), "plain_xyz_");
        assert_eq!(decode_excel_escapes("tail_x00"), "tail_x00");
    }

    #[test]
    fn test_reads_sheet_names_and_active_tab() {
        let container = XlsxReader::read(Cursor::new(sample())).unwrap();
        assert_eq!(container.sheet_names(), vec!["First", "Second & more"]);
        assert_eq!(container.active_sheet(), 1);
    }

    #[test]
    fn test_reads_cell_types_as_text() {
        let container = XlsxReader::read(Cursor::new(sample())).unwrap();
        let get = |addr: &str| container.get_cell_value("First", addr).unwrap();

        assert_eq!(get("A1"), "shared");
        assert_eq!(get("B1"), "rich text");
        assert_eq!(get("C1"), "line\nbreak");
        assert_eq!(get("A3"), "42.5");
        assert_eq!(get("B3"), "TRUE");
        assert_eq!(get("C3"), "inline");
        assert_eq!(get("D3"), "formula text");
        assert_eq!(get("E3"), "#DIV/0!");
        assert_eq!(get("A2"), "");
    }

    #[test]
    fn test_cells_without_reference_follow_row_position() {
        let container = XlsxReader::read(Cursor::new(sample())).unwrap();
        assert_eq!(container.get_cell_value("Second & more", "A2").unwrap(), "7");
        assert_eq!(container.get_cell_value("Second & more", "B2").unwrap(), "8");
    }

    #[test]
    fn test_rejects_non_xlsx() {
        assert!(matches!(
            XlsxReader::read(Cursor::new(b"not a zip".to_vec())),
            Err(XlsxError::Zip(_))
        ));

        let bytes = build_xlsx(&[("xl/workbook.xml", WORKBOOK)]);
        assert!(matches!(
            XlsxReader::read(Cursor::new(bytes)),
            Err(XlsxError::InvalidFormat(_))
        ));
    }
}
