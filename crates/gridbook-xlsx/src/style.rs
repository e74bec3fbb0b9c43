//! Named cell styles and the `xl/styles.xml` part

use std::io::{BufReader, Read};

use ahash::AHashMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};

/// Font settings of a style
///
/// Sizes compare by their bit pattern, so `NaN` equals itself and `-0.0`
/// differs from `0.0`.
#[derive(Debug, Clone)]
pub struct FontSpec {
    /// Font family name
    pub name: String,
    /// Font size in points
    pub size: f64,
    /// Bold
    pub bold: bool,
    /// Italic
    pub italic: bool,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            name: "Calibri".to_string(),
            size: 11.0,
            bold: false,
            italic: false,
        }
    }
}

impl std::hash::Hash for FontSpec {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.size.to_bits().hash(state);
        self.bold.hash(state);
        self.italic.hash(state);
    }
}

impl PartialEq for FontSpec {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.size.to_bits() == other.size.to_bits()
            && self.bold == other.bold
            && self.italic == other.italic
    }
}

impl Eq for FontSpec {}

/// A cell style
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StyleSpec {
    /// Font
    pub font: FontSpec,
}

impl StyleSpec {
    /// Create the default style
    pub fn new() -> Self {
        Self::default()
    }

    /// Set font name
    pub fn with_font_name<S: Into<String>>(mut self, name: S) -> Self {
        self.font.name = name.into();
        self
    }

    /// Set font size
    pub fn with_size(mut self, size: f64) -> Self {
        self.font.size = size;
        self
    }

    /// Set bold
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.font.bold = bold;
        self
    }

    /// Set italic
    pub fn with_italic(mut self, italic: bool) -> Self {
        self.font.italic = italic;
        self
    }
}

/// Handle of a style registered in a [`Container`](crate::Container)
///
/// Id 0 is the default style every container starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StyleId(pub u32);

/// Deduplicating style table; index 0 is always the default style
#[derive(Debug)]
pub(crate) struct StyleTable {
    styles: Vec<StyleSpec>,
    index_map: AHashMap<StyleSpec, u32>,
}

impl StyleTable {
    pub(crate) fn new() -> Self {
        Self::from_styles(Vec::new())
    }

    /// Build from styles read out of a file, keeping their positions
    pub(crate) fn from_styles(mut styles: Vec<StyleSpec>) -> Self {
        if styles.is_empty() {
            styles.push(StyleSpec::default());
        }
        let mut index_map = AHashMap::with_capacity(styles.len());
        for (i, style) in styles.iter().enumerate() {
            index_map.entry(style.clone()).or_insert(i as u32);
        }
        Self { styles, index_map }
    }

    pub(crate) fn get_or_insert(&mut self, style: &StyleSpec) -> StyleId {
        if let Some(&idx) = self.index_map.get(style) {
            return StyleId(idx);
        }
        let idx = self.styles.len() as u32;
        self.styles.push(style.clone());
        self.index_map.insert(style.clone(), idx);
        StyleId(idx)
    }

    pub(crate) fn get(&self, id: StyleId) -> Option<&StyleSpec> {
        self.styles.get(id.0 as usize)
    }

    pub(crate) fn contains(&self, id: StyleId) -> bool {
        (id.0 as usize) < self.styles.len()
    }

    pub(crate) fn styles(&self) -> &[StyleSpec] {
        &self.styles
    }
}

/// Render `xl/styles.xml`: one `<xf>` per style, in style id order
pub(crate) fn to_styles_xml(styles: &[StyleSpec]) -> String {
    let mut fonts: Vec<&FontSpec> = Vec::new();
    let mut font_ids: AHashMap<&FontSpec, usize> = AHashMap::new();
    let mut xf_fonts = Vec::with_capacity(styles.len());

    for style in styles {
        let id = *font_ids.entry(&style.font).or_insert_with(|| {
            fonts.push(&style.font);
            fonts.len() - 1
        });
        xf_fonts.push(id);
    }

    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
    );

    xml.push_str(&format!("\n    <fonts count=\"{}\">", fonts.len()));
    for font in &fonts {
        xml.push_str("\n        ");
        xml.push_str(&write_font(font));
    }
    xml.push_str("\n    </fonts>");

    // Excel requires the first two fills to be none and gray125
    xml.push_str(
        r#"
    <fills count="2">
        <fill><patternFill patternType="none"/></fill>
        <fill><patternFill patternType="gray125"/></fill>
    </fills>
    <borders count="1">
        <border><left/><right/><top/><bottom/><diagonal/></border>
    </borders>
    <cellStyleXfs count="1">
        <xf numFmtId="0" fontId="0" fillId="0" borderId="0"/>
    </cellStyleXfs>"#,
    );

    xml.push_str(&format!("\n    <cellXfs count=\"{}\">", styles.len()));
    for (i, font_id) in xf_fonts.iter().enumerate() {
        let apply = if i == 0 { "" } else { " applyFont=\"1\"" };
        xml.push_str(&format!(
            "\n        <xf numFmtId=\"0\" fontId=\"{}\" fillId=\"0\" borderId=\"0\" xfId=\"0\"{}/>",
            font_id, apply
        ));
    }
    xml.push_str("\n    </cellXfs>");

    xml.push_str(
        r#"
    <cellStyles count="1">
        <cellStyle name="Normal" xfId="0" builtinId="0"/>
    </cellStyles>
</styleSheet>"#,
    );

    xml
}

fn write_font(font: &FontSpec) -> String {
    let mut s = String::from("<font>");
    if font.bold {
        s.push_str("<b/>");
    }
    if font.italic {
        s.push_str("<i/>");
    }
    s.push_str(&format!("<sz val=\"{}\"/>", font.size));
    s.push_str(&format!("<name val=\"{}\"/>", escape_xml_attr(&font.name)));
    s.push_str("</font>");
    s
}

fn escape_xml_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Read `xl/styles.xml` into one [`StyleSpec`] per `cellXfs` entry
///
/// Only the font of each xf is kept; fills, borders and number formats are
/// not modelled.
pub(crate) fn read_styles_xml<R: Read>(reader: R) -> XlsxResult<Vec<StyleSpec>> {
    let mut xml_reader = Reader::from_reader(BufReader::new(reader));
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    let mut fonts: Vec<FontSpec> = Vec::new();
    let mut xf_font_ids: Vec<usize> = Vec::new();

    let mut in_fonts = false;
    let mut in_cell_xfs = false;
    let mut current_font: Option<FontSpec> = None;

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"fonts" => in_fonts = true,
                b"cellXfs" => in_cell_xfs = true,
                b"font" if in_fonts => current_font = Some(blank_font()),
                b"xf" if in_cell_xfs => xf_font_ids.push(font_id_attr(&e)),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"font" if in_fonts => fonts.push(blank_font()),
                b"xf" if in_cell_xfs => xf_font_ids.push(font_id_attr(&e)),
                name => {
                    if let Some(font) = current_font.as_mut() {
                        apply_font_property(font, name, &e);
                    }
                }
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"fonts" => in_fonts = false,
                b"cellXfs" => in_cell_xfs = false,
                b"font" => {
                    if let Some(font) = current_font.take() {
                        fonts.push(font);
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

    Ok(xf_font_ids
        .into_iter()
        .map(|id| StyleSpec {
            font: fonts.get(id).cloned().unwrap_or_default(),
        })
        .collect())
}

// Properties absent from a <font> element mean "off", not "default".
fn blank_font() -> FontSpec {
    FontSpec {
        name: String::new(),
        ..FontSpec::default()
    }
}

fn font_id_attr(e: &BytesStart<'_>) -> usize {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == b"fontId")
        .and_then(|attr| attr.unescape_value().ok()?.parse().ok())
        .unwrap_or(0)
}

fn val_attr(e: &BytesStart<'_>) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == b"val")
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.to_string()))
}

fn apply_font_property(font: &mut FontSpec, name: &[u8], e: &BytesStart<'_>) {
    // <b/> and <i/> may carry val="0"
    let enabled = || !matches!(val_attr(e).as_deref(), Some("0") | Some("false"));
    match name {
        b"b" => font.bold = enabled(),
        b"i" => font.italic = enabled(),
        b"sz" => {
            if let Some(size) = val_attr(e).and_then(|v| v.parse().ok()) {
                font.size = size;
            }
        }
        b"name" => {
            if let Some(v) = val_attr(e) {
                font.name = v;
            }
        }
        _ => {}
    }
}
