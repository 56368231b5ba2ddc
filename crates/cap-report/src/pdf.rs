//! Page drawing and document assembly on top of `lopdf`.
//!
//! Supports exactly what the inventory report needs: A4 pages, the two
//! standard Helvetica faces, filled rectangles, stroked lines and
//! single-line text. `lopdf` keeps objects in id order and writes a
//! classic xref table, so identical drawing calls yield identical bytes.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, StringFormat};

use crate::{ReportError, Result};

/// A4 width in points.
pub const A4_WIDTH: f32 = 595.28;
/// A4 height in points.
pub const A4_HEIGHT: f32 = 841.89;

/// RGB colour, components in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgb(pub f32, pub f32, pub f32);

pub const BLACK: Rgb = Rgb(0.0, 0.0, 0.0);
pub const WHITE: Rgb = Rgb(1.0, 1.0, 1.0);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Font {
    Helvetica,
    HelveticaBold,
}

impl Font {
    pub const ALL: [Font; 2] = [Self::Helvetica, Self::HelveticaBold];

    /// Key under `/Resources /Font`.
    pub fn resource_name(self) -> &'static str {
        match self {
            Self::Helvetica => "F1",
            Self::HelveticaBold => "F2",
        }
    }

    fn base_font(self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
        }
    }
}

/// Drawing operations for one page, in PDF user space (origin bottom-left).
#[derive(Debug, Default)]
pub struct Page {
    ops: Vec<Operation>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb) {
        self.ops.push(color_op("rg", color));
        self.ops
            .push(Operation::new("re", vec![real(x), real(y), real(w), real(h)]));
        self.ops.push(Operation::new("f", vec![]));
    }

    pub fn line(&mut self, from: (f32, f32), to: (f32, f32), width: f32, color: Rgb) {
        self.ops.push(color_op("RG", color));
        self.ops.push(Operation::new("w", vec![real(width)]));
        self.ops
            .push(Operation::new("m", vec![real(from.0), real(from.1)]));
        self.ops.push(Operation::new("l", vec![real(to.0), real(to.1)]));
        self.ops.push(Operation::new("S", vec![]));
    }

    /// Draw `text` with its baseline starting at `(x, y)`.
    ///
    /// # Errors
    ///
    /// - [`ReportError::UnsupportedText`] if `text` has a character the
    ///   standard fonts cannot show
    pub fn text(&mut self, x: f32, y: f32, font: Font, size: f32, color: Rgb, text: &str) -> Result<()> {
        let encoded = encode_text(text).map_err(|ch| ReportError::UnsupportedText {
            field: text.to_string(),
            ch,
        })?;
        self.ops.push(Operation::new("BT", vec![]));
        self.ops.push(color_op("rg", color));
        self.ops.push(Operation::new(
            "Tf",
            vec![Object::Name(font.resource_name().as_bytes().to_vec()), real(size)],
        ));
        self.ops.push(Operation::new("Td", vec![real(x), real(y)]));
        self.ops.push(Operation::new(
            "Tj",
            vec![Object::String(encoded, StringFormat::Literal)],
        ));
        self.ops.push(Operation::new("ET", vec![]));
        Ok(())
    }
}

/// Document metadata written to the Info dictionary.
#[derive(Debug, Clone, Default)]
pub struct DocInfo {
    pub title: String,
    pub producer: String,
    /// Already formatted as a PDF date, e.g. `D:20240315100000Z`.
    pub creation_date: Option<String>,
}

/// Assemble `pages` into a complete PDF file.
pub fn render(pages: Vec<Page>, info: &DocInfo) -> Result<Vec<u8>> {
    let mut doc = Document::with_version("1.4");
    let pages_id = doc.new_object_id();

    let mut fonts = lopdf::Dictionary::new();
    for font in Font::ALL {
        let id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => font.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(font.resource_name(), id);
    }
    let resources_id = doc.add_object(dictionary! { "Font" => fonts });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for page in pages {
        let content = Content {
            operations: page.ops,
        };
        let content_id = doc.add_object(lopdf::Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![Object::Integer(0), Object::Integer(0), real(A4_WIDTH), real(A4_HEIGHT)],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });

    let title = encode_text(&info.title).map_err(|ch| ReportError::UnsupportedText {
        field: "Title".to_string(),
        ch,
    })?;
    let mut info_dict = dictionary! {
        "Title" => Object::String(title, StringFormat::Literal),
        "Producer" => Object::string_literal(info.producer.as_str()),
    };
    if let Some(date) = &info.creation_date {
        info_dict.set("CreationDate", Object::string_literal(date.as_str()));
    }
    let info_id = doc.add_object(info_dict);

    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut out = Vec::new();
    doc.save_to(&mut out)?;
    Ok(out)
}

fn real(v: f32) -> Object {
    Object::Real(v.into())
}

fn color_op(operator: &str, color: Rgb) -> Operation {
    Operation::new(operator, vec![real(color.0), real(color.1), real(color.2)])
}

/// Encode `text` as WinAnsi bytes for a standard Type1 font.
///
/// Returns the first character that has no WinAnsi code.
pub fn encode_text(text: &str) -> std::result::Result<Vec<u8>, char> {
    text.chars()
        .map(|c| match c {
            '\n' | '\r' | '\t' => Ok(b' '),
            ' '..='~' => Ok(c as u8),
            '\u{a0}'..='\u{ff}' => Ok(c as u32 as u8),
            '\u{20ac}' => Ok(0x80),
            '\u{2018}' => Ok(0x91),
            '\u{2019}' => Ok(0x92),
            '\u{201c}' => Ok(0x93),
            '\u{201d}' => Ok(0x94),
            '\u{2022}' => Ok(0x95),
            '\u{2013}' => Ok(0x96),
            '\u{2014}' => Ok(0x97),
            other => Err(other),
        })
        .collect()
}
