//! Positioned text runs from PDF page content streams.
//!
//! Only the text-positioning subset of the content stream operators is
//! interpreted. Glyph widths are estimated from the font size, which is
//! precise enough to order runs and to separate table columns.
//!
//! String operands are decoded with the encoding of the font selected by
//! `Tf` (simple encodings and ToUnicode CMaps). Text in fonts without a
//! usable encoding is read as Latin-1.

use std::collections::BTreeMap;

use lopdf::content::Operation;
use lopdf::{Document, Encoding, Object, ObjectId};

use crate::error::Result;

/// Encodings of a page's fonts, keyed by resource name (`F1`, ...).
pub type FontEncodings<'a> = BTreeMap<Vec<u8>, Encoding<'a>>;

/// Estimated glyph advance as a fraction of the font size.
const AVG_GLYPH_WIDTH: f64 = 0.5;

/// `TJ` adjustment (thousandths of an em) read as a word gap.
const TJ_WORD_GAP: f64 = -250.0;

/// `TJ` adjustment read as a column gap.
const TJ_COLUMN_GAP: f64 = -1000.0;

/// A piece of text drawn at one position.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    /// 1-based page number.
    pub page: u32,

    /// Horizontal start in page space.
    pub x: f64,

    /// Baseline in page space (grows upwards).
    pub y: f64,

    /// Estimated advance per character in page space.
    pub char_width: f64,

    pub text: String,
}

impl TextRun {
    /// Estimated horizontal end of the run.
    #[must_use]
    pub fn end_x(&self) -> f64 {
        self.x + self.text.chars().count() as f64 * self.char_width
    }
}

/// Affine transform `[a b c d e f]` as used by PDF.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix([f64; 6]);

impl Matrix {
    const IDENTITY: Self = Self([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    fn translate(tx: f64, ty: f64) -> Self {
        Self([1.0, 0.0, 0.0, 1.0, tx, ty])
    }

    /// `self × other` in PDF's row-vector convention.
    fn then(self, other: Self) -> Self {
        let [a1, b1, c1, d1, e1, f1] = self.0;
        let [a2, b2, c2, d2, e2, f2] = other.0;
        Self([
            a1 * a2 + b1 * c2,
            a1 * b2 + b1 * d2,
            c1 * a2 + d1 * c2,
            c1 * b2 + d1 * d2,
            e1 * a2 + f1 * c2 + e2,
            e1 * b2 + f1 * d2 + f2,
        ])
    }

    fn scale_x(&self) -> f64 {
        self.0[0].hypot(self.0[1])
    }
}

/// Text state of one page walk.
struct TextState<'a> {
    page: u32,
    encodings: &'a FontEncodings<'a>,
    font: Option<Vec<u8>>,
    ctm: Matrix,
    ctm_stack: Vec<Matrix>,
    text_matrix: Matrix,
    line_matrix: Matrix,
    font_size: f64,
    leading: f64,
    runs: Vec<TextRun>,
}

impl<'a> TextState<'a> {
    fn new(page: u32, encodings: &'a FontEncodings<'a>) -> Self {
        Self {
            page,
            encodings,
            font: None,
            ctm: Matrix::IDENTITY,
            ctm_stack: Vec::new(),
            text_matrix: Matrix::IDENTITY,
            line_matrix: Matrix::IDENTITY,
            font_size: 0.0,
            leading: 0.0,
            runs: Vec::new(),
        }
    }

    fn apply(&mut self, op: &Operation) {
        let num = |i: usize| op.operands.get(i).and_then(as_number);

        match op.operator.as_str() {
            "q" => self.ctm_stack.push(self.ctm),
            "Q" => {
                if let Some(ctm) = self.ctm_stack.pop() {
                    self.ctm = ctm;
                }
            }
            "cm" => {
                if let Some(m) = matrix_operands(&op.operands) {
                    self.ctm = m.then(self.ctm);
                }
            }
            "BT" => {
                self.text_matrix = Matrix::IDENTITY;
                self.line_matrix = Matrix::IDENTITY;
            }
            "Tf" => {
                if let Some(Object::Name(name)) = op.operands.first() {
                    self.font = Some(name.clone());
                }
                if let Some(size) = num(1) {
                    self.font_size = size;
                }
            }
            "TL" => {
                if let Some(leading) = num(0) {
                    self.leading = leading;
                }
            }
            "Td" => {
                if let (Some(tx), Some(ty)) = (num(0), num(1)) {
                    self.next_line(tx, ty);
                }
            }
            "TD" => {
                if let (Some(tx), Some(ty)) = (num(0), num(1)) {
                    self.leading = -ty;
                    self.next_line(tx, ty);
                }
            }
            "Tm" => {
                if let Some(m) = matrix_operands(&op.operands) {
                    self.text_matrix = m;
                    self.line_matrix = m;
                }
            }
            "T*" => self.next_line(0.0, -self.leading),
            "Tj" => {
                if let Some(Object::String(bytes, _)) = op.operands.first() {
                    let text = self.decode(bytes);
                    self.show(text);
                }
            }
            "'" => {
                self.next_line(0.0, -self.leading);
                if let Some(Object::String(bytes, _)) = op.operands.first() {
                    let text = self.decode(bytes);
                    self.show(text);
                }
            }
            "\"" => {
                self.next_line(0.0, -self.leading);
                if let Some(Object::String(bytes, _)) = op.operands.get(2) {
                    let text = self.decode(bytes);
                    self.show(text);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = op.operands.first() {
                    let text = collect_tj_text(items, |bytes| self.decode(bytes));
                    self.show(text);
                }
            }
            _ => {}
        }
    }

    /// Decode a string operand with the current font's encoding.
    fn decode(&self, bytes: &[u8]) -> String {
        let encoding = self.font.as_ref().and_then(|name| self.encodings.get(name));
        match encoding.map(|encoding| Document::decode_text(encoding, bytes)) {
            Some(Ok(text)) => text,
            Some(Err(e)) => {
                tracing::debug!(error = %e, "Can't decode text with font encoding, reading it as Latin-1");
                decode_pdf_string(bytes)
            }
            None => decode_pdf_string(bytes),
        }
    }

    fn next_line(&mut self, tx: f64, ty: f64) {
        self.line_matrix = Matrix::translate(tx, ty).then(self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    fn show(&mut self, text: String) {
        let render = self.text_matrix.then(self.ctm);
        let char_width = self.font_size * AVG_GLYPH_WIDTH * render.scale_x();
        let advance = text.chars().count() as f64 * self.font_size * AVG_GLYPH_WIDTH;

        if !text.trim().is_empty() {
            self.runs.push(TextRun {
                page: self.page,
                x: render.0[4],
                y: render.0[5],
                char_width,
                text,
            });
        }

        self.text_matrix = Matrix::translate(advance, 0.0).then(self.text_matrix);
    }
}

/// Collect the text runs of one page.
///
/// `page` is the 1-based page number recorded on the runs.
pub fn page_runs(doc: &Document, page: u32, page_id: ObjectId) -> Result<Vec<TextRun>> {
    let content = doc.get_and_decode_page_content(page_id)?;
    let encodings = font_encodings(doc, page_id);

    let mut state = TextState::new(page, &encodings);
    for op in &content.operations {
        state.apply(op);
    }

    Ok(state.runs)
}

/// Encodings of the fonts a page uses.
///
/// Fonts that declare neither `/Encoding` nor `/ToUnicode`, or whose
/// encoding `lopdf` cannot build, are left out and read as Latin-1.
pub fn font_encodings(doc: &Document, page_id: ObjectId) -> FontEncodings<'_> {
    let fonts = match doc.get_page_fonts(page_id) {
        Ok(fonts) => fonts,
        Err(e) => {
            tracing::warn!(error = %e, "Can't read page fonts");
            return FontEncodings::new();
        }
    };

    fonts
        .into_iter()
        .filter(|(_, font)| font.type_is(b"Font") && (font.has(b"Encoding") || font.has(b"ToUnicode")))
        .filter_map(|(name, font)| match font.get_font_encoding(doc) {
            Ok(encoding) => Some((name, encoding)),
            Err(e) => {
                tracing::warn!(
                    font = %String::from_utf8_lossy(&name),
                    error = %e,
                    "Unsupported font encoding"
                );
                None
            }
        })
        .collect()
}

fn as_number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(f64::from(*r)),
        _ => None,
    }
}

fn matrix_operands(operands: &[Object]) -> Option<Matrix> {
    let values: Vec<f64> = operands.iter().filter_map(as_number).collect();
    let m: [f64; 6] = values.try_into().ok()?;
    Some(Matrix(m))
}

fn collect_tj_text(items: &[Object], decode: impl Fn(&[u8]) -> String) -> String {
    let mut text = String::new();
    for item in items {
        match item {
            Object::String(bytes, _) => text.push_str(&decode(bytes)),
            other => match as_number(other) {
                Some(adjust) if adjust <= TJ_COLUMN_GAP => text.push_str("  "),
                Some(adjust) if adjust <= TJ_WORD_GAP => text.push(' '),
                _ => {}
            },
        }
    }
    text
}

/// Decode a string operand drawn without a known font encoding.
///
/// UTF-16BE strings (with byte order mark) are decoded as such, anything
/// else is read as Latin-1.
pub fn decode_pdf_string(bytes: &[u8]) -> String {
    match bytes {
        [0xFE, 0xFF, rest @ ..] => {
            let units: Vec<u16> = rest
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        _ => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}
