use crate::layout::{FixedWidthMetrics, TextMeasure};
use crate::types::{BookError, Result};
use owned_ttf_parser::{AsFaceRef, GlyphId, OwnedFace};
use std::fmt;

/// The font every text region is set in
pub enum BookFont {
    /// PDF base-14 Helvetica, measured with fixed-width approximations
    Builtin(FixedWidthMetrics),
    /// A TrueType/OpenType font embedded in the PDF
    Embedded(EmbeddedFont),
}

impl BookFont {
    pub fn builtin() -> Self {
        BookFont::Builtin(FixedWidthMetrics::helvetica())
    }

    pub fn embedded(name: &str, bytes: Vec<u8>) -> Result<Self> {
        EmbeddedFont::from_bytes(name, bytes).map(BookFont::Embedded)
    }

    pub fn name(&self) -> &str {
        match self {
            BookFont::Builtin(_) => "Helvetica",
            BookFont::Embedded(font) => &font.name,
        }
    }
}

impl fmt::Debug for BookFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookFont::Builtin(_) => f.write_str("BookFont::Builtin"),
            BookFont::Embedded(font) => write!(f, "BookFont::Embedded({})", font.name),
        }
    }
}

impl TextMeasure for BookFont {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        match self {
            BookFont::Builtin(metrics) => metrics.text_width(text, font_size),
            BookFont::Embedded(font) => font.text_width(text, font_size),
        }
    }

    fn ascent(&self, font_size: f32) -> f32 {
        match self {
            BookFont::Builtin(metrics) => metrics.ascent(font_size),
            BookFont::Embedded(font) => {
                font.scaling(font_size) * font.face.as_face_ref().ascender() as f32
            }
        }
    }

    fn descent(&self, font_size: f32) -> f32 {
        match self {
            BookFont::Builtin(metrics) => metrics.descent(font_size),
            BookFont::Embedded(font) => {
                font.scaling(font_size) * font.face.as_face_ref().descender() as f32
            }
        }
    }
}

/// Font file bytes plus the parsed face used for metrics
pub struct EmbeddedFont {
    pub name: String,
    pub bytes: Vec<u8>,
    face: OwnedFace,
}

impl EmbeddedFont {
    pub fn from_bytes(name: &str, bytes: Vec<u8>) -> Result<Self> {
        let face = OwnedFace::from_vec(bytes.clone(), 0)
            .map_err(|e| BookError::Pdf(format!("Failed to parse font '{name}': {e}")))?;
        Ok(Self {
            name: name.to_string(),
            bytes,
            face,
        })
    }

    fn scaling(&self, font_size: f32) -> f32 {
        font_size / self.face.as_face_ref().units_per_em().max(1) as f32
    }

    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        let face = self.face.as_face_ref();
        let units: u32 = text
            .chars()
            .map(|ch| {
                let glyph = face
                    .glyph_index(ch)
                    .or_else(|| face.glyph_index('?'))
                    .unwrap_or(GlyphId(0));
                face.glyph_hor_advance(glyph).unwrap_or_default() as u32
            })
            .sum();
        units as f32 * self.scaling(font_size)
    }
}
