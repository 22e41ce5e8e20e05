use crate::geometry::Rect;
use crate::types::{Colour, PageSide, TextAlign};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Pixel dimensions of a source image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

/// A page image on disk together with its pixel size
#[derive(Debug, Clone, PartialEq)]
pub struct SourceImage {
    pub path: PathBuf,
    pub size: ImageSize,
}

/// Region of a source image in pixels (origin top-left, y down)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Where an image lands on one page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImagePlacement {
    /// Drawn image rectangle in page points (may extend past the canvas)
    pub rect: Rect,
    /// Points per source pixel
    pub scale: f32,
    /// Part of the source that is visible on this page (or spread half)
    pub source_crop: PixelRect,
    /// For spreads, the half of the spread canvas this page represents
    pub spread_half: Option<Rect>,
}

/// A page image ready to draw
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedImage {
    pub path: PathBuf,
    pub placement: ImagePlacement,
}

/// A run of text starting at `x` on its line's baseline
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub x: f32,
}

/// One wrapped line; justified lines carry one run per word
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub runs: Vec<TextRun>,
    pub baseline_y: f32,
}

/// Text drawn inside one region of a page
#[derive(Debug, Clone, PartialEq)]
pub struct TextBox {
    pub region: String,
    pub rect: Rect,
    pub text: String,
    pub lines: Vec<TextLine>,
    pub font_size: f32,
    pub leading: f32,
    pub colour: Colour,
    pub align: TextAlign,
}

/// A page with its content resolved, ready for layout
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPage {
    pub page_number: u32,
    pub slug: String,
    pub side: PageSide,
    pub index: usize,
    pub image: Option<SourceImage>,
    pub image_scale: f32,
    /// Image offset in points; x grows right, y grows up
    pub offset_x_pt: f32,
    pub offset_y_pt: f32,
    /// Non-blank text per region
    pub texts: BTreeMap<String, String>,
}

/// Everything needed to draw one page
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutResult {
    pub page_number: u32,
    pub slug: String,
    pub side: PageSide,
    /// Full page including bleed (the PDF MediaBox)
    pub canvas: Rect,
    pub trim_box: Rect,
    pub image: Option<PlacedImage>,
    pub text_boxes: Vec<TextBox>,
}
