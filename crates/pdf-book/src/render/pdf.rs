use super::font::BookFont;
use crate::geometry::Rect;
use crate::layout::{LayoutResult, PlacedImage, TextBox};
use crate::types::{BookError, Result};
use lopdf::Object;
use printpdf::color::Color;
use printpdf::font::ParsedFont;
use printpdf::image::RawImage;
use printpdf::matrix::TextMatrix;
use printpdf::ops::Op;
use printpdf::text::TextItem;
use printpdf::xobject::{XObject, XObjectTransform};
use printpdf::{BuiltinFont, FontId, PdfDocument, PdfPage, PdfSaveOptions, Pt, Rgb, XObjectId};
use std::collections::HashMap;
use std::path::PathBuf;

/// Draws laid-out pages into an in-memory PDF document
pub struct PdfRenderer<'a> {
    doc: PdfDocument,
    font: &'a BookFont,
    font_id: Option<FontId>,
    images: HashMap<PathBuf, XObjectId>,
    /// (canvas, trim box) per page, written back after serialization
    boxes: Vec<(Rect, Rect)>,
}

impl<'a> PdfRenderer<'a> {
    pub fn new(title: &str, font: &'a BookFont) -> Result<Self> {
        let mut doc = PdfDocument::new(title);

        let font_id = match font {
            BookFont::Builtin(_) => None,
            BookFont::Embedded(embedded) => {
                let mut warnings = Vec::new();
                let parsed = ParsedFont::from_bytes(&embedded.bytes, 0, &mut warnings)
                    .ok_or_else(|| {
                        BookError::Pdf(format!("Failed to parse font '{}'", embedded.name))
                    })?;
                Some(doc.add_font(&parsed))
            }
        };

        Ok(Self {
            doc,
            font,
            font_id,
            images: HashMap::new(),
            boxes: Vec::new(),
        })
    }

    pub fn page_count(&self) -> usize {
        self.doc.pages.len()
    }

    /// Append one page: background image first, then text regions in order
    pub fn add_page(&mut self, layout: &LayoutResult) -> Result<()> {
        let mut ops = Vec::new();

        if let Some(image) = &layout.image {
            self.draw_image(&mut ops, image, &layout.slug)?;
        }
        for text_box in &layout.text_boxes {
            self.draw_text(&mut ops, text_box);
        }

        log::debug!(
            "Rendered page {} ('{}', {} side, {} text box(es))",
            layout.page_number,
            layout.slug,
            layout.side.name(),
            layout.text_boxes.len()
        );

        let media_box = pdf_rect(&layout.canvas);
        self.doc.pages.push(PdfPage {
            media_box: media_box.clone(),
            trim_box: pdf_rect(&layout.trim_box),
            crop_box: media_box,
            ops,
        });
        self.boxes.push((layout.canvas, layout.trim_box));
        Ok(())
    }

    /// Serialize the document.
    ///
    /// printpdf writes page boxes as whole-point `[x y w h]`, so every box is
    /// rewritten as exact `[llx lly urx ury]` corners afterwards.
    pub fn finish(self) -> Result<Vec<u8>> {
        let mut warnings = Vec::new();
        let bytes = self.doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            log::debug!("PDF writer reported {} warning(s)", warnings.len());
        }
        write_page_boxes(&bytes, &self.boxes)
    }

    fn draw_image(&mut self, ops: &mut Vec<Op>, image: &PlacedImage, slug: &str) -> Result<()> {
        let id = self.image_id(image, slug)?;
        let placement = &image.placement;
        ops.push(Op::UseXobject {
            id,
            transform: XObjectTransform {
                translate_x: Some(Pt(placement.rect.x)),
                translate_y: Some(Pt(placement.rect.y)),
                scale_x: Some(placement.scale),
                scale_y: Some(placement.scale),
                rotate: None,
                dpi: Some(72.0),
            },
        });
        Ok(())
    }

    /// Each source file is embedded once and shared by every page using it
    fn image_id(&mut self, image: &PlacedImage, slug: &str) -> Result<XObjectId> {
        if let Some(id) = self.images.get(&image.path) {
            return Ok(id.clone());
        }

        let bytes = std::fs::read(&image.path)?;
        let mut warnings = Vec::new();
        let raw = RawImage::decode_from_bytes(&bytes, &mut warnings).map_err(|e| {
            BookError::ImageDecode {
                slug: slug.to_string(),
                path: image.path.clone(),
                reason: e.to_string(),
            }
        })?;

        let id = XObjectId::new();
        self.doc
            .resources
            .xobjects
            .map
            .insert(id.clone(), XObject::Image(raw));
        self.images.insert(image.path.clone(), id.clone());
        Ok(id)
    }

    fn draw_text(&self, ops: &mut Vec<Op>, text_box: &TextBox) {
        if text_box.lines.is_empty() {
            return;
        }

        let colour = text_box.colour;
        ops.push(Op::StartTextSection);
        ops.push(Op::SetFillColor {
            col: Color::Rgb(Rgb::new(colour.r, colour.g, colour.b, None)),
        });
        match &self.font_id {
            Some(font) => ops.push(Op::SetFontSize {
                font: font.clone(),
                size: Pt(text_box.font_size),
            }),
            None => ops.push(Op::SetFontSizeBuiltinFont {
                font: BuiltinFont::Helvetica,
                size: Pt(text_box.font_size),
            }),
        }

        for line in &text_box.lines {
            for run in &line.runs {
                ops.push(Op::SetTextMatrix {
                    matrix: TextMatrix::Translate(Pt(run.x), Pt(line.baseline_y)),
                });
                let items = vec![TextItem::Text(run.text.clone())];
                match &self.font_id {
                    Some(font) => ops.push(Op::WriteText {
                        items,
                        font: font.clone(),
                    }),
                    None => ops.push(Op::WriteTextBuiltinFont {
                        items,
                        font: BuiltinFont::Helvetica,
                    }),
                }
            }
        }

        ops.push(Op::EndTextSection);
        log::trace!(
            "Region '{}' drawn in {} ({} line(s))",
            text_box.region,
            self.font.name(),
            text_box.lines.len()
        );
    }
}

fn write_page_boxes(bytes: &[u8], boxes: &[(Rect, Rect)]) -> Result<Vec<u8>> {
    let mut doc = lopdf::Document::load_mem(bytes)?;
    let pages = doc.get_pages();
    if pages.len() != boxes.len() {
        return Err(BookError::Pdf(format!(
            "expected {} page(s) in the written document, found {}",
            boxes.len(),
            pages.len()
        )));
    }

    for (page_id, (canvas, trim)) in pages.values().zip(boxes) {
        let page = doc.get_dictionary_mut(*page_id)?;
        page.set("MediaBox", corners(canvas));
        page.set("TrimBox", corners(trim));
        page.set("CropBox", corners(canvas));
    }

    let mut out = Vec::new();
    doc.save_to(&mut out)?;
    Ok(out)
}

fn corners(rect: &Rect) -> Object {
    Object::Array(vec![
        Object::Real(rect.x),
        Object::Real(rect.y),
        Object::Real(rect.x + rect.width),
        Object::Real(rect.y + rect.height),
    ])
}

fn pdf_rect(rect: &Rect) -> printpdf::Rect {
    printpdf::Rect {
        x: Pt(rect.x),
        y: Pt(rect.y),
        width: Pt(rect.width),
        height: Pt(rect.height),
    }
}
