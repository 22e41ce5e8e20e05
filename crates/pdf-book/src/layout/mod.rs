//! Layout calculation for book pages
//!
//! This module handles all the geometric work between resolved content and
//! drawing:
//! - Cover fitting of page images, including spreads split at the spine
//! - Text region rectangles with margins mirrored around the spine
//! - Line wrapping and alignment inside each region

mod cover;
mod margins;
mod regions;
mod text;
mod types;

pub use cover::*;
pub use margins::*;
pub use regions::*;
pub use text::*;
pub use types::*;

use crate::geometry::{BookGeometry, Rect};
use crate::types::*;

/// Lays out resolved pages on the book's canvas
pub struct PageLayouter<'a> {
    geometry: BookGeometry,
    regions: &'a [RegionLayout],
    measure: &'a dyn TextMeasure,
}

impl<'a> PageLayouter<'a> {
    pub fn new(
        geometry: BookGeometry,
        regions: &'a [RegionLayout],
        measure: &'a dyn TextMeasure,
    ) -> Self {
        Self {
            geometry,
            regions,
            measure,
        }
    }

    /// Lay out a page that owns its image
    pub fn layout_single(&self, page: &ResolvedPage) -> Result<LayoutResult> {
        let canvas = self.geometry.canvas();
        let image = page.image.as_ref().map(|source| PlacedImage {
            path: source.path.clone(),
            placement: place_single(canvas, source.size, cover_adjust(page)),
        });
        self.finish(page, image)
    }

    /// Lay out two facing pages sharing the left page's image.
    ///
    /// The left page must be even-numbered and the right page must follow it.
    pub fn layout_spread(
        &self,
        left: &ResolvedPage,
        right: &ResolvedPage,
    ) -> Result<[LayoutResult; 2]> {
        let left_parity = PageSide::from_page_number(left.page_number);
        if left.side != PageSide::Left || left_parity != PageSide::Left {
            return Err(BookError::SpreadAlignment {
                slug: left.slug.clone(),
                page_number: left.page_number,
            });
        }
        if right.page_number != left.page_number + 1 {
            return Err(BookError::Layout {
                slug: right.slug.clone(),
                region: "image".to_string(),
                reason: format!(
                    "spread pages must be consecutive, got {} and {}",
                    left.page_number, right.page_number
                ),
            });
        }

        let (left_image, right_image) = match &left.image {
            Some(source) => {
                let [l, r] = place_spread(&self.geometry, source.size, cover_adjust(left));
                (
                    Some(PlacedImage {
                        path: source.path.clone(),
                        placement: l,
                    }),
                    Some(PlacedImage {
                        path: source.path.clone(),
                        placement: r,
                    }),
                )
            }
            None => (None, None),
        };

        Ok([
            self.finish(left, left_image)?,
            self.finish(right, right_image)?,
        ])
    }

    fn finish(&self, page: &ResolvedPage, image: Option<PlacedImage>) -> Result<LayoutResult> {
        let canvas = self.geometry.canvas();
        Ok(LayoutResult {
            page_number: page.page_number,
            slug: page.slug.clone(),
            side: page.side,
            canvas,
            trim_box: self.geometry.trim_box(),
            image,
            text_boxes: self.layout_text(page, canvas)?,
        })
    }

    fn layout_text(&self, page: &ResolvedPage, canvas: Rect) -> Result<Vec<TextBox>> {
        let mut boxes = Vec::new();
        for region in self.regions {
            let Some(text) = page.texts.get(&region.name) else {
                continue;
            };
            let rect = region.text_rect(canvas, page.side, &page.slug)?;
            let style = TextStyle {
                font_size: region.font_size,
                leading: region.leading,
                align: region.align,
            };
            let flowed = flow_text(rect, text, self.measure, style);
            if flowed.dropped_lines > 0 {
                log::warn!(
                    "Page {} ('{}'): {} line(s) of region '{}' do not fit and were dropped",
                    page.page_number,
                    page.slug,
                    flowed.dropped_lines,
                    region.name
                );
            }
            boxes.push(TextBox {
                region: region.name.clone(),
                rect,
                text: text.clone(),
                lines: flowed.lines,
                font_size: region.font_size,
                leading: region.leading,
                colour: region.colour,
                align: region.align,
            });
        }
        Ok(boxes)
    }
}

fn cover_adjust(page: &ResolvedPage) -> CoverAdjust {
    CoverAdjust {
        image_scale: page.image_scale,
        offset_x_pt: page.offset_x_pt,
        offset_y_pt: page.offset_y_pt,
    }
}
