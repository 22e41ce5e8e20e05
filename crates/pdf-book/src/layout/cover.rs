use super::types::*;
use crate::geometry::{BookGeometry, Rect};

/// How a page image is scaled and shifted on top of cover fitting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverAdjust {
    /// Multiplier on the cover scale
    pub image_scale: f32,
    pub offset_x_pt: f32,
    pub offset_y_pt: f32,
}

impl Default for CoverAdjust {
    fn default() -> Self {
        Self {
            image_scale: 1.0,
            offset_x_pt: 0.0,
            offset_y_pt: 0.0,
        }
    }
}

/// Scale an image to cover `area`, centre it, then apply the offset.
///
/// Returns the drawn rectangle and the points-per-pixel scale.
pub fn cover_rect(area: Rect, image: ImageSize, adjust: CoverAdjust) -> (Rect, f32) {
    let iw = image.width.max(1) as f32;
    let ih = image.height.max(1) as f32;
    let scale = (area.width / iw).max(area.height / ih) * adjust.image_scale;
    let width = iw * scale;
    let height = ih * scale;
    let x = area.x + (area.width - width) / 2.0 + adjust.offset_x_pt;
    let y = area.y + (area.height - height) / 2.0 + adjust.offset_y_pt;
    (Rect::new(x, y, width, height), scale)
}

/// Source pixels of an image drawn at `drawn` that fall inside `view`
pub fn visible_crop(drawn: Rect, scale: f32, view: Rect) -> PixelRect {
    match drawn.intersect(&view) {
        Some(visible) if scale > 0.0 => PixelRect {
            x: (visible.x - drawn.x) / scale,
            y: (drawn.top() - visible.top()) / scale,
            width: visible.width / scale,
            height: visible.height / scale,
        },
        _ => PixelRect::default(),
    }
}

/// Cover placement for a page that owns its image
pub fn place_single(canvas: Rect, image: ImageSize, adjust: CoverAdjust) -> ImagePlacement {
    let (rect, scale) = cover_rect(canvas, image, adjust);
    ImagePlacement {
        rect,
        scale,
        source_crop: visible_crop(rect, scale, canvas),
        spread_half: None,
    }
}

/// The two halves of a spread canvas, split at the spine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpreadSplit {
    pub left: Rect,
    pub right: Rect,
}

pub fn split_spread(geometry: &BookGeometry) -> SpreadSplit {
    let spread = geometry.spread_canvas();
    let spine = geometry.spine_x();
    SpreadSplit {
        left: Rect::new(spread.x, spread.y, spine - spread.x, spread.height),
        right: Rect::new(spine, spread.y, spread.right() - spine, spread.height),
    }
}

/// Place one image across both pages of a spread.
///
/// The cover is computed once on the spread canvas. The left page shows
/// spread x in `[0, canvas_w]`, the right page spread x in
/// `[trim_w, spread_w]`, so the trim boxes meet at the spine and each page's
/// gutter bleed carries the art from across the spine.
pub fn place_spread(
    geometry: &BookGeometry,
    image: ImageSize,
    adjust: CoverAdjust,
) -> [ImagePlacement; 2] {
    let (rect, scale) = cover_rect(geometry.spread_canvas(), image, adjust);
    let split = split_spread(geometry);

    let left = ImagePlacement {
        rect,
        scale,
        source_crop: visible_crop(rect, scale, split.left),
        spread_half: Some(split.left),
    };
    let right = ImagePlacement {
        rect: rect.translate(-geometry.trim_width_pt, 0.0),
        scale,
        source_crop: visible_crop(rect, scale, split.right),
        spread_half: Some(split.right),
    };
    [left, right]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::GEOMETRY_EPSILON;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < GEOMETRY_EPSILON
    }

    #[test]
    fn test_cover_fills_canvas() {
        let canvas = Rect::new(0.0, 0.0, 450.0, 666.0);
        let (rect, scale) = cover_rect(
            canvas,
            ImageSize {
                width: 1000,
                height: 1000,
            },
            CoverAdjust::default(),
        );
        assert!(close(scale, 0.666));
        assert!(close(rect.width, 666.0));
        assert!(close(rect.height, 666.0));
        assert!(close(rect.center_x(), canvas.center_x()));
        assert!(rect.x <= canvas.x && rect.right() >= canvas.right());
    }

    #[test]
    fn test_cover_scale_and_offset() {
        let canvas = Rect::new(0.0, 0.0, 100.0, 100.0);
        let adjust = CoverAdjust {
            image_scale: 2.0,
            offset_x_pt: 10.0,
            offset_y_pt: -5.0,
        };
        let (rect, scale) = cover_rect(
            canvas,
            ImageSize {
                width: 50,
                height: 100,
            },
            adjust,
        );
        assert!(close(scale, 4.0));
        assert!(close(rect.width, 200.0));
        assert!(close(rect.height, 400.0));
        assert!(close(rect.x, -50.0 + 10.0));
        assert!(close(rect.y, -150.0 - 5.0));
    }

    #[test]
    fn test_single_crop() {
        let canvas = Rect::new(0.0, 0.0, 100.0, 50.0);
        let placement = place_single(
            canvas,
            ImageSize {
                width: 200,
                height: 200,
            },
            CoverAdjust::default(),
        );
        // Scale 0.5: 200x200 px drawn as 100x100, vertically centred
        assert!(close(placement.source_crop.x, 0.0));
        assert!(close(placement.source_crop.width, 200.0));
        assert!(close(placement.source_crop.y, 50.0));
        assert!(close(placement.source_crop.height, 100.0));
    }

    #[test]
    fn test_spread_halves_are_complementary() {
        let geometry = BookGeometry::from_inches(6.0, 9.0, 0.125).unwrap();
        let split = split_spread(&geometry);
        assert!(close(
            split.left.width + split.right.width,
            geometry.spread_canvas().width
        ));
        assert!(close(split.left.right(), split.right.x));

        let [left, right] = place_spread(
            &geometry,
            ImageSize {
                width: 2000,
                height: 1500,
            },
            CoverAdjust::default(),
        );
        assert!((left.source_crop.x + left.source_crop.width - right.source_crop.x).abs() < 0.01);
        // The image overhangs the spread slightly, so together the halves
        // show exactly the spread width worth of source pixels
        let total = geometry.spread_canvas().width / left.scale;
        assert!((left.source_crop.width + right.source_crop.width - total).abs() < 0.01);
        assert!(close(left.scale, right.scale));
        assert!(close(right.rect.x, left.rect.x - geometry.trim_width_pt));
    }
}
