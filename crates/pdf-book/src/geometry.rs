//! Physical page geometry
//!
//! All coordinates are PDF points with the origin at the bottom-left corner
//! of the page canvas and y growing upwards.

use crate::constants::in_to_pt;
use crate::types::{BookError, Result};

/// A rectangular area in points
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// X position (left edge)
    pub x: f32,
    /// Y position (bottom edge)
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x coordinate
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Top edge y coordinate
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    /// Center x coordinate
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Center y coordinate
    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Shrink the rectangle by the given amount on each edge
    pub fn inset(&self, left: f32, right: f32, bottom: f32, top: f32) -> Rect {
        Rect::new(
            self.x + left,
            self.y + bottom,
            self.width - left - right,
            self.height - bottom - top,
        )
    }

    /// Move the rectangle without resizing it
    pub fn translate(&self, dx: f32, dy: f32) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Overlapping area of two rectangles, or `None` when they do not overlap
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self.right().min(other.right());
        let y2 = self.top().min(other.top());
        if x2 > x1 && y2 > y1 {
            Some(Rect::new(x1, y1, x2 - x1, y2 - y1))
        } else {
            None
        }
    }
}

/// Trim and bleed of a book, in points.
///
/// Every page of a book shares the same canvas: the trim size plus the
/// bleed on each edge. A spread is laid out on a double-wide canvas that
/// holds both facing pages plus the outer bleeds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BookGeometry {
    pub trim_width_pt: f32,
    pub trim_height_pt: f32,
    pub bleed_pt: f32,
}

impl BookGeometry {
    pub fn from_inches(trim_width_in: f32, trim_height_in: f32, bleed_in: f32) -> Result<Self> {
        if !(trim_width_in > 0.0 && trim_height_in > 0.0) {
            return Err(BookError::Config(format!(
                "trim size must be positive, got {trim_width_in}x{trim_height_in}in"
            )));
        }
        if !(bleed_in >= 0.0) {
            return Err(BookError::Config(format!(
                "bleed must not be negative, got {bleed_in}in"
            )));
        }
        Ok(Self {
            trim_width_pt: in_to_pt(trim_width_in),
            trim_height_pt: in_to_pt(trim_height_in),
            bleed_pt: in_to_pt(bleed_in),
        })
    }

    pub fn canvas_width(&self) -> f32 {
        self.trim_width_pt + 2.0 * self.bleed_pt
    }

    pub fn canvas_height(&self) -> f32 {
        self.trim_height_pt + 2.0 * self.bleed_pt
    }

    /// The full page including bleed
    pub fn canvas(&self) -> Rect {
        Rect::new(0.0, 0.0, self.canvas_width(), self.canvas_height())
    }

    /// The final page after trimming, inside the canvas
    pub fn trim_box(&self) -> Rect {
        Rect::new(
            self.bleed_pt,
            self.bleed_pt,
            self.trim_width_pt,
            self.trim_height_pt,
        )
    }

    /// Both facing pages as one continuous surface
    pub fn spread_canvas(&self) -> Rect {
        Rect::new(
            0.0,
            0.0,
            2.0 * self.trim_width_pt + 2.0 * self.bleed_pt,
            self.canvas_height(),
        )
    }

    /// X coordinate of the spine on the spread canvas
    pub fn spine_x(&self) -> f32 {
        self.trim_width_pt + self.bleed_pt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_includes_bleed() {
        let geometry = BookGeometry::from_inches(6.0, 9.0, 0.125).unwrap();
        assert!((geometry.canvas_width() - 6.25 * 72.0).abs() < 1e-3);
        assert!((geometry.canvas_height() - 9.25 * 72.0).abs() < 1e-3);

        let trim = geometry.trim_box();
        assert!((trim.x - 9.0).abs() < 1e-4);
        assert!((trim.right() - (geometry.canvas_width() - 9.0)).abs() < 1e-3);
    }

    #[test]
    fn test_spread_canvas() {
        let geometry = BookGeometry::from_inches(6.0, 9.0, 0.125).unwrap();
        let spread = geometry.spread_canvas();
        assert!((spread.width - 12.25 * 72.0).abs() < 1e-3);
        assert!((spread.height - geometry.canvas_height()).abs() < 1e-6);
        assert!((geometry.spine_x() - 6.125 * 72.0).abs() < 1e-3);
    }

    #[test]
    fn test_invalid_geometry() {
        assert!(BookGeometry::from_inches(0.0, 9.0, 0.125).is_err());
        assert!(BookGeometry::from_inches(6.0, -1.0, 0.125).is_err());
        assert!(BookGeometry::from_inches(6.0, 9.0, -0.1).is_err());
        assert!(BookGeometry::from_inches(6.0, 9.0, 0.0).is_ok());
    }

    #[test]
    fn test_rect_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert_eq!(a.intersect(&b), Some(Rect::new(5.0, 5.0, 5.0, 5.0)));
        assert_eq!(a.intersect(&Rect::new(20.0, 0.0, 1.0, 1.0)), None);
    }
}
