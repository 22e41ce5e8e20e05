use super::margins::RegionInsets;
use crate::constants::*;
use crate::geometry::Rect;
use crate::options::RegionOptions;
use crate::types::*;
use std::path::PathBuf;

/// A named text region with its options resolved to points
#[derive(Debug, Clone, PartialEq)]
pub struct RegionLayout {
    pub name: String,
    pub font_size: f32,
    pub leading: f32,
    pub box_height: f32,
    pub insets: RegionInsets,
    pub origin: Origin,
    pub colour: Colour,
    pub align: TextAlign,
    /// Folder for file-based snippets, already resolved
    pub folder: Option<PathBuf>,
}

impl RegionLayout {
    /// Resolve region options. `folder` is the region folder after path resolution.
    pub fn from_options(name: &str, options: &RegionOptions, folder: Option<PathBuf>) -> Self {
        Self {
            name: name.to_string(),
            font_size: options.font_size_pt,
            leading: options
                .leading_pt
                .unwrap_or(options.font_size_pt * DEFAULT_LEADING_RATIO),
            box_height: in_to_pt(options.box_height_in),
            insets: RegionInsets::from_options(&options.inset_in),
            origin: options
                .origin
                .unwrap_or_else(|| Origin::for_region_name(name)),
            colour: options.color,
            align: options.align,
            folder,
        }
    }

    /// The region's box on a page canvas.
    ///
    /// Fails when the box has no area or does not fit vertically.
    pub fn text_rect(&self, canvas: Rect, side: PageSide, slug: &str) -> Result<Rect> {
        let layout_error = |reason: String| BookError::Layout {
            slug: slug.to_string(),
            region: self.name.clone(),
            reason,
        };

        let (left, right) = self.insets.horizontal(side);
        let width = canvas.width - left - right;
        let height = self.box_height;
        if !(width > 0.0 && height > 0.0) {
            return Err(layout_error(format!(
                "text box has no area ({width:.1}x{height:.1}pt)"
            )));
        }

        let y = match self.origin {
            Origin::Top => canvas.top() - self.insets.top - height,
            Origin::Bottom => canvas.y + self.insets.bottom,
            Origin::Center => canvas.y + (canvas.height - height) / 2.0 - self.insets.center,
        };

        if y < canvas.y - GEOMETRY_EPSILON || y + height > canvas.top() + GEOMETRY_EPSILON {
            return Err(layout_error(format!(
                "text box {:.1}pt high at y={y:.1}pt does not fit on a {:.1}pt page",
                height, canvas.height
            )));
        }

        Ok(Rect::new(canvas.x + left, y, width, height))
    }
}
