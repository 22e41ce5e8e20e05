use crate::constants::{DEFAULT_INSET_IN, in_to_pt};
use crate::options::InsetOptions;
use crate::types::PageSide;

/// Insets of a text region in points.
///
/// `inner`/`outer` are relative to the spine and win over `left`/`right`
/// once the page side is known.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionInsets {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
    pub inner: Option<f32>,
    pub outer: Option<f32>,
    /// Downward nudge for centred regions
    pub center: f32,
}

impl RegionInsets {
    pub fn uniform(inset_pt: f32) -> Self {
        Self {
            left: inset_pt,
            right: inset_pt,
            top: inset_pt,
            bottom: inset_pt,
            inner: None,
            outer: None,
            center: 0.0,
        }
    }

    pub fn from_options(options: &InsetOptions) -> Self {
        match options {
            InsetOptions::Uniform(inches) => Self::uniform(in_to_pt(*inches)),
            InsetOptions::Sides(sides) => {
                let side = |value: Option<f32>| in_to_pt(value.unwrap_or(DEFAULT_INSET_IN));
                Self {
                    left: side(sides.left),
                    right: side(sides.right),
                    top: side(sides.top),
                    bottom: side(sides.bottom),
                    inner: sides.inner.map(in_to_pt),
                    outer: sides.outer.map(in_to_pt),
                    center: sides.center.map(in_to_pt).unwrap_or(0.0),
                }
            }
        }
    }

    /// Left and right insets for a page on `side`.
    ///
    /// The spine is on the right edge of left-hand pages and on the left
    /// edge of right-hand pages.
    pub fn horizontal(&self, side: PageSide) -> (f32, f32) {
        let (mut left, mut right) = (self.left, self.right);
        match side {
            PageSide::Left => {
                if let Some(inner) = self.inner {
                    right = inner;
                }
                if let Some(outer) = self.outer {
                    left = outer;
                }
            }
            PageSide::Right => {
                if let Some(inner) = self.inner {
                    left = inner;
                }
                if let Some(outer) = self.outer {
                    right = outer;
                }
            }
        }
        (left, right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::InsetSides;

    #[test]
    fn test_inner_follows_spine() {
        let insets = RegionInsets::from_options(&InsetOptions::Sides(InsetSides {
            inner: Some(1.0),
            outer: Some(0.25),
            ..Default::default()
        }));
        // Even page: spine on the right
        assert_eq!(insets.horizontal(PageSide::Left), (18.0, 72.0));
        // Odd page: spine on the left
        assert_eq!(insets.horizontal(PageSide::Right), (72.0, 18.0));
    }

    #[test]
    fn test_missing_sides_use_default() {
        let insets = RegionInsets::from_options(&InsetOptions::Sides(InsetSides {
            left: Some(1.0),
            ..Default::default()
        }));
        assert_eq!(insets.left, 72.0);
        assert_eq!(insets.right, 36.0);
        assert_eq!(insets.top, 36.0);
        assert_eq!(insets.center, 0.0);
        assert_eq!(insets.horizontal(PageSide::Left), (72.0, 36.0));
        assert_eq!(insets.horizontal(PageSide::Right), (72.0, 36.0));
    }

    #[test]
    fn test_uniform_insets() {
        let insets = RegionInsets::from_options(&InsetOptions::Uniform(0.25));
        assert_eq!(insets, RegionInsets::uniform(18.0));
        assert_eq!(insets.horizontal(PageSide::Left), (18.0, 18.0));
    }
}
