//! Shared constants for book layout
//!
//! This module centralizes unit conversion and the defaults applied when a
//! book config leaves a value out.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per inch (PDF user space unit)
pub const POINTS_PER_INCH: f32 = 72.0;

/// Convert inches to points
#[inline]
pub fn in_to_pt(inches: f32) -> f32 {
    inches * POINTS_PER_INCH
}

/// Convert points to inches
#[inline]
pub fn pt_to_in(pt: f32) -> f32 {
    pt / POINTS_PER_INCH
}

/// Tolerance used when comparing geometry computed in points
pub const GEOMETRY_EPSILON: f32 = 1e-3;

// =============================================================================
// Book Defaults
// =============================================================================

/// Default trim width in inches
pub const DEFAULT_TRIM_WIDTH_IN: f32 = 6.0;

/// Default trim height in inches
pub const DEFAULT_TRIM_HEIGHT_IN: f32 = 9.0;

/// Default output PDF path (relative to the config file)
pub const DEFAULT_OUTPUT_PDF: &str = "book.pdf";

/// Config path used by the CLI when none is given
pub const DEFAULT_CONFIG_PATH: &str = "content/pages.yaml";

/// Font name used when the config names none
pub const DEFAULT_FONT_NAME: &str = "Lexend";

// =============================================================================
// Text Regions
// =============================================================================

/// Default font size for a text region (points)
pub const DEFAULT_FONT_SIZE_PT: f32 = 26.0;

/// Default leading as a multiple of the font size
pub const DEFAULT_LEADING_RATIO: f32 = 1.2;

/// Default text box height (inches)
pub const DEFAULT_BOX_HEIGHT_IN: f32 = 1.5;

/// Default inset for any side a region leaves unspecified (inches)
pub const DEFAULT_INSET_IN: f32 = 0.5;

/// Default text colour
pub const DEFAULT_TEXT_COLOUR: &str = "#111111";

/// Padding between a text box edge and its first/last line (points)
pub const FRAME_PADDING_PT: f32 = 6.0;

/// Approximate character width ratio for the built-in Helvetica
pub const HELVETICA_CHAR_WIDTH_RATIO: f32 = 0.5;

/// Helvetica ascender as a fraction of the font size
pub const HELVETICA_ASCENT_RATIO: f32 = 0.718;

/// Helvetica descender as a fraction of the font size (negative)
pub const HELVETICA_DESCENT_RATIO: f32 = -0.207;

/// Tab stops are expanded to this many spaces before wrapping
pub const TAB_SIZE: usize = 4;

// =============================================================================
// Raster Export
// =============================================================================

/// Default resolution for exported page images
pub const DEFAULT_RASTER_DPI: u32 = 300;

/// Zero-padded width of the page number in exported image names
pub const PAGE_NUMBER_DIGITS: usize = 3;

/// pdfium library folder looked up next to the book config
pub const PDFIUM_VENDOR_DIR: &str = "vendor/pdfium/lib";
