//! PDF output: fonts and page drawing

mod font;
mod pdf;

pub use font::{BookFont, EmbeddedFont};
pub use pdf::PdfRenderer;
