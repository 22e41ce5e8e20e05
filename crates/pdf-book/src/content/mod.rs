//! Content resolution
//!
//! Turns the loose text shapes accepted in configs and text libraries into
//! concrete strings for one page side, and page images into checked paths.

mod library;
mod resolver;
mod text;

pub use library::*;
pub use resolver::*;
pub use text::*;
