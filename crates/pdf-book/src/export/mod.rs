//! Rasterized page exports of a finished PDF

mod raster;

pub use raster::*;
