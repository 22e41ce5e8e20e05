use crate::constants::*;
use crate::options::{BookConfig, RasterFormat};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[cfg(feature = "raster")]
use pdfium_render::prelude::*;

/// Failures while rasterizing pages. These never fail a build.
#[derive(Error, Debug)]
pub enum ExportError {
    #[cfg(feature = "raster")]
    #[error("Pdfium error: {0}")]
    Pdfium(#[from] PdfiumError),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Page {0} produced an unusable bitmap")]
    Bitmap(u32),
    #[error("Raster export unavailable: {0}")]
    Unavailable(String),
}

/// Where and how finished pages are written as images
#[derive(Debug, Clone, PartialEq)]
pub struct RasterOptions {
    pub folder: PathBuf,
    /// File name prefix, the PDF's stem
    pub stem: String,
    pub format: RasterFormat,
    pub dpi: u32,
    /// Folders searched for the pdfium library, in order, before the system one
    pub library_dirs: Vec<PathBuf>,
}

impl RasterOptions {
    /// Settings for a config, or `None` when image output is absent or disabled
    pub fn from_config(config: &BookConfig) -> Option<Self> {
        let output = config.book.image_output.as_ref().filter(|o| o.enabled)?;
        let pdf_path = config.output_pdf();
        let stem = pdf_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "book".to_string());
        let folder = match &output.folder {
            Some(folder) => config.resolve_path(folder),
            None => pdf_path
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join(format!("{stem}-pages")),
        };
        let mut library_dirs: Vec<PathBuf> = output
            .pdfium_library
            .iter()
            .map(|dir| config.resolve_path(dir))
            .collect();
        library_dirs.push(config.resolve_path(Path::new(PDFIUM_VENDOR_DIR)));
        Some(Self {
            folder,
            stem,
            format: output.format,
            dpi: output.dpi,
            library_dirs,
        })
    }

    /// `<folder>/<stem>-<page:03>.<ext>`
    pub fn page_image_path(&self, page_number: u32) -> PathBuf {
        self.folder.join(format!(
            "{}-{:0width$}.{}",
            self.stem,
            page_number,
            self.format.extension(),
            width = PAGE_NUMBER_DIGITS
        ))
    }

    /// Pixel size of a page `width_pt` x `height_pt` at the configured dpi
    pub fn pixel_size(&self, width_pt: f32, height_pt: f32) -> (u32, u32) {
        let px = |pt: f32| ((pt_to_in(pt) * self.dpi as f32).round() as u32).max(1);
        (px(width_pt), px(height_pt))
    }
}

/// Bind pdfium from the first library folder that works, else the system copy
#[cfg(feature = "raster")]
fn init_pdfium(library_dirs: &[PathBuf]) -> Result<Pdfium, PdfiumError> {
    for dir in library_dirs.iter().filter(|dir| dir.is_dir()) {
        match Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir)) {
            Ok(binding) => {
                log::debug!("Using pdfium from {}", dir.display());
                return Ok(Pdfium::new(binding));
            }
            Err(e) => log::debug!("No usable pdfium in {}: {e}", dir.display()),
        }
    }

    Pdfium::bind_to_system_library().map(Pdfium::new)
}

/// Render every page of a written PDF to an image file
#[cfg(feature = "raster")]
pub fn export_pages(pdf_path: &Path, options: &RasterOptions) -> Result<Vec<PathBuf>, ExportError> {
    let pdfium = init_pdfium(&options.library_dirs)?;
    let bytes = std::fs::read(pdf_path)?;
    let document = pdfium.load_pdf_from_byte_slice(&bytes, None)?;

    std::fs::create_dir_all(&options.folder)?;

    let mut written = Vec::new();
    for (index, page) in document.pages().iter().enumerate() {
        let page_number = index as u32 + 1;
        let (width, height) = options.pixel_size(page.width().value, page.height().value);
        let config = PdfRenderConfig::new()
            .set_target_width(width as i32)
            .set_maximum_height(height as i32);

        let bitmap = page.render_with_config(&config)?;
        let rgba = image::RgbaImage::from_raw(
            bitmap.width() as u32,
            bitmap.height() as u32,
            bitmap.as_rgba_bytes().to_vec(),
        )
        .ok_or(ExportError::Bitmap(page_number))?;

        let path = options.page_image_path(page_number);
        let flattened = image::DynamicImage::ImageRgba8(rgba).into_rgb8();
        flattened.save_with_format(&path, options.format.image_format())?;
        log::debug!("Wrote {}", path.display());
        written.push(path);
    }

    Ok(written)
}

#[cfg(not(feature = "raster"))]
pub fn export_pages(
    _pdf_path: &Path,
    _options: &RasterOptions,
) -> Result<Vec<PathBuf>, ExportError> {
    Err(ExportError::Unavailable(
        "pdf-book was built without the 'raster' feature".to_string(),
    ))
}
