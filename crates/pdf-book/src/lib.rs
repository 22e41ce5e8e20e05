pub mod assemble;
mod book;
pub mod constants;
pub mod content;
pub mod export;
pub mod geometry;
pub mod layout;
mod options;
pub mod render;
mod stats;
mod types;

pub use book::Book;
pub use content::TextLibrary;
pub use export::{ExportError, RasterOptions, export_pages};
pub use geometry::{BookGeometry, Rect};
pub use options::*;
pub use render::BookFont;
pub use stats::{BookStatistics, calculate_statistics};
pub use types::*;

use std::path::{Path, PathBuf};

/// Outcome of a successful build
#[derive(Debug, Clone, PartialEq)]
pub struct BuildReport {
    pub pdf_path: PathBuf,
    pub pages: usize,
    /// Page images written by the raster export (empty when disabled or failed)
    pub images: Vec<PathBuf>,
}

/// Build the book described by a config file.
///
/// The PDF is written only when every page laid out successfully. Page
/// image export runs afterwards; its failures are logged, not returned.
pub async fn build_book(config_path: impl AsRef<Path>) -> Result<BuildReport> {
    let config_path = config_path.as_ref();
    log::info!("Loading book config {}", config_path.display());

    let config = BookConfig::load(config_path).await?;
    config.validate()?;
    let library = load_library(&config).await?;
    let font_bytes = load_font_bytes(&config).await?;
    let output_pdf = config.output_pdf();
    let raster = RasterOptions::from_config(&config);

    // Layout and PDF generation are CPU-bound, spawn blocking
    let (bytes, pages) = tokio::task::spawn_blocking(move || {
        let font = match font_bytes {
            Some(bytes) => BookFont::embedded(&config.book.font.name, bytes)?,
            None => BookFont::builtin(),
        };
        let book = Book::new(config, library, font)?;
        let layouts = book.layout()?;
        let bytes = book.render(&layouts)?;
        Ok::<_, BookError>((bytes, layouts.len()))
    })
    .await??;

    if let Some(parent) = output_pdf.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&output_pdf, bytes).await?;
    log::info!("Created {} ({} pages)", output_pdf.display(), pages);

    let images = match raster {
        Some(options) => export_images(output_pdf.clone(), options).await,
        None => Vec::new(),
    };

    Ok(BuildReport {
        pdf_path: output_pdf,
        pages,
        images,
    })
}

/// Page statistics for a config file, without loading images or fonts
pub async fn load_statistics(config_path: impl AsRef<Path>) -> Result<BookStatistics> {
    let config = BookConfig::load(config_path).await?;
    config.validate()?;
    let library = load_library(&config).await?;
    if library.pages().is_empty() {
        calculate_statistics(&config.pages)
    } else {
        calculate_statistics(library.pages())
    }
}

async fn load_library(config: &BookConfig) -> Result<TextLibrary> {
    match config.text_library_path() {
        Some(path) => TextLibrary::load(&path).await,
        None => Ok(TextLibrary::empty()),
    }
}

async fn load_font_bytes(config: &BookConfig) -> Result<Option<Vec<u8>>> {
    let Some(path) = config.font_path() else {
        log::info!(
            "No font path configured for '{}', using built-in Helvetica",
            config.book.font.name
        );
        return Ok(None);
    };
    match tokio::fs::read(&path).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(BookError::AssetNotFound {
            owner: config.book.font.name.clone(),
            kind: AssetKind::Font,
            path,
        }),
        Err(e) => Err(e.into()),
    }
}

async fn export_images(pdf_path: PathBuf, options: RasterOptions) -> Vec<PathBuf> {
    let folder = options.folder.clone();
    match tokio::task::spawn_blocking(move || export_pages(&pdf_path, &options)).await {
        Ok(Ok(paths)) => {
            log::info!(
                "Exported {} page image(s) to {}",
                paths.len(),
                folder.display()
            );
            paths
        }
        Ok(Err(e)) => {
            log::warn!("Skipping page image export: {e}");
            Vec::new()
        }
        Err(e) => {
            log::warn!("Page image export task failed: {e}");
            Vec::new()
        }
    }
}
