use super::library::TextLibrary;
use super::text::TextSpec;
use crate::types::*;
use std::path::{Path, PathBuf};

/// Everything text resolution needs to know about the page being built
#[derive(Debug, Clone, Copy)]
pub struct TextRequest<'a> {
    pub slug: &'a str,
    pub region: &'a str,
    pub side: PageSide,
    /// Position of the page within its entry (0 for the first page)
    pub index: usize,
    /// Folder holding file-based snippets for the region
    pub folder: Option<&'a Path>,
}

/// Resolve the text of one region on one page.
///
/// An absent source falls back to the library entry for the page's slug
/// without complaint; explicit references that cannot be found are errors.
/// Whitespace-only results are `None`.
pub fn resolve_text(
    spec: Option<&TextSpec>,
    request: &TextRequest<'_>,
    library: &TextLibrary,
) -> Result<Option<String>> {
    let text = match spec {
        Some(spec) => resolve_spec(spec, request, library)?,
        None => match library.region(request.slug, request.region) {
            Some(raw) => {
                let spec = library_spec(raw, request.slug, request)?;
                resolve_spec(&spec, request, library)?
            }
            None => None,
        },
    };
    Ok(text.filter(|text| !text.is_empty()))
}

fn resolve_spec(
    spec: &TextSpec,
    request: &TextRequest<'_>,
    library: &TextLibrary,
) -> Result<Option<String>> {
    match spec {
        TextSpec::Inline(text) | TextSpec::Scalar(text) => Ok(Some(text.trim().to_string())),
        TextSpec::File(name) => read_snippet(name, request).map(Some),
        TextSpec::Library(key) => {
            let key = key.as_deref().unwrap_or(request.slug);
            let not_found = || BookError::ContentNotFound {
                slug: request.slug.to_string(),
                region: request.region.to_string(),
                key: key.to_string(),
            };
            let entry = library.entry(key).ok_or_else(not_found)?;
            match entry.get(request.region).ok_or_else(not_found)? {
                Some(raw) => {
                    let spec = library_spec(raw, key, request)?;
                    resolve_spec(&spec, request, library)
                }
                None => Ok(None),
            }
        }
        TextSpec::Directional { left, right } => {
            let chosen = match request.side {
                PageSide::Left => left,
                PageSide::Right => right,
            };
            match chosen {
                Some(spec) => resolve_spec(spec, request, library),
                None => Ok(None),
            }
        }
        TextSpec::BySide(items) => match items.get(request.index).or_else(|| items.last()) {
            Some(Some(spec)) => resolve_spec(spec, request, library),
            Some(None) | None => Ok(None),
        },
    }
}

/// Parse a library value, which may not point back into the library
fn library_spec(
    raw: &crate::options::RawText,
    key: &str,
    request: &TextRequest<'_>,
) -> Result<TextSpec> {
    let spec = TextSpec::parse(raw, key, request.region)?;
    if spec.references_library() {
        return Err(BookError::Config(format!(
            "text library entry '{key}', region '{}': library values cannot reference the library",
            request.region
        )));
    }
    Ok(spec)
}

fn read_snippet(name: &str, request: &TextRequest<'_>) -> Result<String> {
    let folder = request.folder.ok_or_else(|| {
        BookError::Config(format!(
            "page '{}': region '{}' has no folder, so file-based text is unavailable",
            request.slug, request.region
        ))
    })?;
    match std::fs::read_to_string(folder.join(name)) {
        Ok(contents) => Ok(contents.trim().to_string()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(BookError::ContentNotFound {
            slug: request.slug.to_string(),
            region: request.region.to_string(),
            key: name.to_string(),
        }),
        Err(e) => Err(e.into()),
    }
}

/// Resolve a page image against the image folder; the file must exist
pub fn resolve_image(slug: &str, image: &Path, image_folder: &Path) -> Result<PathBuf> {
    let path = if image.is_absolute() {
        image.to_owned()
    } else {
        image_folder.join(image)
    };
    if !path.is_file() {
        return Err(BookError::AssetNotFound {
            owner: slug.to_string(),
            kind: AssetKind::Image,
            path,
        });
    }
    Ok(path)
}
