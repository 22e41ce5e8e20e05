use crate::options::{LibraryKey, RawText, RawTextMap, Scalar};
use crate::types::{BookError, Result};

/// String shorthand for a text library reference: `@library` or `@library:<key>`
pub const LIBRARY_SHORTHAND: &str = "@library";

/// Where the text of one region comes from.
///
/// Parsed once from the loose config shapes; resolution then only has to
/// pick a variant per page side.
#[derive(Debug, Clone, PartialEq)]
pub enum TextSpec {
    /// Literal text from an `inline:` key
    Inline(String),
    /// File name inside the region's folder
    File(String),
    /// Text library entry; `None` means "the page's own slug"
    Library(Option<String>),
    /// Separate sources for left- and right-hand pages
    Directional {
        left: Option<Box<TextSpec>>,
        right: Option<Box<TextSpec>>,
    },
    /// A bare string, number or boolean: the same text on every page
    Scalar(String),
    /// One source per page of the entry, the last one repeating; `None` is blank
    BySide(Vec<Option<TextSpec>>),
}

impl TextSpec {
    /// Parse a raw config value for `slug`/`region`
    pub fn parse(raw: &RawText, slug: &str, region: &str) -> Result<Self> {
        match raw {
            RawText::Scalar(Scalar::Text(text)) => Ok(parse_string(text)),
            RawText::Scalar(scalar) => Ok(TextSpec::Scalar(scalar.clone().into_text())),
            RawText::List(items) => items
                .iter()
                .map(|item| TextSpec::parse_optional(item.as_ref(), slug, region))
                .collect::<Result<Vec<_>>>()
                .map(TextSpec::BySide),
            RawText::Map(map) => parse_map(map, slug, region),
        }
    }

    /// Parse an optional value; `null` and missing both mean "no explicit source"
    pub fn parse_optional(raw: Option<&RawText>, slug: &str, region: &str) -> Result<Option<Self>> {
        raw.map(|raw| TextSpec::parse(raw, slug, region)).transpose()
    }

    /// True when resolving this source can reach the text library
    pub fn references_library(&self) -> bool {
        match self {
            TextSpec::Library(_) => true,
            TextSpec::Directional { left, right } => [left, right]
                .into_iter()
                .flatten()
                .any(|spec| spec.references_library()),
            TextSpec::BySide(items) => items.iter().flatten().any(TextSpec::references_library),
            TextSpec::Inline(_) | TextSpec::File(_) | TextSpec::Scalar(_) => false,
        }
    }
}

fn parse_string(text: &str) -> TextSpec {
    if let Some(rest) = text.strip_prefix(LIBRARY_SHORTHAND) {
        if rest.is_empty() {
            return TextSpec::Library(None);
        }
        if let Some(key) = rest.strip_prefix(':') {
            let key = key.trim();
            return TextSpec::Library((!key.is_empty()).then(|| key.to_string()));
        }
    }
    TextSpec::Scalar(text.to_string())
}

fn parse_map(map: &RawTextMap, slug: &str, region: &str) -> Result<TextSpec> {
    if let Some(inline) = &map.inline {
        return Ok(TextSpec::Inline(inline.clone().into_text()));
    }
    if let Some(file) = &map.file {
        return Ok(TextSpec::File(file.clone()));
    }
    match &map.library {
        Some(LibraryKey::Key(key)) if !key.trim().is_empty() => {
            return Ok(TextSpec::Library(Some(key.trim().to_string())));
        }
        Some(LibraryKey::Key(_)) | Some(LibraryKey::Flag(true)) => {
            return Ok(TextSpec::Library(None));
        }
        Some(LibraryKey::Flag(false)) | None => {}
    }
    if map.left.is_some() || map.right.is_some() {
        let side = |raw: &Option<Box<RawText>>| -> Result<Option<Box<TextSpec>>> {
            raw.as_deref()
                .map(|raw| TextSpec::parse(raw, slug, region).map(Box::new))
                .transpose()
        };
        return Ok(TextSpec::Directional {
            left: side(&map.left)?,
            right: side(&map.right)?,
        });
    }
    Err(BookError::Config(format!(
        "page '{slug}', region '{region}': text mapping needs one of 'inline', 'file', 'library', 'left' or 'right'"
    )))
}
