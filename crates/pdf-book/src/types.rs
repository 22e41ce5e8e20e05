use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookError {
    #[error("{kind} not found for '{owner}': {}", path.display())]
    AssetNotFound {
        owner: String,
        kind: AssetKind,
        path: PathBuf,
    },
    #[error("page '{slug}', region '{region}': text source '{key}' not found")]
    ContentNotFound {
        slug: String,
        region: String,
        key: String,
    },
    #[error(
        "page '{slug}': spreads must start on an even (left-hand) page, but this one starts on page {page_number}"
    )]
    SpreadAlignment { slug: String, page_number: u32 },
    #[error("page '{slug}', region '{region}': {reason}")]
    Layout {
        slug: String,
        region: String,
        reason: String,
    },
    #[error("page '{slug}': cannot decode image {}: {reason}", path.display())]
    ImageDecode {
        slug: String,
        path: PathBuf,
        reason: String,
    },
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("PDF error: {0}")]
    Pdf(String),
    #[error("PDF error: {0}")]
    Lopdf(#[from] lopdf::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, BookError>;

/// What kind of file an [`BookError::AssetNotFound`] refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Image,
    Font,
    TextLibrary,
    Config,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AssetKind::Image => "image",
            AssetKind::Font => "font file",
            AssetKind::TextLibrary => "text library",
            AssetKind::Config => "config file",
        };
        f.write_str(name)
    }
}

/// Which side of the open book a page sits on.
///
/// Even page numbers are left-hand pages (spine on their right edge), odd
/// page numbers are right-hand pages (spine on their left edge). Page 1 is
/// therefore always a right-hand page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageSide {
    /// Left-hand page (even page numbers)
    Left,
    /// Right-hand page (odd page numbers)
    Right,
}

impl PageSide {
    pub fn from_page_number(page_number: u32) -> Self {
        if page_number % 2 == 0 {
            PageSide::Left
        } else {
            PageSide::Right
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PageSide::Left => "left",
            PageSide::Right => "right",
        }
    }
}

/// How a page entry occupies the page sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    #[default]
    Page,
    Spread,
}

/// Vertical anchor of a text region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Top,
    Bottom,
    #[serde(alias = "middle")]
    Center,
}

impl Origin {
    /// Anchor implied by a region's name when the config does not set one
    pub fn for_region_name(name: &str) -> Self {
        match name {
            "top" => Origin::Top,
            "middle" | "center" => Origin::Center,
            _ => Origin::Bottom,
        }
    }
}

/// Horizontal alignment of text lines inside a region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
    Justify,
}

/// An RGB colour with components in 0.0..=1.0
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub struct Colour {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Colour {
    pub fn new_rgb_bytes(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Parse `#rrggbb` or `#rgb` (the leading `#` is optional)
    pub fn parse_hex(value: &str) -> std::result::Result<Self, String> {
        let hex = value.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return Err(format!("'{value}' is not a #rrggbb or #rgb colour"));
        }
        let expanded: String = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 => hex.to_string(),
            _ => return Err(format!("'{value}' is not a #rrggbb or #rgb colour")),
        };
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&expanded[range], 16)
                .map_err(|_| format!("'{value}' is not a #rrggbb or #rgb colour"))
        };
        Ok(Self::new_rgb_bytes(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl TryFrom<String> for Colour {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        Colour::parse_hex(&value)
    }
}
