use crate::constants::*;
use crate::geometry::BookGeometry;
use crate::types::*;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Structured document formats accepted for configs and text libraries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

impl DocumentFormat {
    /// `.json` files are read as JSON, everything else as YAML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => DocumentFormat::Json,
            _ => DocumentFormat::Yaml,
        }
    }

    pub fn parse<T: DeserializeOwned>(self, contents: &str) -> Result<T> {
        match self {
            DocumentFormat::Yaml => Ok(serde_yaml::from_str(contents)?),
            DocumentFormat::Json => Ok(serde_json::from_str(contents)?),
        }
    }
}

/// Top-level book description: the `book` section plus the ordered `pages` list
#[derive(Debug, Clone, Deserialize)]
pub struct BookConfig {
    pub book: BookOptions,
    #[serde(default)]
    pub pages: Vec<PageEntryConfig>,
    /// Directory that relative paths in the config are resolved against
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl BookConfig {
    /// Load a config file. Relative paths inside it resolve against its directory.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = match tokio::fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(BookError::AssetNotFound {
                    owner: "book".to_string(),
                    kind: AssetKind::Config,
                    path: path.to_owned(),
                });
            }
            Err(e) => return Err(e.into()),
        };
        let base_dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_owned(),
            _ => PathBuf::from("."),
        };
        Self::from_str(&contents, DocumentFormat::from_path(path), base_dir)
    }

    pub fn from_str(contents: &str, format: DocumentFormat, base_dir: PathBuf) -> Result<Self> {
        let mut config: BookConfig = format.parse(contents)?;
        config.base_dir = base_dir;
        Ok(config)
    }

    /// Resolve a config-relative path
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_owned()
        } else {
            self.base_dir.join(path)
        }
    }

    pub fn geometry(&self) -> Result<BookGeometry> {
        let trim = &self.book.trim_size_in;
        BookGeometry::from_inches(trim.width, trim.height, self.book.bleed_in)
    }

    pub fn image_folder(&self) -> Result<PathBuf> {
        self.book
            .image_folder
            .as_deref()
            .map(|folder| self.resolve_path(folder))
            .ok_or_else(|| BookError::Config("'book.image_folder' is required".to_string()))
    }

    pub fn output_pdf(&self) -> PathBuf {
        self.resolve_path(&self.book.output_pdf)
    }

    pub fn text_library_path(&self) -> Option<PathBuf> {
        self.book
            .text_library
            .as_deref()
            .map(|path| self.resolve_path(path))
    }

    pub fn font_path(&self) -> Option<PathBuf> {
        self.book
            .font
            .path
            .as_deref()
            .map(|path| self.resolve_path(path))
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        self.geometry()?;
        self.image_folder()?;

        let defaults = &self.book.defaults;
        if !(defaults.image_scale > 0.0) {
            return Err(BookError::Config(format!(
                "'book.defaults.image_scale' must be positive, got {}",
                defaults.image_scale
            )));
        }

        for (name, region) in &self.book.text_layout {
            region.validate(name)?;
        }

        if let Some(output) = &self.book.image_output {
            if output.dpi == 0 {
                return Err(BookError::Config(
                    "'book.image_output.dpi' must be positive".to_string(),
                ));
            }
        }

        for (index, entry) in self.pages.iter().enumerate() {
            entry.validate(&entry.slug_or_default(index))?;
        }

        Ok(())
    }
}

/// The `book` section
#[derive(Debug, Clone, Deserialize)]
pub struct BookOptions {
    /// Document title written to the PDF metadata (defaults to the PDF file stem)
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub trim_size_in: TrimSize,
    #[serde(default)]
    pub bleed_in: f32,
    #[serde(default = "default_output_pdf")]
    pub output_pdf: PathBuf,
    #[serde(default)]
    pub image_folder: Option<PathBuf>,
    #[serde(default)]
    pub font: FontOptions,
    #[serde(default)]
    pub text_library: Option<PathBuf>,
    #[serde(default)]
    pub text_layout: BTreeMap<String, RegionOptions>,
    #[serde(default)]
    pub image_output: Option<ImageOutputOptions>,
    #[serde(default)]
    pub defaults: DefaultOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct TrimSize {
    #[serde(default = "default_trim_width")]
    pub width: f32,
    #[serde(default = "default_trim_height")]
    pub height: f32,
}

impl Default for TrimSize {
    fn default() -> Self {
        Self {
            width: DEFAULT_TRIM_WIDTH_IN,
            height: DEFAULT_TRIM_HEIGHT_IN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FontOptions {
    #[serde(default = "default_font_name")]
    pub name: String,
    /// TrueType/OpenType file to embed; the built-in Helvetica is used when absent
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Default for FontOptions {
    fn default() -> Self {
        Self {
            name: DEFAULT_FONT_NAME.to_string(),
            path: None,
        }
    }
}

/// Typography and placement of one named text region
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RegionOptions {
    #[serde(default = "default_font_size")]
    pub font_size_pt: f32,
    #[serde(default)]
    pub leading_pt: Option<f32>,
    #[serde(default = "default_box_height")]
    pub box_height_in: f32,
    #[serde(default)]
    pub inset_in: InsetOptions,
    #[serde(default)]
    pub origin: Option<Origin>,
    #[serde(default = "default_colour")]
    pub color: Colour,
    #[serde(default)]
    pub align: TextAlign,
    /// Directory holding file-based snippets for this region
    #[serde(default)]
    pub folder: Option<PathBuf>,
}

impl Default for RegionOptions {
    fn default() -> Self {
        Self {
            font_size_pt: DEFAULT_FONT_SIZE_PT,
            leading_pt: None,
            box_height_in: DEFAULT_BOX_HEIGHT_IN,
            inset_in: InsetOptions::default(),
            origin: None,
            color: default_colour(),
            align: TextAlign::default(),
            folder: None,
        }
    }
}

impl RegionOptions {
    fn validate(&self, name: &str) -> Result<()> {
        if !(self.font_size_pt > 0.0) {
            return Err(BookError::Config(format!(
                "region '{name}': font_size_pt must be positive"
            )));
        }
        if !(self.box_height_in > 0.0) {
            return Err(BookError::Config(format!(
                "region '{name}': box_height_in must be positive"
            )));
        }
        if let Some(leading) = self.leading_pt {
            if !(leading > 0.0) {
                return Err(BookError::Config(format!(
                    "region '{name}': leading_pt must be positive"
                )));
            }
        }
        Ok(())
    }
}

/// Region insets: a single value for every edge, or individual edges.
///
/// `inner`/`outer` override `left`/`right` depending on which side of the
/// spine the page falls on.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum InsetOptions {
    Uniform(f32),
    Sides(InsetSides),
}

impl Default for InsetOptions {
    fn default() -> Self {
        InsetOptions::Sides(InsetSides::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct InsetSides {
    #[serde(default)]
    pub left: Option<f32>,
    #[serde(default)]
    pub right: Option<f32>,
    #[serde(default)]
    pub top: Option<f32>,
    #[serde(default)]
    pub bottom: Option<f32>,
    #[serde(default)]
    pub inner: Option<f32>,
    #[serde(default)]
    pub outer: Option<f32>,
    /// Signed vertical nudge for centred regions, positive moves down
    #[serde(default)]
    pub center: Option<f32>,
}

/// Per-page image export settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImageOutputOptions {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Target directory; defaults to `<pdf stem>-pages` next to the PDF
    #[serde(default)]
    pub folder: Option<PathBuf>,
    #[serde(default)]
    pub format: RasterFormat,
    #[serde(default = "default_dpi")]
    pub dpi: u32,
    /// Folder holding the pdfium shared library
    #[serde(default)]
    pub pdfium_library: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RasterFormat {
    #[default]
    Png,
    #[serde(alias = "jpg")]
    Jpeg,
}

impl RasterFormat {
    pub fn extension(self) -> &'static str {
        match self {
            RasterFormat::Png => "png",
            RasterFormat::Jpeg => "jpg",
        }
    }

    pub fn image_format(self) -> image::ImageFormat {
        match self {
            RasterFormat::Png => image::ImageFormat::Png,
            RasterFormat::Jpeg => image::ImageFormat::Jpeg,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct DefaultOptions {
    #[serde(default = "default_image_scale")]
    pub image_scale: f32,
    #[serde(default)]
    pub image_offset_in: OffsetOptions,
}

impl Default for DefaultOptions {
    fn default() -> Self {
        Self {
            image_scale: 1.0,
            image_offset_in: OffsetOptions::default(),
        }
    }
}

/// Image translation in inches; x grows right, y grows up
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct OffsetOptions {
    #[serde(default)]
    pub x: Option<f32>,
    #[serde(default)]
    pub y: Option<f32>,
}

/// One entry of the `pages` list
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct PageEntryConfig {
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub kind: PageKind,
    /// Number of physical pages the entry occupies (overrides `kind`)
    #[serde(default)]
    pub span: Option<i64>,
    #[serde(default)]
    pub image: Option<PathBuf>,
    #[serde(default)]
    pub image_scale: Option<f32>,
    #[serde(default)]
    pub image_offset_in: Option<OffsetOptions>,
    /// Region name to text source; `null` means "fall back to the text library"
    #[serde(default)]
    pub text: BTreeMap<String, Option<RawText>>,
}

impl PageEntryConfig {
    /// The entry's slug, or `page-<n>` for the n-th (1-based) entry
    pub fn slug_or_default(&self, entry_index: usize) -> String {
        match &self.slug {
            Some(slug) if !slug.trim().is_empty() => slug.clone(),
            _ => format!("page-{}", entry_index + 1),
        }
    }

    pub fn validate(&self, slug: &str) -> Result<()> {
        if let Some(scale) = self.image_scale {
            if !(scale > 0.0) {
                return Err(BookError::Config(format!(
                    "page '{slug}': image_scale must be positive, got {scale}"
                )));
            }
        }
        Ok(())
    }
}

/// A text source exactly as written in a config or text library
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawText {
    Scalar(Scalar),
    /// One source per page; `null` leaves that page blank
    List(Vec<Option<RawText>>),
    Map(RawTextMap),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    pub fn into_text(self) -> String {
        match self {
            Scalar::Text(text) => text,
            Scalar::Integer(value) => value.to_string(),
            Scalar::Float(value) => value.to_string(),
            Scalar::Bool(value) => value.to_string(),
        }
    }
}

/// Keyed text source.
///
/// Only a mapping is accepted here. A derived struct would also take a
/// sequence and fill its fields by position, which would let lists the
/// `List` variant rejects turn into file references.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(try_from = "serde_yaml::Mapping")]
pub struct RawTextMap {
    pub inline: Option<Scalar>,
    pub file: Option<String>,
    pub library: Option<LibraryKey>,
    pub left: Option<Box<RawText>>,
    pub right: Option<Box<RawText>>,
}

#[derive(Deserialize)]
struct RawTextFields {
    #[serde(default)]
    inline: Option<Scalar>,
    #[serde(default)]
    file: Option<String>,
    #[serde(default)]
    library: Option<LibraryKey>,
    #[serde(default)]
    left: Option<Box<RawText>>,
    #[serde(default)]
    right: Option<Box<RawText>>,
}

impl TryFrom<serde_yaml::Mapping> for RawTextMap {
    type Error = serde_yaml::Error;

    fn try_from(mapping: serde_yaml::Mapping) -> std::result::Result<Self, Self::Error> {
        let fields: RawTextFields = serde_yaml::from_value(serde_yaml::Value::Mapping(mapping))?;
        Ok(Self {
            inline: fields.inline,
            file: fields.file,
            library: fields.library,
            left: fields.left,
            right: fields.right,
        })
    }
}

/// `library: <key>`, or `library: true` to use the page's own slug
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LibraryKey {
    Key(String),
    Flag(bool),
}

fn default_output_pdf() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_PDF)
}

fn default_trim_width() -> f32 {
    DEFAULT_TRIM_WIDTH_IN
}

fn default_trim_height() -> f32 {
    DEFAULT_TRIM_HEIGHT_IN
}

fn default_font_name() -> String {
    DEFAULT_FONT_NAME.to_string()
}

fn default_font_size() -> f32 {
    DEFAULT_FONT_SIZE_PT
}

fn default_box_height() -> f32 {
    DEFAULT_BOX_HEIGHT_IN
}

fn default_colour() -> Colour {
    Colour::parse_hex(DEFAULT_TEXT_COLOUR).unwrap_or(Colour {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    })
}

fn default_true() -> bool {
    true
}

fn default_dpi() -> u32 {
    DEFAULT_RASTER_DPI
}

fn default_image_scale() -> f32 {
    1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"
book:
  trim_size_in: { width: 8, height: 8 }
  bleed_in: 0.125
  image_folder: art
  output_pdf: out/book.pdf
  text_layout:
    top:
      font_size_pt: 20
      inset_in: { top: 0.75, inner: 0.9, outer: 0.5 }
    bottom:
      inset_in: 0.6
      color: "#336699"
      align: justify
  image_output:
    format: jpg
    dpi: 150
pages:
  - slug: cover
    image: cover.png
    text:
      top: "The Cat"
  - slug: sunrise
    kind: spread
    image: sunrise.jpg
    image_offset_in: { x: 0.25 }
    text:
      bottom: ["Left text", "Right text"]
      top: ~
"##;

    #[test]
    fn test_parse_yaml_config() {
        let config =
            BookConfig::from_str(SAMPLE, DocumentFormat::Yaml, PathBuf::from("/books/cat"))
                .unwrap();
        config.validate().unwrap();

        assert_eq!(config.book.trim_size_in.width, 8.0);
        assert_eq!(config.book.bleed_in, 0.125);
        assert_eq!(config.image_folder().unwrap(), PathBuf::from("/books/cat/art"));
        assert_eq!(config.output_pdf(), PathBuf::from("/books/cat/out/book.pdf"));
        assert_eq!(config.book.font.name, DEFAULT_FONT_NAME);

        let top = &config.book.text_layout["top"];
        assert_eq!(top.font_size_pt, 20.0);
        assert_eq!(top.box_height_in, DEFAULT_BOX_HEIGHT_IN);
        match top.inset_in {
            InsetOptions::Sides(sides) => {
                assert_eq!(sides.inner, Some(0.9));
                assert_eq!(sides.left, None);
            }
            other => panic!("expected per-side insets, got {other:?}"),
        }

        let bottom = &config.book.text_layout["bottom"];
        assert_eq!(bottom.inset_in, InsetOptions::Uniform(0.6));
        assert_eq!(bottom.align, TextAlign::Justify);
        assert_eq!(bottom.color, Colour::new_rgb_bytes(0x33, 0x66, 0x99));

        let output = config.book.image_output.as_ref().unwrap();
        assert!(output.enabled);
        assert_eq!(output.format, RasterFormat::Jpeg);
        assert_eq!(output.dpi, 150);

        assert_eq!(config.pages.len(), 2);
        let spread = &config.pages[1];
        assert_eq!(spread.kind, PageKind::Spread);
        assert_eq!(spread.image_offset_in.unwrap().x, Some(0.25));
        assert_eq!(spread.text["top"], None);
        assert!(matches!(spread.text["bottom"], Some(RawText::List(_))));
    }

    #[test]
    fn test_text_list_with_null_stays_a_list() {
        let raw: RawText = serde_yaml::from_str("[~, Right]").unwrap();
        assert_eq!(
            raw,
            RawText::List(vec![None, Some(RawText::Scalar(Scalar::Text("Right".to_string())))])
        );

        let map: RawText = serde_yaml::from_str("{ file: a.txt }").unwrap();
        assert!(matches!(map, RawText::Map(RawTextMap { file: Some(_), .. })));
        assert!(serde_yaml::from_str::<RawTextMap>("[~, a.txt]").is_err());
    }

    #[test]
    fn test_parse_json_config() {
        let json = r#"{
            "book": { "image_folder": "img" },
            "pages": [ { "image": "a.png", "text": { "bottom": { "inline": "Hi" } } } ]
        }"#;
        let config =
            BookConfig::from_str(json, DocumentFormat::Json, PathBuf::from(".")).unwrap();
        config.validate().unwrap();
        assert_eq!(config.book.trim_size_in, TrimSize::default());
        assert_eq!(config.pages[0].slug_or_default(0), "page-1");
        match &config.pages[0].text["bottom"] {
            Some(RawText::Map(map)) => {
                assert_eq!(map.inline, Some(Scalar::Text("Hi".to_string())));
            }
            other => panic!("expected mapping, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let missing_folder = "book: { bleed_in: 0.1 }";
        let config =
            BookConfig::from_str(missing_folder, DocumentFormat::Yaml, PathBuf::from("."))
                .unwrap();
        assert!(matches!(config.validate(), Err(BookError::Config(_))));

        let bad_region = "book: { image_folder: a, text_layout: { top: { font_size_pt: 0 } } }";
        let config =
            BookConfig::from_str(bad_region, DocumentFormat::Yaml, PathBuf::from(".")).unwrap();
        assert!(matches!(config.validate(), Err(BookError::Config(_))));

        let bad_scale = "book: { image_folder: a }\npages: [ { slug: x, image_scale: -1 } ]";
        let config =
            BookConfig::from_str(bad_scale, DocumentFormat::Yaml, PathBuf::from(".")).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("'x'"));
    }

    #[test]
    fn test_bad_colour_is_a_parse_error() {
        let yaml = "book: { image_folder: a, text_layout: { top: { color: 'blue-ish' } } }";
        assert!(BookConfig::from_str(yaml, DocumentFormat::Yaml, PathBuf::from(".")).is_err());
    }

    #[test]
    fn test_document_format_from_path() {
        assert_eq!(DocumentFormat::from_path(Path::new("a/b.JSON")), DocumentFormat::Json);
        assert_eq!(DocumentFormat::from_path(Path::new("a/b.yml")), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path(Path::new("a/b")), DocumentFormat::Yaml);
    }
}
