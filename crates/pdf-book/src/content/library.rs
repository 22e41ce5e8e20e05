use crate::options::{DocumentFormat, PageEntryConfig, RawText};
use crate::types::*;
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use std::path::Path;

/// Region name to raw text source
pub type RegionTexts = BTreeMap<String, Option<RawText>>;

/// Reusable text snippets keyed by slug, plus an optional page list that
/// replaces the config's own `pages`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextLibrary {
    texts: BTreeMap<String, RegionTexts>,
    pages: Vec<PageEntryConfig>,
}

impl TextLibrary {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load a library file (JSON for `.json`, YAML otherwise)
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = match tokio::fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(BookError::AssetNotFound {
                    owner: "book".to_string(),
                    kind: AssetKind::TextLibrary,
                    path: path.to_owned(),
                });
            }
            Err(e) => return Err(e.into()),
        };
        let library = Self::from_str(&contents, DocumentFormat::from_path(path))?;
        log::debug!(
            "Loaded text library {} ({} entries, {} pages)",
            path.display(),
            library.texts.len(),
            library.pages.len()
        );
        Ok(library)
    }

    /// Parse a library document.
    ///
    /// Accepted shapes:
    /// - a list of page entries
    /// - a mapping with `pages` and either `texts` or sibling slug keys
    /// - a plain mapping of slug to region texts
    pub fn from_str(contents: &str, format: DocumentFormat) -> Result<Self> {
        let value: Value = format.parse(contents)?;
        Self::from_value(value)
    }

    fn from_value(value: Value) -> Result<Self> {
        let (pages, texts) = match value {
            Value::Null => (Vec::new(), Mapping::new()),
            Value::Sequence(items) => (parse_pages(items)?, Mapping::new()),
            Value::Mapping(mut map) => match map.remove("pages") {
                Some(raw_pages) => {
                    let pages = match raw_pages {
                        Value::Null => Vec::new(),
                        Value::Sequence(items) => parse_pages(items)?,
                        _ => {
                            return Err(BookError::Config(
                                "'pages' inside the text library must be a list".to_string(),
                            ));
                        }
                    };
                    let texts = match map.remove("texts") {
                        Some(Value::Mapping(texts)) => texts,
                        _ => map,
                    };
                    (pages, texts)
                }
                None => (Vec::new(), map),
            },
            _ => {
                return Err(BookError::Config(
                    "text library must be a mapping, a list, or contain a 'pages' list".to_string(),
                ));
            }
        };

        let mut library = TextLibrary {
            texts: parse_texts(texts)?,
            pages,
        };

        // Page entries contribute their own text for slugs the library lacks
        for page in &library.pages {
            if let Some(slug) = page.slug.as_ref().filter(|slug| !slug.is_empty()) {
                if !page.text.is_empty() && !library.texts.contains_key(slug) {
                    library.texts.insert(slug.clone(), page.text.clone());
                }
            }
        }

        Ok(library)
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty() && self.pages.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.texts.contains_key(key)
    }

    /// Texts stored under `key`
    pub fn entry(&self, key: &str) -> Option<&RegionTexts> {
        self.texts.get(key)
    }

    /// The raw source of one region in entry `key`; `None` if either is absent
    pub fn region(&self, key: &str, region: &str) -> Option<&RawText> {
        self.texts.get(key)?.get(region)?.as_ref()
    }

    /// Page entries carried by the library (empty when it only holds texts)
    pub fn pages(&self) -> &[PageEntryConfig] {
        &self.pages
    }
}

fn parse_pages(items: Vec<Value>) -> Result<Vec<PageEntryConfig>> {
    items
        .into_iter()
        .filter(Value::is_mapping)
        .map(|item| serde_yaml::from_value(item).map_err(BookError::from))
        .collect()
}

fn parse_texts(texts: Mapping) -> Result<BTreeMap<String, RegionTexts>> {
    let mut parsed = BTreeMap::new();
    for (key, value) in texts {
        let Some(key) = key_string(&key) else {
            return Err(BookError::Config(
                "text library keys must be strings or numbers".to_string(),
            ));
        };
        let regions = match value {
            Value::Null => RegionTexts::new(),
            Value::Mapping(_) => serde_yaml::from_value(value)?,
            _ => {
                return Err(BookError::Config(format!(
                    "text library entry '{key}' must map region names to text"
                )));
            }
        };
        parsed.insert(key, regions);
    }
    Ok(parsed)
}

fn key_string(key: &Value) -> Option<String> {
    match key {
        Value::String(key) => Some(key.clone()),
        Value::Number(key) => Some(key.to_string()),
        Value::Bool(key) => Some(key.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Scalar;

    fn text(raw: Option<&RawText>) -> Option<String> {
        match raw {
            Some(RawText::Scalar(Scalar::Text(text))) => Some(text.clone()),
            _ => None,
        }
    }

    #[test]
    fn test_plain_mapping() {
        let library = TextLibrary::from_str(
            "cover:\n  top: The Cat\n  bottom: ~\nsunrise:\n  bottom: [L, R]\n",
            DocumentFormat::Yaml,
        )
        .unwrap();
        assert!(library.pages().is_empty());
        assert_eq!(text(library.region("cover", "top")), Some("The Cat".to_string()));
        assert_eq!(library.region("cover", "bottom"), None);
        assert!(matches!(library.region("sunrise", "bottom"), Some(RawText::List(_))));
        assert_eq!(library.region("missing", "top"), None);
    }

    #[test]
    fn test_pages_with_sibling_texts() {
        let yaml = r#"
pages:
  - slug: one
    image: one.png
    text: { bottom: From page }
  - slug: two
    image: two.png
    text: { bottom: Page two }
  - not-a-page
two:
  bottom: From library
"#;
        let library = TextLibrary::from_str(yaml, DocumentFormat::Yaml).unwrap();
        assert_eq!(library.pages().len(), 2);
        assert_eq!(text(library.region("one", "bottom")), Some("From page".to_string()));
        assert_eq!(text(library.region("two", "bottom")), Some("From library".to_string()));
    }

    #[test]
    fn test_pages_with_texts_key() {
        let json = r#"{
            "pages": [ { "slug": "a", "image": "a.png" } ],
            "texts": { "a": { "top": "Hello" } },
            "ignored": { "top": "Nope" }
        }"#;
        let library = TextLibrary::from_str(json, DocumentFormat::Json).unwrap();
        assert_eq!(library.pages().len(), 1);
        assert_eq!(text(library.region("a", "top")), Some("Hello".to_string()));
        assert!(!library.contains_key("ignored"));
    }

    #[test]
    fn test_top_level_list() {
        let library = TextLibrary::from_str(
            "- { slug: a, image: a.png, text: { top: Hi } }\n- { slug: b, image: b.png }\n",
            DocumentFormat::Yaml,
        )
        .unwrap();
        assert_eq!(library.pages().len(), 2);
        assert_eq!(text(library.region("a", "top")), Some("Hi".to_string()));
        assert!(!library.contains_key("b"));
    }

    #[test]
    fn test_rejects_bad_shapes() {
        assert!(TextLibrary::from_str("just a string", DocumentFormat::Yaml).is_err());
        assert!(TextLibrary::from_str("pages: 3", DocumentFormat::Yaml).is_err());
        assert!(TextLibrary::from_str("cover: hello", DocumentFormat::Yaml).is_err());
        assert!(TextLibrary::from_str("", DocumentFormat::Yaml).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = TextLibrary::load("/definitely/not/here.yaml").await.unwrap_err();
        assert!(matches!(
            err,
            BookError::AssetNotFound {
                kind: AssetKind::TextLibrary,
                ..
            }
        ));
    }
}
