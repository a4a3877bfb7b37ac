//! Source-list configuration.
//!
//! Sources are declared in a TOML file (`[[sources]]` records) and loaded
//! once at run start. A malformed or unreadable list is the only fatal
//! error in the pipeline; everything downstream is isolated per source.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use regex::Regex;
use serde::Deserialize;
use url::Url;

use crate::app::{DriftError, Result};

pub const DEFAULT_MAX_ITEMS: usize = 10;

/// Extraction strategy bound to a source's content shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterKind {
    /// RSS or Atom feed.
    Feed,
    /// Releases Atom feed; item identity is the release tag.
    Release,
    HtmlArticles,
    HtmlChangelog,
    StructuredEndpoint,
}

impl AdapterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdapterKind::Feed => "feed",
            AdapterKind::Release => "release",
            AdapterKind::HtmlArticles => "html_articles",
            AdapterKind::HtmlChangelog => "html_changelog",
            AdapterKind::StructuredEndpoint => "structured_endpoint",
        }
    }
}

/// Extraction selectors. CSS selectors for the HTML adapters; for
/// `structured_endpoint`, `item` is a JSON pointer to the items array and
/// the remaining fields name keys within each element.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Selectors {
    pub container: Option<String>,
    pub item: Option<String>,
    pub entry: Option<String>,
    pub title: Option<String>,
    pub link: Option<String>,
    pub date: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceDefinition {
    /// Unique, stable across runs; the state-store key.
    pub id: String,
    pub org: String,
    pub name: String,
    pub adapter: AdapterKind,
    pub url: String,
    #[serde(default)]
    pub selectors: Option<Selectors>,
    #[serde(default = "default_max_items")]
    pub max_items: usize,
    /// Regex patterns whose matches are stripped before fingerprinting
    /// (relative-time phrases, tracking tokens).
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
    /// Extra request headers for this source.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

fn default_max_items() -> usize {
    DEFAULT_MAX_ITEMS
}

impl SourceDefinition {
    /// Compiled ignore patterns. Invalid patterns are rejected at config
    /// load, so compilation here cannot drop anything silently.
    pub fn compiled_ignore_patterns(&self) -> Vec<Regex> {
        self.ignore_patterns
            .iter()
            .filter_map(|p| Regex::new(p).ok())
            .collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourcesConfig {
    #[serde(default)]
    pub sources: Vec<SourceDefinition>,
}

impl SourcesConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            DriftError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: SourcesConfig = toml::from_str(content)
            .map_err(|e| DriftError::Config(format!("malformed source list: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for source in &self.sources {
            if !seen.insert(source.id.as_str()) {
                return Err(DriftError::Config(format!(
                    "duplicate source id: {}",
                    source.id
                )));
            }

            Url::parse(&source.url).map_err(|e| {
                DriftError::Config(format!("[{}] invalid url {}: {}", source.id, source.url, e))
            })?;

            for pattern in &source.ignore_patterns {
                Regex::new(pattern).map_err(|e| {
                    DriftError::Config(format!(
                        "[{}] invalid ignore pattern {:?}: {}",
                        source.id, pattern, e
                    ))
                })?;
            }

            let required: &[&str] = match source.adapter {
                AdapterKind::HtmlArticles => &["container", "item", "title"],
                AdapterKind::HtmlChangelog => &["container", "entry", "version"],
                AdapterKind::StructuredEndpoint => &["item", "title"],
                AdapterKind::Feed | AdapterKind::Release => &[],
            };
            for field in required {
                if selector_field(source.selectors.as_ref(), field).is_none() {
                    return Err(DriftError::Config(format!(
                        "[{}] adapter {} requires selectors.{}",
                        source.id,
                        source.adapter.as_str(),
                        field
                    )));
                }
            }
        }
        Ok(())
    }
}

fn selector_field<'a>(selectors: Option<&'a Selectors>, field: &str) -> Option<&'a str> {
    let selectors = selectors?;
    let value = match field {
        "container" => &selectors.container,
        "item" => &selectors.item,
        "entry" => &selectors.entry,
        "title" => &selectors.title,
        "version" => &selectors.version,
        _ => &None,
    };
    value.as_deref()
}
