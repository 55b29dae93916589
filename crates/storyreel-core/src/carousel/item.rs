use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::{CoreError, Result};

/// Opaque identifier of one carousel entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh random identifier for items that were declared without one.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Reference the embedding app resolves to displayable content
/// (an asset name, a route, a URL it already holds).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentRef(String);

impl ContentRef {
    pub fn new(content: impl Into<String>) -> Self {
        Self(content.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One carousel entry. Immutable once the carousel is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarouselItem {
    pub id: ItemId,
    pub content: ContentRef,
    #[serde(default)]
    pub title: Option<String>,
    /// Overrides the configured segment duration for this item.
    #[serde(default)]
    pub duration_ms: Option<u64>,
}

impl CarouselItem {
    pub fn new(id: impl Into<ItemId>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: ContentRef::new(content),
            title: None,
            duration_ms: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }
}

/// Entry of a deck file. `id` is optional; missing ids are generated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckItem {
    #[serde(default)]
    pub id: Option<String>,
    pub content: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub duration_ms: Option<u64>,
}

/// Serializable item list, loaded from TOML or JSON.
///
/// ```toml
/// [[items]]
/// id = "intro"
/// content = "stories/intro.png"
/// duration_ms = 3000
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Deck {
    #[serde(default)]
    pub items: Vec<DeckItem>,
}

impl Deck {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a deck, picking the format from the file extension
    /// (`.json` is JSON, anything else TOML).
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(CoreError::Io)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_toml_str(&content),
        }
    }

    pub fn into_items(self) -> Vec<CarouselItem> {
        self.items
            .into_iter()
            .map(|item| CarouselItem {
                id: item.id.map(ItemId::new).unwrap_or_else(ItemId::generate),
                content: ContentRef::new(item.content),
                title: item.title,
                duration_ms: item.duration_ms,
            })
            .collect()
    }
}
