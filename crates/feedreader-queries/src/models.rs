//! Core data models for user queries

use serde::{de, Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::BitOr;
use std::str::FromStr;

use crate::error::ParseError;

/// Entry-state bitmask carried by the `state` parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct ReadState(u32);

impl ReadState {
    pub const READ: ReadState = ReadState(1);
    pub const NOT_READ: ReadState = ReadState(2);
    pub const ALL: ReadState = ReadState(3);
    pub const FAVORITE: ReadState = ReadState(4);
    pub const NOT_FAVORITE: ReadState = ReadState(8);

    /// Wrap raw bits. Unknown bits are kept as-is.
    pub const fn from_bits(bits: u32) -> Self {
        ReadState(bits)
    }

    pub const fn bits(&self) -> u32 {
        self.0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// True if every flag of `other` is set in `self`
    pub const fn contains(&self, other: ReadState) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for ReadState {
    type Output = ReadState;

    fn bitor(self, rhs: Self) -> Self::Output {
        ReadState(self.0 | rhs.0)
    }
}

impl fmt::Display for ReadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ReadState {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .map(ReadState)
            .map_err(|_| ParseError::InvalidState(s.to_string()))
    }
}

// Stored queries may carry the bitmask as a number or as a numeric string.
impl<'de> Deserialize<'de> for ReadState {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Bits(u32),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Bits(bits) => Ok(ReadState(bits)),
            Repr::Text(text) => text.parse().map_err(de::Error::custom),
        }
    }
}

/// Sort direction understood in the `order` parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Parse `ASC` / `DESC` (any case). Anything else is not a sort order.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "ASC" => Some(SortOrder::Asc),
            "DESC" => Some(SortOrder::Desc),
            _ => None,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "ASC"),
            SortOrder::Desc => write!(f, "DESC"),
        }
    }
}

/// The raw description of a query, as supplied by the caller.
///
/// Only the six recognised keys exist. A key that was not supplied stays
/// `None` and is skipped on serialization, so a stored query round-trips
/// to exactly the keys it was created with. Deserialization goes through
/// [`RawParameters::from_map`], so every reader applies the same rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RawParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<ReadState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl<'de> Deserialize<'de> for RawParameters {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = serde_json::Map::<String, serde_json::Value>::deserialize(deserializer)?;
        RawParameters::from_map(&map).map_err(de::Error::custom)
    }
}

impl RawParameters {
    /// Recognised keys, in canonical order
    pub const KEYS: [&'static str; 6] = ["get", "name", "order", "search", "state", "url"];

    /// Keys that make up the view URL of a query
    const VIEW_KEYS: [&'static str; 4] = ["get", "order", "search", "state"];

    /// Create an empty parameter set
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_get(mut self, get: impl Into<String>) -> Self {
        self.get = Some(get.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_state(mut self, state: ReadState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Value of a recognised string key, `None` for `state` and unknown keys
    fn text(&self, key: &str) -> Option<&str> {
        match key {
            "get" => self.get.as_deref(),
            "name" => self.name.as_deref(),
            "order" => self.order.as_deref(),
            "search" => self.search.as_deref(),
            "url" => self.url.as_deref(),
            _ => None,
        }
    }

    fn is_present(&self, key: &str) -> bool {
        match key {
            "state" => self.state.is_some(),
            other => self.text(other).is_some(),
        }
    }

    /// Keys present in this parameter set, in canonical order
    pub fn keys(&self) -> Vec<&'static str> {
        Self::KEYS
            .iter()
            .copied()
            .filter(|key| self.is_present(key))
            .collect()
    }

    /// Number of keys present
    pub fn len(&self) -> usize {
        self.keys().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True for the unparameterised default view: nothing supplied, or only
    /// `get=a`.
    pub fn is_default_view(&self) -> bool {
        match self.keys().as_slice() {
            [] => true,
            ["get"] => self.get.as_deref() == Some("a"),
            _ => false,
        }
    }

    /// Build from a JSON object. Unknown keys and `null` values are dropped;
    /// numbers and booleans given for text keys are kept as their text.
    pub fn from_map(map: &serde_json::Map<String, serde_json::Value>) -> Result<Self, ParseError> {
        let mut raw = RawParameters::new();

        for key in Self::KEYS {
            let Some(value) = map.get(key) else {
                continue;
            };
            if value.is_null() {
                continue;
            }

            if key == "state" {
                let state = match value {
                    serde_json::Value::Number(n) => n
                        .as_u64()
                        .and_then(|bits| u32::try_from(bits).ok())
                        .map(ReadState::from_bits)
                        .ok_or_else(|| ParseError::InvalidState(n.to_string()))?,
                    serde_json::Value::String(s) => s.parse()?,
                    other => return Err(ParseError::InvalidState(other.to_string())),
                };
                raw.state = Some(state);
                continue;
            }

            let text = match value {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                other => {
                    return Err(ParseError::InvalidValue {
                        key: key.to_string(),
                        message: format!("expected text, got {}", other),
                    })
                }
            };

            match key {
                "get" => raw.get = Some(text),
                "name" => raw.name = Some(text),
                "order" => raw.order = Some(text),
                "search" => raw.search = Some(text),
                _ => raw.url = Some(text),
            }
        }

        Ok(raw)
    }

    /// Project to a JSON object holding exactly the present keys
    pub fn to_map(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut map = serde_json::Map::new();
        for key in Self::KEYS {
            if key == "state" {
                if let Some(state) = self.state {
                    map.insert(key.to_string(), serde_json::Value::from(state.bits()));
                }
            } else if let Some(text) = self.text(key) {
                map.insert(key.to_string(), serde_json::Value::from(text));
            }
        }
        map
    }

    /// Parse a JSON document holding one parameter object
    pub fn from_json_str(content: &str) -> Result<Self, ParseError> {
        let value: serde_json::Value =
            serde_json::from_str(content).map_err(|e| ParseError::InvalidJson(e.to_string()))?;

        match value {
            serde_json::Value::Object(map) => Self::from_map(&map),
            other => Err(ParseError::NotAnObject(other.to_string())),
        }
    }

    /// Parse a URL query string (`get=c_1&search=foo`), with or without the
    /// leading `?`. Unknown keys are dropped; a repeated key keeps its last
    /// value.
    pub fn from_query_string(query: &str) -> Result<Self, ParseError> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut raw = RawParameters::new();

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            let value = value.into_owned();
            match key.as_ref() {
                "get" => raw.get = Some(value),
                "name" => raw.name = Some(value),
                "order" => raw.order = Some(value),
                "search" => raw.search = Some(value),
                "state" => raw.state = Some(value.parse()?),
                "url" => raw.url = Some(value),
                _ => {}
            }
        }

        Ok(raw)
    }

    /// URL query string reproducing the view of this query: the present
    /// `get`, `order`, `search` and `state` keys, form-encoded.
    pub fn view_query_string(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for key in Self::VIEW_KEYS {
            if key == "state" {
                if let Some(state) = self.state {
                    serializer.append_pair(key, &state.to_string());
                }
            } else if let Some(text) = self.text(key) {
                serializer.append_pair(key, text);
            }
        }
        serializer.finish()
    }
}

/// A feed as seen in a catalog snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feed {
    pub id: i64,
    pub name: String,
}

impl Feed {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Feed {
            id,
            name: name.into(),
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A category and its feeds, as seen in a catalog snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    /// Feeds keyed by feed id
    #[serde(default)]
    pub feeds: BTreeMap<i64, Feed>,
}

impl Category {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Category {
            id,
            name: name.into(),
            feeds: BTreeMap::new(),
        }
    }

    /// Builder: add a feed to this category
    pub fn with_feed(mut self, feed: Feed) -> Self {
        self.add_feed(feed);
        self
    }

    pub fn add_feed(&mut self, feed: Feed) {
        self.feeds.insert(feed.id, feed);
    }

    pub fn remove_feed(&mut self, feed_id: i64) -> Option<Feed> {
        self.feeds.remove(&feed_id)
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn feeds(&self) -> &BTreeMap<i64, Feed> {
        &self.feeds
    }

    /// Find a feed by its own id. Map keys loaded from a file are not
    /// trusted to match the record.
    pub fn find_feed(&self, feed_id: i64) -> Option<&Feed> {
        self.feeds
            .get(&feed_id)
            .filter(|feed| feed.id == feed_id)
            .or_else(|| self.feeds.values().find(|feed| feed.id == feed_id))
    }
}

/// Read-only view of the categories and feeds a query is resolved against
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub categories: Vec<Category>,
    /// Feeds outside the category tree, e.g. pinned feeds
    #[serde(default)]
    pub secondary_feeds: Vec<Feed>,
}

impl CatalogSnapshot {
    pub fn new(categories: Vec<Category>) -> Self {
        CatalogSnapshot {
            categories,
            secondary_feeds: Vec::new(),
        }
    }

    pub fn with_secondary_feeds(mut self, feeds: Vec<Feed>) -> Self {
        self.secondary_feeds = feeds;
        self
    }

    pub fn find_category(&self, category_id: i64) -> Option<&Category> {
        find_category(&self.categories, category_id)
    }

    pub fn find_feed(&self, feed_id: i64) -> Option<&Feed> {
        find_feed(&self.categories, &self.secondary_feeds, feed_id)
    }

    /// Total number of feeds across categories and the secondary snapshot
    pub fn feed_count(&self) -> usize {
        self.categories
            .iter()
            .map(|category| category.feeds.len())
            .sum::<usize>()
            + self.secondary_feeds.len()
    }
}

pub(crate) fn find_category(categories: &[Category], category_id: i64) -> Option<&Category> {
    categories.iter().find(|category| category.id() == category_id)
}

pub(crate) fn find_feed<'a>(
    categories: &'a [Category],
    secondary_feeds: &'a [Feed],
    feed_id: i64,
) -> Option<&'a Feed> {
    categories
        .iter()
        .find_map(|category| category.find_feed(feed_id))
        .or_else(|| secondary_feeds.iter().find(|feed| feed.id() == feed_id))
}
