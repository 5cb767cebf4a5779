//! Resolved user queries
//!
//! A [`UserQuery`] is built once from raw parameters and a catalog
//! snapshot. The target is classified, its name looked up and its staleness
//! decided at construction; nothing is re-evaluated afterwards and no
//! reference to the snapshot is kept.

use tracing::debug;

use crate::models::{self, CatalogSnapshot, Category, Feed, RawParameters, ReadState, SortOrder};
use crate::parser::QueryTarget;

/// An immutable, classified query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserQuery {
    raw: RawParameters,
    target: QueryTarget,
    target_name: String,
    deprecated: bool,
}

impl UserQuery {
    /// Resolve `raw` against a category snapshot and an optional secondary
    /// feed snapshot (pass an empty slice when there is none).
    pub fn new(raw: RawParameters, categories: &[Category], secondary_feeds: &[Feed]) -> Self {
        let target = QueryTarget::parse(raw.get.as_deref());

        let resolved_name = match target {
            QueryTarget::Category(id) => {
                models::find_category(categories, id).map(|category| category.name())
            }
            QueryTarget::Feed(id) => {
                models::find_feed(categories, secondary_feeds, id).map(|feed| feed.name())
            }
            QueryTarget::All | QueryTarget::Favorite | QueryTarget::Unknown => None,
        };

        // Only entity targets can go stale, and only when the lookup missed.
        let deprecated = target.references_entity() && resolved_name.is_none();
        let target_name = resolved_name.unwrap_or_default().to_string();

        debug!(
            target = %target,
            target_id = ?target.id(),
            target_name = %target_name,
            deprecated,
            "Resolved user query"
        );

        UserQuery {
            raw,
            target,
            target_name,
            deprecated,
        }
    }

    /// Resolve `raw` against a full catalog snapshot
    pub fn from_snapshot(raw: RawParameters, snapshot: &CatalogSnapshot) -> Self {
        Self::new(raw, &snapshot.categories, &snapshot.secondary_feeds)
    }

    /// Classified target
    pub fn target(&self) -> QueryTarget {
        self.target
    }

    /// Target label: `all`, `favorite`, `category`, `feed`, or empty
    pub fn get_type(&self) -> &'static str {
        self.target.label()
    }

    /// Name of the target category or feed, empty when not applicable or
    /// not found
    pub fn get_name(&self) -> &str {
        &self.target_name
    }

    /// Raw `get` value
    pub fn get(&self) -> Option<&str> {
        self.raw.get.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.raw.name.as_deref()
    }

    pub fn order(&self) -> Option<&str> {
        self.raw.order.as_deref()
    }

    /// `order` interpreted as a sort direction, when it is one
    pub fn sort_order(&self) -> Option<SortOrder> {
        self.order().and_then(SortOrder::parse)
    }

    pub fn search(&self) -> Option<&str> {
        self.raw.search.as_deref()
    }

    pub fn state(&self) -> Option<ReadState> {
        self.raw.state
    }

    pub fn url(&self) -> Option<&str> {
        self.raw.url.as_deref()
    }

    /// True if a non-empty search was supplied
    pub fn has_search(&self) -> bool {
        self.search().is_some_and(|search| !search.is_empty())
    }

    /// False for the default view (no parameters, or only `get=a`)
    pub fn has_parameters(&self) -> bool {
        !self.raw.is_default_view()
    }

    /// True if the referenced category or feed was missing from the
    /// snapshot this query was built from
    pub fn is_deprecated(&self) -> bool {
        self.deprecated
    }

    /// The raw parameters exactly as supplied
    pub fn to_array(&self) -> RawParameters {
        self.raw.clone()
    }

    pub fn raw(&self) -> &RawParameters {
        &self.raw
    }

    pub fn into_raw(self) -> RawParameters {
        self.raw
    }
}
