//! Parser for the `get` parameter
//!
//! Grammar:
//!
//! ```text
//! get     := "a" | "s" | kind "_" id
//! kind    := "c" | "f"
//! id      := ASCII digits, value > 0
//! ```
//!
//! Parsing is permissive: anything outside the grammar classifies as
//! [`QueryTarget::Unknown`] instead of failing.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// What a query filters on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryTarget {
    /// Every entry (`get=a`, or no `get` at all)
    All,
    /// Favorite entries (`get=s`)
    Favorite,
    /// One category (`get=c_<id>`)
    Category(i64),
    /// One feed (`get=f_<id>`)
    Feed(i64),
    /// A `get` value outside the grammar
    Unknown,
}

impl QueryTarget {
    /// Classify an optional `get` value
    pub fn parse(get: Option<&str>) -> Self {
        match get {
            None => QueryTarget::All,
            Some(value) => Self::parse_value(value),
        }
    }

    fn parse_value(value: &str) -> Self {
        match value {
            "a" => return QueryTarget::All,
            "s" => return QueryTarget::Favorite,
            _ => {}
        }

        let Some((kind, id)) = value.split_once('_') else {
            return QueryTarget::Unknown;
        };

        let Some(id) = parse_id(id) else {
            return QueryTarget::Unknown;
        };

        match kind {
            "c" => QueryTarget::Category(id),
            "f" => QueryTarget::Feed(id),
            _ => QueryTarget::Unknown,
        }
    }

    /// Canonical label: `all`, `favorite`, `category`, `feed`, or empty for
    /// an unknown target
    pub fn label(&self) -> &'static str {
        match self {
            QueryTarget::All => "all",
            QueryTarget::Favorite => "favorite",
            QueryTarget::Category(_) => "category",
            QueryTarget::Feed(_) => "feed",
            QueryTarget::Unknown => "",
        }
    }

    /// Id of the referenced category or feed
    pub fn id(&self) -> Option<i64> {
        match self {
            QueryTarget::Category(id) | QueryTarget::Feed(id) => Some(*id),
            _ => None,
        }
    }

    /// True for targets that point at a concrete category or feed and can
    /// therefore go stale
    pub fn references_entity(&self) -> bool {
        self.id().is_some()
    }
}

/// Strict positive decimal id: ASCII digits only, no sign, no whitespace
fn parse_id(text: &str) -> Option<i64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse::<i64>().ok().filter(|id| *id > 0)
}

impl FromStr for QueryTarget {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse_value(s))
    }
}

impl fmt::Display for QueryTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
