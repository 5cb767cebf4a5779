//! The ordered list of a user's bookmarked queries
//!
//! A saved query is addressed by its position in the list. Only raw
//! parameters are stored; resolving them against a catalog is done on
//! demand, so staleness always reflects the snapshot passed in.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::SavedQueryError;
use crate::models::{CatalogSnapshot, RawParameters};
use crate::query::UserQuery;

fn validate_name(name: &str) -> Result<(), SavedQueryError> {
    if name.trim().is_empty() {
        return Err(SavedQueryError::InvalidName(
            "Query name cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// A user's saved queries, in display order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SavedQueries {
    queries: Vec<RawParameters>,
}

impl SavedQueries {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a list from stored raw queries, kept verbatim
    pub fn from_raw(queries: Vec<RawParameters>) -> Self {
        SavedQueries { queries }
    }

    /// Bookmark a query. Fills in a default name (`Query #<n>`) and the view
    /// URL when they were not supplied; a supplied name must not be blank.
    /// Returns the new index.
    pub fn bookmark(&mut self, mut raw: RawParameters) -> Result<usize, SavedQueryError> {
        if raw.is_default_view() {
            return Err(SavedQueryError::NoParameters);
        }
        if let Some(name) = raw.name.as_deref() {
            validate_name(name)?;
        }

        let index = self.queries.len();
        if raw.name.is_none() {
            raw.name = Some(format!("Query #{}", index + 1));
        }
        if raw.url.is_none() {
            raw.url = Some(format!("?{}", raw.view_query_string()));
        }

        info!(index, name = raw.name.as_deref().unwrap_or_default(), "Bookmarked query");
        self.queries.push(raw);
        Ok(index)
    }

    /// Append a query exactly as given. Returns the new index.
    pub fn push(&mut self, raw: RawParameters) -> usize {
        self.queries.push(raw);
        self.queries.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&RawParameters> {
        self.queries.get(index)
    }

    fn check_index(&self, index: usize) -> Result<(), SavedQueryError> {
        if index < self.queries.len() {
            Ok(())
        } else {
            Err(SavedQueryError::IndexOutOfRange {
                index,
                len: self.queries.len(),
            })
        }
    }

    /// Rename a saved query
    pub fn rename(&mut self, index: usize, name: impl Into<String>) -> Result<(), SavedQueryError> {
        let name = name.into();
        validate_name(&name)?;
        self.check_index(index)?;
        self.queries[index].name = Some(name);
        Ok(())
    }

    /// Move a saved query from one position to another, shifting the
    /// queries in between
    pub fn move_query(&mut self, from: usize, to: usize) -> Result<(), SavedQueryError> {
        self.check_index(from)?;
        self.check_index(to)?;
        let query = self.queries.remove(from);
        self.queries.insert(to, query);
        Ok(())
    }

    /// Remove a saved query and return it
    pub fn remove(&mut self, index: usize) -> Result<RawParameters, SavedQueryError> {
        self.check_index(index)?;
        Ok(self.queries.remove(index))
    }

    pub fn clear(&mut self) {
        self.queries.clear();
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RawParameters> {
        self.queries.iter()
    }

    /// Resolve every saved query against a snapshot
    pub fn resolve_all(&self, snapshot: &CatalogSnapshot) -> Vec<UserQuery> {
        self.queries
            .iter()
            .cloned()
            .map(|raw| UserQuery::from_snapshot(raw, snapshot))
            .collect()
    }

    /// Indices of the saved queries whose target no longer exists
    pub fn deprecated_indices(&self, snapshot: &CatalogSnapshot) -> Vec<usize> {
        self.resolve_all(snapshot)
            .iter()
            .enumerate()
            .filter(|(_, query)| query.is_deprecated())
            .map(|(index, _)| index)
            .collect()
    }

    /// Remove the deprecated queries, keeping the order of the others.
    /// Returns the removed queries in their former order.
    pub fn prune_deprecated(&mut self, snapshot: &CatalogSnapshot) -> Vec<RawParameters> {
        let (stale, kept): (Vec<UserQuery>, Vec<UserQuery>) = self
            .resolve_all(snapshot)
            .into_iter()
            .partition(UserQuery::is_deprecated);

        for query in &stale {
            warn!(
                name = query.name().unwrap_or_default(),
                get = query.get().unwrap_or_default(),
                "Pruning deprecated query"
            );
        }

        self.queries = kept.into_iter().map(UserQuery::into_raw).collect();
        stale.into_iter().map(UserQuery::into_raw).collect()
    }
}

impl<'a> IntoIterator for &'a SavedQueries {
    type Item = &'a RawParameters;
    type IntoIter = std::slice::Iter<'a, RawParameters>;

    fn into_iter(self) -> Self::IntoIter {
        self.queries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bookmark_fills_name_and_url() {
        let mut saved = SavedQueries::new();
        let index = saved
            .bookmark(RawParameters::new().with_get("c_2").with_search("rust"))
            .unwrap();
        assert_eq!(index, 0);

        let stored = saved.get(0).unwrap();
        assert_eq!(stored.name.as_deref(), Some("Query #1"));
        assert_eq!(stored.url.as_deref(), Some("?get=c_2&search=rust"));
    }

    #[test]
    fn test_bookmark_keeps_supplied_fields() {
        let mut saved = SavedQueries::new();
        saved
            .bookmark(RawParameters::new().with_get("s").with_name("Stars").with_url("/i/?get=s"))
            .unwrap();
        let stored = saved.get(0).unwrap();
        assert_eq!(stored.name.as_deref(), Some("Stars"));
        assert_eq!(stored.url.as_deref(), Some("/i/?get=s"));
    }

    #[test]
    fn test_bookmark_rejects_default_view() {
        let mut saved = SavedQueries::new();
        assert_eq!(
            saved.bookmark(RawParameters::new().with_get("a")),
            Err(SavedQueryError::NoParameters)
        );
        assert_eq!(
            saved.bookmark(RawParameters::new()),
            Err(SavedQueryError::NoParameters)
        );
        assert!(saved.is_empty());
    }

    #[test]
    fn test_push_is_verbatim() {
        let mut saved = SavedQueries::new();
        saved.push(RawParameters::new());
        assert_eq!(saved.get(0), Some(&RawParameters::new()));
    }

    #[test]
    fn test_index_errors() {
        let mut saved = SavedQueries::new();
        assert_eq!(
            saved.remove(0),
            Err(SavedQueryError::IndexOutOfRange { index: 0, len: 0 })
        );
        saved.push(RawParameters::new().with_get("s"));
        assert!(saved.rename(1, "x").is_err());
        assert!(matches!(saved.rename(0, "  "), Err(SavedQueryError::InvalidName(_))));
        assert!(saved.move_query(0, 1).is_err());
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let saved = SavedQueries::from_raw(vec![RawParameters::new().with_get("c_1")]);
        assert_eq!(serde_json::to_string(&saved).unwrap(), r#"[{"get":"c_1"}]"#);
    }
}
