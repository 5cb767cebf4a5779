//! Sources of catalog snapshots
//!
//! The category and feed stores live outside this crate. A
//! [`CatalogSource`] hands out a [`CatalogSnapshot`] by value; queries are
//! resolved against that copy, so later changes to the store never reach an
//! already resolved [`UserQuery`](crate::UserQuery).

use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use tracing::debug;

use crate::error::CatalogError;
use crate::models::{CatalogSnapshot, Category, Feed};

/// Trait for anything that can produce a catalog snapshot
pub trait CatalogSource: Send + Sync {
    /// Take a snapshot of the current categories and feeds
    fn snapshot(&self) -> Result<CatalogSnapshot, CatalogError>;
}

/// In-memory catalog, mutable through a shared reference
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    state: RwLock<CatalogSnapshot>,
}

impl InMemoryCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog seeded with a snapshot
    pub fn from_snapshot(snapshot: CatalogSnapshot) -> Self {
        InMemoryCatalog {
            state: RwLock::new(snapshot),
        }
    }

    /// Insert a category, replacing any category with the same id
    pub fn upsert_category(&self, category: Category) {
        let mut state = self.state.write();
        match state.categories.iter_mut().find(|c| c.id == category.id) {
            Some(existing) => *existing = category,
            None => state.categories.push(category),
        }
    }

    /// Remove a category and its feeds
    pub fn remove_category(&self, category_id: i64) -> Option<Category> {
        let mut state = self.state.write();
        let position = state.categories.iter().position(|c| c.id == category_id)?;
        Some(state.categories.remove(position))
    }

    /// Add a feed to an existing category. Returns false if the category is
    /// unknown.
    pub fn add_feed(&self, category_id: i64, feed: Feed) -> bool {
        let mut state = self.state.write();
        match state.categories.iter_mut().find(|c| c.id == category_id) {
            Some(category) => {
                category.add_feed(feed);
                true
            }
            None => false,
        }
    }

    /// Remove a feed from whichever category or secondary list holds it
    pub fn remove_feed(&self, feed_id: i64) -> Option<Feed> {
        let mut state = self.state.write();
        if let Some(feed) = state
            .categories
            .iter_mut()
            .find_map(|category| category.remove_feed(feed_id))
        {
            return Some(feed);
        }
        let position = state.secondary_feeds.iter().position(|f| f.id == feed_id)?;
        Some(state.secondary_feeds.remove(position))
    }

    /// Replace the secondary feed list
    pub fn set_secondary_feeds(&self, feeds: Vec<Feed>) {
        self.state.write().secondary_feeds = feeds;
    }
}

impl CatalogSource for InMemoryCatalog {
    fn snapshot(&self) -> Result<CatalogSnapshot, CatalogError> {
        Ok(self.state.read().clone())
    }
}

/// Catalog read from a JSON or YAML file on every snapshot
#[derive(Debug, Clone)]
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    pub fn new(path: impl AsRef<Path>) -> Self {
        FileCatalog {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogSource for FileCatalog {
    fn snapshot(&self) -> Result<CatalogSnapshot, CatalogError> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CatalogError::FileNotFound(self.path.display().to_string())
            } else {
                CatalogError::IoError(e)
            }
        })?;

        let extension = self
            .path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .unwrap_or_default();

        let snapshot: CatalogSnapshot = match extension.as_str() {
            "json" => serde_json::from_str(&content)
                .map_err(|e| CatalogError::Corrupted(e.to_string()))?,
            "yaml" | "yml" => serde_yaml::from_str(&content)
                .map_err(|e| CatalogError::Corrupted(e.to_string()))?,
            other => return Err(CatalogError::UnsupportedFormat(other.to_string())),
        };

        debug!(
            path = %self.path.display(),
            categories = snapshot.categories.len(),
            feeds = snapshot.feed_count(),
            "Loaded catalog snapshot"
        );

        Ok(snapshot)
    }
}
