//! Query engine combining the catalog, the saved query lists and storage

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::catalog::CatalogSource;
use crate::config::QueryConfig;
use crate::error::{EngineError, PersistenceError};
use crate::models::RawParameters;
use crate::persistence::QueryPersistence;
use crate::query::UserQuery;
use crate::saved::SavedQueries;

/// Main entry point for resolving and managing user queries
///
/// Changes to one user's list are serialised: each mutation loads, edits and
/// saves the list while holding that user's lock.
pub struct QueryEngine {
    catalog: Arc<dyn CatalogSource>,
    persistence: Arc<dyn QueryPersistence>,
    config: QueryConfig,
    user_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl QueryEngine {
    /// Create a new engine. The configuration is validated first.
    pub fn new(
        catalog: Arc<dyn CatalogSource>,
        persistence: Arc<dyn QueryPersistence>,
        config: QueryConfig,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(QueryEngine {
            catalog,
            persistence,
            config,
            user_locks: Mutex::new(HashMap::new()),
        })
    }

    fn user_lock(&self, user: &str) -> Arc<Mutex<()>> {
        self.user_locks
            .lock()
            .entry(user.to_string())
            .or_default()
            .clone()
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Resolve raw parameters against a fresh catalog snapshot
    pub fn resolve(&self, raw: RawParameters) -> Result<UserQuery, EngineError> {
        let snapshot = self.catalog.snapshot()?;
        Ok(UserQuery::from_snapshot(raw, &snapshot))
    }

    /// Load a user's list; a user without a file has an empty list
    fn load(&self, user: &str) -> Result<SavedQueries, EngineError> {
        match self.persistence.load_queries(user) {
            Ok(queries) => Ok(queries),
            Err(PersistenceError::NotFound(_)) => {
                debug!(user, "No saved queries yet");
                Ok(SavedQueries::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// The user's saved queries, resolved against a fresh snapshot.
    ///
    /// With `prune_deprecated_on_load`, deprecated entries are dropped and
    /// the shortened list is written back.
    pub fn saved_queries(&self, user: &str) -> Result<Vec<UserQuery>, EngineError> {
        let snapshot = self.catalog.snapshot()?;
        let lock = self.user_lock(user);
        let _guard = lock.lock();
        let mut queries = self.load(user)?;

        if self.config.prune_deprecated_on_load {
            let removed = queries.prune_deprecated(&snapshot);
            if !removed.is_empty() {
                self.persistence.save_queries(user, &queries)?;
            }
        }

        let resolved = queries.resolve_all(&snapshot);
        let deprecated = resolved.iter().filter(|q| q.is_deprecated()).count();
        if deprecated > 0 {
            warn!(user, deprecated, "User has deprecated saved queries");
        }
        Ok(resolved)
    }

    /// Bookmark a query for a user. Returns the index of the new entry.
    pub fn bookmark(&self, user: &str, raw: RawParameters) -> Result<usize, EngineError> {
        let lock = self.user_lock(user);
        let _guard = lock.lock();
        let mut queries = self.load(user)?;
        if queries.len() >= self.config.max_saved_queries {
            return Err(EngineError::LimitReached {
                user: user.to_string(),
                limit: self.config.max_saved_queries,
            });
        }

        let index = queries.bookmark(raw)?;
        self.persistence.save_queries(user, &queries)?;
        Ok(index)
    }

    /// Rename one of the user's saved queries
    pub fn rename(&self, user: &str, index: usize, name: &str) -> Result<(), EngineError> {
        let lock = self.user_lock(user);
        let _guard = lock.lock();
        let mut queries = self.load(user)?;
        queries.rename(index, name)?;
        self.persistence.save_queries(user, &queries)?;
        Ok(())
    }

    /// Move one of the user's saved queries to another position
    pub fn move_query(&self, user: &str, from: usize, to: usize) -> Result<(), EngineError> {
        let lock = self.user_lock(user);
        let _guard = lock.lock();
        let mut queries = self.load(user)?;
        queries.move_query(from, to)?;
        self.persistence.save_queries(user, &queries)?;
        Ok(())
    }

    /// Remove one of the user's saved queries and return it
    pub fn remove(&self, user: &str, index: usize) -> Result<RawParameters, EngineError> {
        let lock = self.user_lock(user);
        let _guard = lock.lock();
        let mut queries = self.load(user)?;
        let removed = queries.remove(index)?;
        self.persistence.save_queries(user, &queries)?;
        info!(user, index, "Removed saved query");
        Ok(removed)
    }

    /// Drop every deprecated saved query of the user. Returns what was
    /// removed; the list is only rewritten when something changed.
    pub fn prune_deprecated(&self, user: &str) -> Result<Vec<RawParameters>, EngineError> {
        let snapshot = self.catalog.snapshot()?;
        let lock = self.user_lock(user);
        let _guard = lock.lock();
        let mut queries = self.load(user)?;
        let removed = queries.prune_deprecated(&snapshot);
        if !removed.is_empty() {
            self.persistence.save_queries(user, &queries)?;
        }
        Ok(removed)
    }
}
