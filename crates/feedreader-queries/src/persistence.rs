//! Persistence layer for saved query lists
//!
//! # Storage Location
//!
//! Each user's list is stored as one JSON file in the data directory:
//!
//! ```text
//! <data_dir>/
//! ├── alice.queries.json
//! └── bob.queries.json
//! ```
//!
//! # File Format
//!
//! A JSON array of parameter objects holding only the keys that were
//! supplied when the query was saved:
//!
//! ```json
//! [
//!   { "get": "c_1", "name": "News", "url": "?get=c_1" },
//!   { "get": "s", "name": "Unread stars", "state": 6, "url": "?get=s&state=6" }
//! ]
//! ```

use std::path::{Path, PathBuf};

use feedreader_common::json_store::{self, JsonStoreError};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

use crate::error::PersistenceError;
use crate::saved::SavedQueries;

const FILE_SUFFIX: &str = ".queries.json";

static USER_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9A-Za-z_][0-9A-Za-z_.@-]{0,38}$").expect("user name pattern is valid")
});

/// Check a user name before it is used to build a file path
pub fn validate_user(user: &str) -> Result<(), PersistenceError> {
    if USER_NAME.is_match(user) {
        Ok(())
    } else {
        Err(PersistenceError::InvalidUser(user.to_string()))
    }
}

/// Trait for persisting saved query lists
pub trait QueryPersistence: Send + Sync {
    /// Save a user's list, replacing any previous one
    fn save_queries(&self, user: &str, queries: &SavedQueries) -> Result<(), PersistenceError>;

    /// Load a user's list
    fn load_queries(&self, user: &str) -> Result<SavedQueries, PersistenceError>;

    /// Delete a user's list
    fn delete_queries(&self, user: &str) -> Result<(), PersistenceError>;

    /// List the users that have a saved list
    fn list_users(&self) -> Result<Vec<String>, PersistenceError>;
}

/// File system based persistence
#[derive(Debug, Clone)]
pub struct FileSystemPersistence {
    data_dir: PathBuf,
}

impl FileSystemPersistence {
    /// Create a new file system persistence rooted at `data_dir`, creating
    /// the directory if needed
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let data_dir = data_dir.as_ref().to_path_buf();

        if !data_dir.exists() {
            std::fs::create_dir_all(&data_dir).map_err(|e| {
                PersistenceError::IoError(std::io::Error::new(
                    e.kind(),
                    format!("Failed to create data directory: {}", e),
                ))
            })?;
        }

        Ok(FileSystemPersistence { data_dir })
    }

    fn queries_path(&self, user: &str) -> PathBuf {
        self.data_dir.join(format!("{}{}", user, FILE_SUFFIX))
    }

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn map_store_error(&self, user: &str, error: JsonStoreError) -> PersistenceError {
        match error {
            JsonStoreError::NotFound { .. } => PersistenceError::NotFound(user.to_string()),
            JsonStoreError::Json { source, .. } => PersistenceError::CorruptedJson(format!(
                "Failed to parse saved queries of {}: {}",
                user, source
            )),
            JsonStoreError::Io(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                PersistenceError::PermissionDenied(self.queries_path(user).display().to_string())
            }
            JsonStoreError::Io(e) => PersistenceError::IoError(e),
        }
    }
}

impl QueryPersistence for FileSystemPersistence {
    fn save_queries(&self, user: &str, queries: &SavedQueries) -> Result<(), PersistenceError> {
        validate_user(user)?;
        json_store::save_json_atomic(self.queries_path(user), queries)
            .map_err(|e| self.map_store_error(user, e))?;

        info!(user, count = queries.len(), "Saved queries");
        Ok(())
    }

    fn load_queries(&self, user: &str) -> Result<SavedQueries, PersistenceError> {
        validate_user(user)?;
        let queries: SavedQueries = json_store::load_json(self.queries_path(user))
            .map_err(|e| self.map_store_error(user, e))?;

        debug!(user, count = queries.len(), "Loaded saved queries");
        Ok(queries)
    }

    fn delete_queries(&self, user: &str) -> Result<(), PersistenceError> {
        validate_user(user)?;
        json_store::remove_json(self.queries_path(user))
            .map_err(|e| self.map_store_error(user, e))?;

        info!(user, "Deleted saved queries");
        Ok(())
    }

    fn list_users(&self) -> Result<Vec<String>, PersistenceError> {
        let users = json_store::list_with_suffix(&self.data_dir, FILE_SUFFIX)
            .map_err(|e| match e {
                JsonStoreError::Io(e) => PersistenceError::IoError(e),
                other => PersistenceError::IoError(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    other.to_string(),
                )),
            })?;

        Ok(users
            .into_iter()
            .filter(|user| validate_user(user).is_ok())
            .collect())
    }
}
