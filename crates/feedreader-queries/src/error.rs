//! Error types for query operations
//!
//! Resolving a [`UserQuery`](crate::UserQuery) never fails. These errors
//! belong to the layers around it: text formats, catalog sources, the saved
//! query list, storage, configuration and the engine facade.

use thiserror::Error;

/// Errors that can occur while reading raw query parameters from text
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Invalid JSON syntax: {0}")]
    InvalidJson(String),

    #[error("Expected a JSON object of query parameters, got {0}")]
    NotAnObject(String),

    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    #[error("Invalid state bitmask: {0}")]
    InvalidState(String),
}

/// Errors that can occur while reading a catalog snapshot
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog file not found: {0}")]
    FileNotFound(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Corrupted catalog snapshot: {0}")]
    Corrupted(String),

    #[error("Unsupported catalog format: {0}")]
    UnsupportedFormat(String),
}

/// Errors that can occur in the saved query list
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SavedQueryError {
    #[error("No saved query at index {index} (list has {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Invalid query name: {0}")]
    InvalidName(String),

    #[error("Query has no parameters and would show the default view")]
    NoParameters,
}

/// Errors that can occur in the persistence layer
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Invalid user name: {0}")]
    InvalidUser(String),

    #[error("No saved queries for user: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Corrupted JSON: {0}")]
    CorruptedJson(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Errors that can occur in the query engine
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),

    #[error("Catalog error: {0}")]
    CatalogError(#[from] CatalogError),

    #[error("Saved query error: {0}")]
    SavedQueryError(#[from] SavedQueryError),

    #[error("Persistence error: {0}")]
    PersistenceError(#[from] PersistenceError),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("User {user} already has the maximum of {limit} saved queries")]
    LimitReached { user: String, limit: usize },
}
