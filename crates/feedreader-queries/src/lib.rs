//! Saved-query resolution and classification for the feed reader
//!
//! This crate turns the raw description of a reading view (`get`, `name`,
//! `order`, `search`, `state`, `url`) into a classified [`UserQuery`]:
//! - `get` parsing into a [`QueryTarget`] (all, favorites, category, feed)
//! - target name lookup against a [`CatalogSnapshot`]
//! - staleness detection for saved queries whose target disappeared
//! - per-user saved query lists with JSON persistence
//! - configuration loading and an engine facade tying it together

pub mod catalog;
pub mod config;
pub mod di;
pub mod engine;
pub mod error;
pub mod models;
pub mod parser;
pub mod persistence;
pub mod query;
pub mod saved;

// Re-export public types
pub use catalog::{CatalogSource, FileCatalog, InMemoryCatalog};
pub use config::{QueryConfig, QueryConfigLoader};
pub use engine::QueryEngine;
pub use error::{
    CatalogError, ConfigError, EngineError, ParseError, PersistenceError, SavedQueryError,
};
pub use models::{CatalogSnapshot, Category, Feed, RawParameters, ReadState, SortOrder};
pub use parser::QueryTarget;
pub use persistence::{FileSystemPersistence, QueryPersistence};
pub use query::UserQuery;
pub use saved::SavedQueries;
