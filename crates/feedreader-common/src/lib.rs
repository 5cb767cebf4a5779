//! Shared utilities for feedreader crates
//!
//! - [`di`]: factory-return service registration collected with `inventory`
//! - [`json_store`]: JSON file loading and atomic saving
//! - [`logging`]: log level parsing and `tracing` subscriber setup

pub mod di;
pub mod json_store;
pub mod logging;

pub use json_store::{JsonStoreError, JsonStoreResult};
pub use logging::{init_logging, LogLevel, LogOptions};
