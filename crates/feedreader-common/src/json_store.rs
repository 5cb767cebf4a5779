//! JSON file persistence helpers
//!
//! Used by the per-user stores: one JSON document per file, written
//! atomically so that a crash mid-write never leaves a truncated file.

use serde::{de::DeserializeOwned, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

/// JSON store errors
#[derive(Debug, Error)]
pub enum JsonStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("File not found: {path}")]
    NotFound { path: String },
}

/// Result type for JSON store operations
pub type JsonStoreResult<T> = Result<T, JsonStoreError>;

/// Load JSON from a file path
pub fn load_json<T, P>(path: P) -> JsonStoreResult<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(JsonStoreError::NotFound {
                path: path.display().to_string(),
            })
        }
        Err(e) => return Err(JsonStoreError::Io(e)),
    };

    serde_json::from_str(&content).map_err(|source| JsonStoreError::Json {
        path: path.display().to_string(),
        source,
    })
}

/// Save value as JSON atomically (write to a uniquely named temp file in the
/// same directory, then rename over the target)
pub fn save_json_atomic<T, P>(path: P, value: &T) -> JsonStoreResult<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let content = serde_json::to_string_pretty(value).map_err(|source| JsonStoreError::Json {
        path: path.display().to_string(),
        source,
    })?;

    // Each save gets its own temp file, so concurrent writers never share one.
    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(content.as_bytes())?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| JsonStoreError::Io(e.error))?;

    Ok(())
}

/// Remove a JSON file. Missing files are reported as `NotFound`.
pub fn remove_json<P: AsRef<Path>>(path: P) -> JsonStoreResult<()> {
    let path = path.as_ref();
    std::fs::remove_file(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            JsonStoreError::NotFound {
                path: path.display().to_string(),
            }
        } else {
            JsonStoreError::Io(e)
        }
    })
}

/// List the files in `dir` whose name ends with `suffix`, returning the part
/// of the name before the suffix, sorted. A missing directory yields an
/// empty list.
pub fn list_with_suffix<P: AsRef<Path>>(dir: P, suffix: &str) -> JsonStoreResult<Vec<String>> {
    let dir = dir.as_ref();
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut stems = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path: PathBuf = entry?.path();
        if !path.is_file() {
            continue;
        }
        if let Some(stem) = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_suffix(suffix))
        {
            if !stem.is_empty() {
                stems.push(stem.to_string());
            }
        }
    }

    stems.sort();
    Ok(stems)
}
