//! Small file helpers shared by the pipeline steps
//!
//! Every helper maps I/O failures into [`Error`] with the offending path
//! attached, so callers never need to add context themselves.

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// Read a file to a string, reporting a missing file as [`Error::NotFound`]
pub fn read_to_string(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

/// Read and deserialize a JSON file
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| Error::parse(path, e))
}

/// Write a file, creating its parent directory first
pub fn write_ensuring_parent(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    std::fs::write(path, content).map_err(|e| Error::io(path, e))
}
