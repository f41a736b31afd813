//! Content document loading and saving.
//!
//! The site configuration lives in a single human-authored file, either YAML
//! or JSON, detected by file extension. It is read once per build, validated,
//! asset-resolved in place, and written back to the *same* file in the *same*
//! format — the write-back is what makes repeat runs idempotent: resolved
//! fields hold local paths, so the next run's walker finds nothing to fetch.
//!
//! The in-memory representation is `serde_json::Value` regardless of the
//! on-disk format, so validation and the asset walker operate on one tree
//! type.

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported content file extension: {0} (expected .yaml, .yml or .json)")]
    UnsupportedExtension(PathBuf),
}

/// On-disk format of a content document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentFormat {
    Yaml,
    Json,
}

impl ContentFormat {
    /// Detect the format from the file extension.
    pub fn detect(path: &Path) -> Result<Self, ContentError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Ok(Self::Yaml)
            }
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            _ => Err(ContentError::UnsupportedExtension(path.to_path_buf())),
        }
    }
}

/// Load a content document into the shared tree representation.
pub fn load(path: &Path) -> Result<Value, ContentError> {
    let format = ContentFormat::detect(path)?;
    let text = fs::read_to_string(path)?;
    let value = match format {
        ContentFormat::Yaml => serde_yaml::from_str(&text)?,
        ContentFormat::Json => serde_json::from_str(&text)?,
    };
    Ok(value)
}

/// Write a (possibly mutated) tree back to its content file, same format.
pub fn save(path: &Path, value: &Value) -> Result<(), ContentError> {
    let format = ContentFormat::detect(path)?;
    let text = match format {
        ContentFormat::Yaml => serde_yaml::to_string(value)?,
        ContentFormat::Json => {
            let mut json = serde_json::to_string_pretty(value)?;
            json.push('\n');
            json
        }
    };
    fs::write(path, text)?;
    Ok(())
}
