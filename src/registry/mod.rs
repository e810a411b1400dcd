//! The JSON registry of sources.
//!
//! The file is an object keyed by source key; each value is an object with
//! at least `base_url` and `icon_url`. Key order and unknown fields survive a
//! load/save cycle untouched, and saves replace the file atomically.

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};
use tempfile::NamedTempFile;
use tokio::fs;

use crate::app::favicon_url;
use crate::error_handling::RegistryError;

/// A registry entry as seen by the resolvers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    pub key: String,
    /// `None` when the entry has no string `base_url`; such entries are skipped.
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registry {
    entries: Map<String, Value>,
}

impl Registry {
    /// Reads and parses the registry at `path`.
    pub async fn load(path: &Path) -> Result<Self, RegistryError> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|source| RegistryError::Unavailable {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_json(&content).map_err(|source| RegistryError::Malformed {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        let entries: Map<String, Value> = serde_json::from_str(content)?;
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in file order.
    pub fn entries(&self) -> Vec<SourceEntry> {
        self.entries
            .iter()
            .map(|(key, value)| SourceEntry {
                key: key.clone(),
                base_url: value
                    .get("base_url")
                    .and_then(Value::as_str)
                    .filter(|u| !u.trim().is_empty())
                    .map(str::to_string),
            })
            .collect()
    }

    pub fn base_url(&self, key: &str) -> Option<&str> {
        self.entries.get(key)?.get("base_url")?.as_str()
    }

    pub fn icon_url(&self, key: &str) -> Option<&str> {
        self.entries.get(key)?.get("icon_url")?.as_str()
    }

    /// Points `key` at `new_url` and rebuilds its `icon_url`.
    ///
    /// Returns `false` (and changes nothing) when the entry is missing, is not
    /// an object, or already holds `new_url`.
    pub fn apply_update(&mut self, key: &str, new_url: &str) -> bool {
        let Some(Value::Object(entry)) = self.entries.get_mut(key) else {
            return false;
        };
        if entry.get("base_url").and_then(Value::as_str) == Some(new_url) {
            return false;
        }
        entry.insert("base_url".to_string(), Value::String(new_url.to_string()));
        if let Some(icon) = favicon_url(new_url) {
            entry.insert("icon_url".to_string(), Value::String(icon));
        }
        true
    }

    /// Serializes with 4-space indentation.
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.entries.serialize(&mut ser)?;
        Ok(buf)
    }

    /// Writes the registry to `path` via a temp file in the same directory
    /// and a rename, so readers never see a partial file.
    pub fn save(&self, path: &Path) -> Result<(), RegistryError> {
        let write_error = |source: std::io::Error| RegistryError::Write {
            path: path.to_path_buf(),
            source,
        };
        let json = self.to_json().map_err(|e| write_error(e.into()))?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(write_error)?;
        tmp.write_all(&json).map_err(write_error)?;
        tmp.as_file().sync_all().map_err(write_error)?;
        tmp.persist(path).map_err(|e| write_error(e.error))?;
        Ok(())
    }
}
