//! Key → JSON blob storage
//!
//! Every key is one JSON file in the store directory:
//! - ~/.local/share/vitalis/<tool>/<key>.json
//!
//! Reads fall back to a default when the file is missing or unreadable,
//! writes replace the whole blob (last write wins).

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A directory of JSON blobs addressed by key
pub struct KvStore {
    dir: PathBuf,
}

impl KvStore {
    /// Open a store rooted at `dir`, creating it if needed
    pub fn open(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create store directory: {}", dir.display()))?;

        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    /// Directory holding the blobs
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            bail!("Invalid store key: {:?}", key);
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }

    /// Read a value, `None` if the key has never been written
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let path = self.key_path(key)?;
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        if content.trim().is_empty() {
            return Ok(None);
        }

        let value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        Ok(Some(value))
    }

    /// Read a value, falling back to `default` when missing or unreadable
    pub fn load_or<T, F>(&self, key: &str, default: F) -> T
    where
        T: DeserializeOwned,
        F: FnOnce() -> T,
    {
        match self.get(key) {
            Ok(Some(value)) => value,
            Ok(None) => {
                debug!("No stored value for '{}', using default", key);
                default()
            }
            Err(e) => {
                warn!("Failed to load '{}', using default: {:#}", key, e);
                default()
            }
        }
    }

    /// Write a value, replacing whatever was stored under `key`
    pub fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let path = self.key_path(key)?;
        let content = serde_json::to_string_pretty(value)
            .with_context(|| format!("Failed to serialize '{}'", key))?;

        fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        debug!("Stored '{}'", key);
        Ok(())
    }

    /// Remove a key; removing a missing key is not an error
    pub fn remove(&self, key: &str) -> Result<()> {
        let path = self.key_path(key)?;
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove {}", path.display()))?;
        }
        Ok(())
    }

    /// Check whether a key has a stored value
    pub fn contains(&self, key: &str) -> bool {
        self.key_path(key).map(|p| p.exists()).unwrap_or(false)
    }
}
