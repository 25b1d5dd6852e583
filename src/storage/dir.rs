//! Directory-backed storage: one JSON file per key.

use super::KeyValueStore;
use crate::config::get_data_dir;
use crate::error::{Error, Result};
use log::debug;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Sub-directory of the data dir that holds the key files.
const STORAGE_DIR_NAME: &str = "storage";

/// A [`KeyValueStore`] persisting each key as `<root>/<key>.json`.
///
/// Writes go to `<key>.json.tmp` first and are renamed over the target so a
/// crash mid-write never leaves a truncated value behind.
#[derive(Debug, Clone)]
pub struct DirStorage {
    root: PathBuf,
}

impl DirStorage {
    /// Open (without creating) a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Open the store in the platform data directory.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(get_data_dir()?.join(STORAGE_DIR_NAME)))
    }

    /// The directory holding the key files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn key_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(Error::Application(format!("Invalid storage key: {:?}", key)));
        }
        Ok(self.root.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for DirStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::StorageRead {
                key: key.to_string(),
                source: Box::new(e),
            }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key)?;
        let tmp_path = path.with_extension("json.tmp");
        let write_err = |e: io::Error| Error::StorageWrite {
            key: key.to_string(),
            source: Box::new(e),
        };

        fs::create_dir_all(&self.root).map_err(write_err)?;
        fs::write(&tmp_path, value).map_err(write_err)?;
        fs::rename(&tmp_path, &path).map_err(write_err)?;

        debug!("Stored '{}' ({} bytes)", key, value.len());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.key_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("Removed '{}' from storage", key);
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::StorageWrite {
                key: key.to_string(),
                source: Box::new(e),
            }),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
