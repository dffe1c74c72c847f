//! File-backed store: one `<key>.json` file per key.

use super::{KeyValueStore, StoreError};
use std::path::PathBuf;
use tracing::{debug, info, instrument};

/// Key-value store keeping each value in `<dir>/<key>.json`.
///
/// The directory is created on first write.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `dir`.
    #[instrument(skip(dir), fields(dir = %dir.as_ref().display()))]
    pub fn new(dir: impl AsRef<std::path::Path>) -> Self {
        info!("Opening file store");
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Returns the directory backing this store.
    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    /// Returns the file name used for `key`.
    ///
    /// Anything outside `[A-Za-z0-9_-]` is replaced by `_`, so distinct keys
    /// can share a file name.
    pub fn file_name(key: &str) -> String {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        format!("{}.json", name)
    }

    /// Returns the path of the file holding `key`.
    pub fn file_path(&self, key: &str) -> PathBuf {
        self.dir.join(Self::file_name(key))
    }
}

impl KeyValueStore for FileStore {
    #[instrument(skip(self))]
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.file_path(key);
        if !path.exists() {
            debug!(path = %path.display(), "No stored value");
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path)?;
        Ok(Some(contents))
    }

    #[instrument(skip(self, value), fields(len = value.len()))]
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.file_path(key);
        std::fs::write(&path, value)?;
        debug!(path = %path.display(), "Value stored");
        Ok(())
    }

    #[instrument(skip(self))]
    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        let path = self.file_path(key);
        if path.exists() {
            std::fs::remove_file(&path)?;
        }
        Ok(())
    }
}
