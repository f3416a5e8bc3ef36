//! File-backed store.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::Result;
use super::traits::{validate_key, SnapshotStore};

/// Snapshot store keeping one file per key.
///
/// # File Format
///
/// `room:ABC234` is stored as `room.ABC234.bin` in the base directory.
/// Writes go to a temporary file first and are renamed into place, so a
/// crash mid-write leaves the previous snapshot intact.
#[derive(Debug)]
pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `base_dir`, creating the directory if needed.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{}.bin", key.replace(':', ".")))
    }
}

impl SnapshotStore for FileStore {
    fn put(&self, key: &str, bytes: &[u8]) -> Result<()> {
        validate_key(key)?;
        let path = self.path(key);
        let temp_path = path.with_extension("bin.tmp");

        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, &path)?;

        debug!(key, path = %path.display(), "snapshot written");
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        validate_key(key)?;
        let path = self.path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read(&path)?))
    }

    fn delete(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        let path = self.path(key);
        if path.exists() {
            fs::remove_file(&path)?;
            debug!(key, "snapshot deleted");
        }
        Ok(())
    }

    fn keys(&self, prefix: &str) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            let Some(stem) = path
                .file_name()
                .and_then(|s| s.to_str())
                .and_then(|s| s.strip_suffix(".bin"))
            else {
                continue;
            };
            let key = stem.replace('.', ":");
            if key.starts_with(prefix) && validate_key(&key).is_ok() {
                keys.push(key);
            }
        }
        keys.sort_unstable();
        Ok(keys)
    }
}
