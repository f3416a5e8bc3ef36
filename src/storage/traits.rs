//! The snapshot store contract and its typed helpers.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::{Result, StorageError};

/// Key under which the lobby presence map is stored.
pub const LOBBY_PRESENCE_KEY: &str = "lobby:presence";

/// Key under which a room's snapshot is stored.
#[must_use]
pub fn room_key(code: &str) -> String {
    format!("room:{code}")
}

/// Byte-oriented key/value store for checkpoints.
///
/// Keys are `namespace:name` strings made of ASCII letters, digits, `_`,
/// `-` and at most one `:`. Values are opaque bytes; use
/// [`SnapshotStoreExt`] to store serde types through bincode.
pub trait SnapshotStore: Send + Sync {
    /// Store `bytes` under `key`, replacing any previous value.
    fn put(&self, key: &str, bytes: &[u8]) -> Result<()>;

    /// Load the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Remove `key`. Removing a missing key is not an error.
    fn delete(&self, key: &str) -> Result<()>;

    /// All keys starting with `prefix`, sorted.
    fn keys(&self, prefix: &str) -> Result<Vec<String>>;

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}

/// Typed save/load over any [`SnapshotStore`].
pub trait SnapshotStoreExt: SnapshotStore {
    fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = bincode::serialize(value)?;
        self.put(key, &bytes)
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key)? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }
}

impl<S: SnapshotStore + ?Sized> SnapshotStoreExt for S {}

pub(crate) fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key.matches(':').count() <= 1
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ':'));
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
