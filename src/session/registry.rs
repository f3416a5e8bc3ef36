//! Room registry: room code to running actor.

use std::sync::{Arc, Mutex, PoisonError};

use rustc_hash::FxHashMap;
use tracing::{info, warn};

use super::actor::{RoomActor, RoomHandle};
use super::config::SessionConfig;
use crate::cards::CatalogSource;
use crate::storage::SnapshotStore;

/// Shared map of live rooms.
///
/// Opening a code returns the running room, resumes a checkpointed one, or
/// spawns a new one, in that order. Rooms that have shut down are replaced
/// on the next open.
pub struct RoomRegistry {
    config: SessionConfig,
    catalog: Arc<dyn CatalogSource>,
    store: Arc<dyn SnapshotStore>,
    rooms: Mutex<FxHashMap<String, RoomHandle>>,
}

impl RoomRegistry {
    #[must_use]
    pub fn new(config: SessionConfig, catalog: Arc<dyn CatalogSource>, store: Arc<dyn SnapshotStore>) -> Self {
        Self {
            config,
            catalog,
            store,
            rooms: Mutex::new(FxHashMap::default()),
        }
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Get or create the room for `code`. Codes are case-insensitive.
    pub fn open(&self, code: &str) -> RoomHandle {
        let code = code.to_ascii_uppercase();
        let mut rooms = self.rooms.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = rooms.get(&code).filter(|h| !h.is_closed()) {
            return handle.clone();
        }

        let restored = match RoomActor::restore(&code, self.config.clone(), self.catalog.clone(), self.store.clone()) {
            Ok(handle) => handle,
            Err(err) => {
                warn!(room = %code, %err, "checkpoint unreadable, starting fresh");
                None
            }
        };
        let handle = restored.unwrap_or_else(|| {
            info!(room = %code, "room opened");
            RoomActor::spawn(code.clone(), self.config.clone(), self.catalog.clone(), self.store.clone())
        });
        rooms.insert(code, handle.clone());
        handle
    }

    /// The running room for `code`, if any.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<RoomHandle> {
        let rooms = self.rooms.lock().unwrap_or_else(PoisonError::into_inner);
        rooms
            .get(&code.to_ascii_uppercase())
            .filter(|h| !h.is_closed())
            .cloned()
    }

    /// Shut a room down and forget it.
    pub fn close(&self, code: &str) {
        let mut rooms = self.rooms.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = rooms.remove(&code.to_ascii_uppercase()) {
            handle.shutdown();
        }
    }

    /// Forget rooms whose actors have stopped. Returns how many were dropped.
    pub fn prune(&self) -> usize {
        let mut rooms = self.rooms.lock().unwrap_or_else(PoisonError::into_inner);
        let before = rooms.len();
        rooms.retain(|_, h| !h.is_closed());
        before - rooms.len()
    }

    /// Rooms currently live.
    #[must_use]
    pub fn len(&self) -> usize {
        let rooms = self.rooms.lock().unwrap_or_else(PoisonError::into_inner);
        rooms.values().filter(|h| !h.is_closed()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
