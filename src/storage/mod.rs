//! Checkpoint storage.
//!
//! Rooms checkpoint a `RoomSnapshot` under `room:<CODE>` after every
//! applied action; the lobby stores its presence map under
//! `lobby:presence`. Values are bincode. Storage failures are logged by the
//! callers and never take an actor down.

mod error;
mod file;
mod memory;
mod traits;

pub use error::{Result, StorageError};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use traits::{room_key, SnapshotStore, SnapshotStoreExt, LOBBY_PRESENCE_KEY};
