//! Entity identification system.
//!
//! Every card instance, minion and weapon in a match has a unique `EntityId`.
//! Heroes are not entities; they are addressed by [`Side`](super::Side).
//!
//! ## ID Layout
//!
//! IDs are allocated sequentially by the owning `GameState`, starting at
//! [`EntityId::FIRST`]. A card keeps its id when it moves from deck to hand
//! and from hand to the board, so a played minion carries the id of the
//! card instance it came from.
//!
//! ```
//! use duel_ccg::core::EntityId;
//!
//! let mut alloc = EntityId::FIRST;
//! let a = alloc.bump();
//! let b = alloc.bump();
//! assert_eq!(a, EntityId(1));
//! assert_eq!(b, EntityId(2));
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for a card instance, minion or weapon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// First id handed out by a fresh allocator.
    pub const FIRST: EntityId = EntityId(1);

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Return the current id and advance the allocator.
    ///
    /// `GameState` stores the next free id as an `EntityId` and calls this
    /// whenever it mints a card instance or token.
    pub fn bump(&mut self) -> EntityId {
        let id = *self;
        self.0 += 1;
        id
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bump_is_sequential() {
        let mut alloc = EntityId::FIRST;
        let ids: Vec<_> = (0..4).map(|_| alloc.bump()).collect();

        assert_eq!(ids, vec![EntityId(1), EntityId(2), EntityId(3), EntityId(4)]);
        assert_eq!(alloc, EntityId(5));
    }

    #[test]
    fn test_ordering() {
        assert!(EntityId(3) < EntityId(10));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", EntityId(42)), "Entity(42)");
    }

    #[test]
    fn test_serialization() {
        let id = EntityId(123);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "123");
        let deserialized: EntityId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
