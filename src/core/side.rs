//! Side identification and per-side data storage.
//!
//! ## Side
//!
//! A match always has exactly two sides. They are labelled from the
//! simulation's own point of view: `Player` and `Opponent`. Network seats map
//! onto sides (seat A is `Player`, seat B is `Opponent`), and the session layer
//! swaps the labels when it renders a state for seat B.
//!
//! ## SideMap
//!
//! Per-side data storage with O(1) access, indexable by `Side`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two sides of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    Player,
    Opponent,
}

impl Side {
    /// Both sides, `Player` first.
    pub const BOTH: [Side; 2] = [Side::Player, Side::Opponent];

    /// The other side.
    #[must_use]
    pub const fn other(self) -> Side {
        match self {
            Side::Player => Side::Opponent,
            Side::Opponent => Side::Player,
        }
    }

    /// Get the raw side index (0 for `Player`, 1 for `Opponent`).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Side::Player => 0,
            Side::Opponent => 1,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Player => write!(f, "player"),
            Side::Opponent => write!(f, "opponent"),
        }
    }
}

/// Per-side data storage.
///
/// Serializes as `{ "player": .., "opponent": .. }`.
///
/// ## Example
///
/// ```
/// use duel_ccg::core::{Side, SideMap};
///
/// let mut health: SideMap<i32> = SideMap::with_value(30);
/// health[Side::Opponent] -= 4;
///
/// assert_eq!(health[Side::Player], 30);
/// assert_eq!(health[Side::Opponent], 26);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SideMap<T> {
    pub player: T,
    pub opponent: T,
}

impl<T> SideMap<T> {
    /// Create a new SideMap with values from a factory function.
    pub fn new(factory: impl Fn(Side) -> T) -> Self {
        Self {
            player: factory(Side::Player),
            opponent: factory(Side::Opponent),
        }
    }

    /// Create a new SideMap with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            player: value.clone(),
            opponent: value,
        }
    }

    /// Get a reference to a side's data.
    #[must_use]
    pub fn get(&self, side: Side) -> &T {
        match side {
            Side::Player => &self.player,
            Side::Opponent => &self.opponent,
        }
    }

    /// Get a mutable reference to a side's data.
    pub fn get_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Player => &mut self.player,
            Side::Opponent => &mut self.opponent,
        }
    }

    /// Mutable access to both sides at once, `(side, other)`.
    pub fn split_mut(&mut self, side: Side) -> (&mut T, &mut T) {
        match side {
            Side::Player => (&mut self.player, &mut self.opponent),
            Side::Opponent => (&mut self.opponent, &mut self.player),
        }
    }

    /// Exchange the two entries.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.player, &mut self.opponent);
    }

    /// Iterate over (Side, &T) pairs, `Player` first.
    pub fn iter(&self) -> impl Iterator<Item = (Side, &T)> {
        [(Side::Player, &self.player), (Side::Opponent, &self.opponent)].into_iter()
    }
}

impl<T> Index<Side> for SideMap<T> {
    type Output = T;

    fn index(&self, side: Side) -> &Self::Output {
        self.get(side)
    }
}

impl<T> IndexMut<Side> for SideMap<T> {
    fn index_mut(&mut self, side: Side) -> &mut Self::Output {
        self.get_mut(side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_other() {
        assert_eq!(Side::Player.other(), Side::Opponent);
        assert_eq!(Side::Opponent.other(), Side::Player);
        assert_eq!(Side::Player.other().other(), Side::Player);
    }

    #[test]
    fn test_side_serialization() {
        assert_eq!(serde_json::to_string(&Side::Player).unwrap(), "\"PLAYER\"");
        let side: Side = serde_json::from_str("\"OPPONENT\"").unwrap();
        assert_eq!(side, Side::Opponent);
    }

    #[test]
    fn test_side_map_new() {
        let map = SideMap::new(|s| s.index() * 10);

        assert_eq!(map[Side::Player], 0);
        assert_eq!(map[Side::Opponent], 10);
    }

    #[test]
    fn test_side_map_split_mut() {
        let mut map = SideMap::with_value(5);
        {
            let (mine, theirs) = map.split_mut(Side::Opponent);
            *mine += 1;
            *theirs -= 1;
        }

        assert_eq!(map[Side::Opponent], 6);
        assert_eq!(map[Side::Player], 4);
    }

    #[test]
    fn test_side_map_swap() {
        let mut map = SideMap { player: "a", opponent: "b" };
        map.swap();

        assert_eq!(map.player, "b");
        assert_eq!(map.opponent, "a");
    }

    #[test]
    fn test_side_map_iter() {
        let map = SideMap::new(|s| s);
        let pairs: Vec<_> = map.iter().collect();

        assert_eq!(pairs, vec![(Side::Player, &Side::Player), (Side::Opponent, &Side::Opponent)]);
    }

    #[test]
    fn test_side_map_serialization() {
        let map = SideMap { player: 1, opponent: 2 };
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"player":1,"opponent":2}"#);
        let deserialized: SideMap<i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, deserialized);
    }
}
