//! Keyword abilities and per-instance keyword sets.
//!
//! `KeywordSet` is a bitmask over the fixed keyword universe. Every minion
//! and weapon owns its own copy, independent of the card template, so a
//! keyword can be granted or consumed on one instance without touching
//! the catalog.
//!
//! On the wire and in storage the set is a plain array sorted in
//! declaration order, and it rehydrates to set semantics on load
//! (duplicates collapse):
//!
//! ```
//! use duel_ccg::cards::{Keyword, KeywordSet};
//!
//! let set: KeywordSet = serde_json::from_str(r#"["WINDFURY","TAUNT","TAUNT"]"#).unwrap();
//! assert!(set.contains(Keyword::Taunt));
//! assert_eq!(set.len(), 2);
//! assert_eq!(serde_json::to_string(&set).unwrap(), r#"["TAUNT","WINDFURY"]"#);
//! ```

use serde::{Deserialize, Serialize};

/// A keyword ability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Keyword {
    /// Must be attacked before any other enemy target.
    Taunt,
    /// Negates the first damage instance, then breaks.
    DivineShield,
    /// May attack minions the turn it is played.
    Rush,
    /// May attack anything the turn it is played.
    Charge,
    /// Two attacks per turn.
    Windfury,
    /// Damage dealt also heals the owner's hero.
    Lifesteal,
}

impl Keyword {
    /// Every keyword, in declaration order.
    pub const ALL: [Keyword; 6] = [
        Keyword::Taunt,
        Keyword::DivineShield,
        Keyword::Rush,
        Keyword::Charge,
        Keyword::Windfury,
        Keyword::Lifesteal,
    ];

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// A set of keywords stored as a bitmask.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<Keyword>", into = "Vec<Keyword>")]
pub struct KeywordSet(u8);

impl KeywordSet {
    /// The empty set.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Check membership.
    #[must_use]
    pub const fn contains(self, keyword: Keyword) -> bool {
        self.0 & keyword.bit() != 0
    }

    /// Add a keyword. Returns true if it was not already present.
    pub fn insert(&mut self, keyword: Keyword) -> bool {
        let added = !self.contains(keyword);
        self.0 |= keyword.bit();
        added
    }

    /// Remove a keyword. Returns true if it was present.
    pub fn remove(&mut self, keyword: Keyword) -> bool {
        let present = self.contains(keyword);
        self.0 &= !keyword.bit();
        present
    }

    /// Add a keyword (builder pattern).
    #[must_use]
    pub fn with(mut self, keyword: Keyword) -> Self {
        self.insert(keyword);
        self
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterate in declaration order.
    pub fn iter(self) -> impl Iterator<Item = Keyword> {
        Keyword::ALL.into_iter().filter(move |k| self.contains(*k))
    }
}

impl FromIterator<Keyword> for KeywordSet {
    fn from_iter<I: IntoIterator<Item = Keyword>>(iter: I) -> Self {
        let mut set = KeywordSet::empty();
        for keyword in iter {
            set.insert(keyword);
        }
        set
    }
}

impl From<Vec<Keyword>> for KeywordSet {
    fn from(keywords: Vec<Keyword>) -> Self {
        keywords.into_iter().collect()
    }
}

impl From<KeywordSet> for Vec<Keyword> {
    fn from(set: KeywordSet) -> Self {
        set.iter().collect()
    }
}

impl<const N: usize> From<[Keyword; N]> for KeywordSet {
    fn from(keywords: [Keyword; N]) -> Self {
        keywords.into_iter().collect()
    }
}
