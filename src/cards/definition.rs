//! Card definitions - static card data.
//!
//! `Card` holds the immutable properties of a card as supplied by the
//! external catalog: cost, base stats, keywords and the optional effect
//! descriptor. What the effect means depends on the card type:
//!
//! - **Minion**: battlecry, resolved after the minion is on the board
//! - **Spell**: the spell itself
//! - **Weapon**: fires when the weapon is equipped
//!
//! Instance-specific data (damage taken, buffs, attacks used) lives in
//! [`MinionInstance`](super::MinionInstance) and
//! [`WeaponInstance`](super::WeaponInstance).

use serde::{Deserialize, Serialize};

use super::keywords::{Keyword, KeywordSet};
use crate::effects::EffectDescriptor;

/// Unique identifier for a card definition.
///
/// This identifies the "type" of card (e.g., "Fireball"),
/// not a specific copy in a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardType {
    Minion,
    Spell,
    Weapon,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rarity {
    #[default]
    Common,
    Rare,
    Epic,
    Legendary,
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use duel_ccg::cards::{Card, CardId, Keyword};
///
/// let guard = Card::minion(CardId::new(7), "Shieldbearer", 2, 1, 4)
///     .with_keyword(Keyword::Taunt);
///
/// assert!(guard.keywords.contains(Keyword::Taunt));
/// assert_eq!(guard.mana_cost, 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,

    pub name: String,

    #[serde(rename = "type")]
    pub card_type: CardType,

    #[serde(default)]
    pub rarity: Rarity,

    pub mana_cost: u8,

    /// Base attack (minions and weapons).
    #[serde(default)]
    pub attack: i32,

    /// Base health (minions).
    #[serde(default)]
    pub health: i32,

    /// Base durability (weapons).
    #[serde(default)]
    pub durability: i32,

    #[serde(default)]
    pub keywords: KeywordSet,

    /// Spell effect, battlecry or equip trigger.
    #[serde(default)]
    pub effect: Option<EffectDescriptor>,
}

impl Card {
    fn base(id: CardId, name: impl Into<String>, card_type: CardType, mana_cost: u8) -> Self {
        Self {
            id,
            name: name.into(),
            card_type,
            rarity: Rarity::Common,
            mana_cost,
            attack: 0,
            health: 0,
            durability: 0,
            keywords: KeywordSet::empty(),
            effect: None,
        }
    }

    /// Create a minion card.
    #[must_use]
    pub fn minion(id: CardId, name: impl Into<String>, mana_cost: u8, attack: i32, health: i32) -> Self {
        Self {
            attack,
            health,
            ..Self::base(id, name, CardType::Minion, mana_cost)
        }
    }

    /// Create a spell card.
    #[must_use]
    pub fn spell(id: CardId, name: impl Into<String>, mana_cost: u8, effect: EffectDescriptor) -> Self {
        Self {
            effect: Some(effect),
            ..Self::base(id, name, CardType::Spell, mana_cost)
        }
    }

    /// Create a weapon card.
    #[must_use]
    pub fn weapon(id: CardId, name: impl Into<String>, mana_cost: u8, attack: i32, durability: i32) -> Self {
        Self {
            attack,
            durability,
            ..Self::base(id, name, CardType::Weapon, mana_cost)
        }
    }

    /// Add a keyword (builder pattern).
    #[must_use]
    pub fn with_keyword(mut self, keyword: Keyword) -> Self {
        self.keywords.insert(keyword);
        self
    }

    /// Attach an effect (builder pattern).
    #[must_use]
    pub fn with_effect(mut self, effect: EffectDescriptor) -> Self {
        self.effect = Some(effect);
        self
    }

    #[must_use]
    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    #[must_use]
    pub fn is_minion(&self) -> bool {
        self.card_type == CardType::Minion
    }

    /// True when playing this card needs a caller-chosen target.
    #[must_use]
    pub fn needs_target(&self) -> bool {
        self.effect
            .as_ref()
            .is_some_and(|effect| effect.target.is_manual())
    }
}
