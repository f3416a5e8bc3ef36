//! Card, minion and weapon instances - runtime card state.
//!
//! - `CardInstance`: a copy of a catalog card sitting in a deck or hand
//! - `MinionInstance`: a minion on the board, with current stats
//! - `WeaponInstance`: the weapon a hero has equipped
//!
//! Minions and weapons copy the template's keyword set on creation and
//! mutate their own copy from then on.

use serde::{Deserialize, Serialize};

use super::definition::{Card, CardId};
use super::keywords::{Keyword, KeywordSet};
use crate::core::EntityId;
use crate::effects::TokenSpec;

/// A unique-id'd copy of a card living in a deck or hand.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardInstance {
    pub id: EntityId,
    pub card: Card,
}

impl CardInstance {
    #[must_use]
    pub fn new(id: EntityId, card: Card) -> Self {
        Self { id, card }
    }
}

/// A minion on the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinionInstance {
    pub id: EntityId,
    pub card_id: CardId,
    pub name: String,
    pub attack: i32,
    pub health: i32,
    pub max_health: i32,
    pub keywords: KeywordSet,
    pub has_divine_shield: bool,
    /// False the turn it enters play unless it has Rush or Charge.
    pub can_attack: bool,
    pub attacks_this_turn: u8,
    /// Set until its owner's next turn starts. Rush minions cannot attack
    /// heroes while this is set.
    pub summoned_this_turn: bool,
}

impl MinionInstance {
    /// Bring a minion card into play.
    #[must_use]
    pub fn summon(id: EntityId, card: &Card) -> Self {
        Self::fresh(id, card.id, card.name.clone(), card.attack, card.health, card.keywords)
    }

    /// Bring a token into play.
    #[must_use]
    pub fn from_token(id: EntityId, token: &TokenSpec) -> Self {
        Self::fresh(id, token.card_id, token.name.clone(), token.attack, token.health, token.keywords)
    }

    fn fresh(id: EntityId, card_id: CardId, name: String, attack: i32, health: i32, keywords: KeywordSet) -> Self {
        Self {
            id,
            card_id,
            name,
            attack,
            health,
            max_health: health,
            keywords,
            has_divine_shield: keywords.contains(Keyword::DivineShield),
            can_attack: keywords.contains(Keyword::Rush) || keywords.contains(Keyword::Charge),
            attacks_this_turn: 0,
            summoned_this_turn: true,
        }
    }

    #[must_use]
    pub fn has_keyword(&self, keyword: Keyword) -> bool {
        self.keywords.contains(keyword)
    }

    /// Attacks allowed per turn: two with Windfury, otherwise one.
    #[must_use]
    pub fn max_attacks(&self) -> u8 {
        if self.has_keyword(Keyword::Windfury) { 2 } else { 1 }
    }

    /// True when the minion may still declare an attack this turn.
    #[must_use]
    pub fn ready(&self) -> bool {
        self.can_attack && self.attack > 0 && self.attacks_this_turn < self.max_attacks()
    }

    /// True while the only thing keeping it off heroes is Rush.
    #[must_use]
    pub fn restricted_to_minions(&self) -> bool {
        self.summoned_this_turn && !self.has_keyword(Keyword::Charge)
    }

    /// Apply one damage instance. Returns the damage actually dealt.
    ///
    /// Divine Shield absorbs the whole instance, whatever its size, and
    /// breaks.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        if amount <= 0 {
            return 0;
        }
        if self.has_divine_shield {
            self.has_divine_shield = false;
            self.keywords.remove(Keyword::DivineShield);
            return 0;
        }
        self.health -= amount;
        amount
    }

    /// Restore health up to max health. Returns the amount restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let restored = amount.max(0).min(self.max_health - self.health).max(0);
        self.health += restored;
        restored
    }

    /// Raise (or lower) attack and health. Health buffs raise max health too.
    pub fn buff(&mut self, attack: i32, health: i32) {
        self.attack = (self.attack + attack).max(0);
        self.max_health += health;
        self.health += health;
        if self.health > self.max_health {
            self.health = self.max_health;
        }
    }

    /// Open a new turn for this minion's owner.
    pub fn refresh(&mut self) {
        self.can_attack = true;
        self.attacks_this_turn = 0;
        self.summoned_this_turn = false;
    }

    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }
}

/// The weapon a hero has equipped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponInstance {
    pub id: EntityId,
    pub card_id: CardId,
    pub name: String,
    pub attack: i32,
    pub durability: i32,
    pub keywords: KeywordSet,
}

impl WeaponInstance {
    #[must_use]
    pub fn equip(id: EntityId, card: &Card) -> Self {
        Self {
            id,
            card_id: card.id,
            name: card.name.clone(),
            attack: card.attack,
            durability: card.durability,
            keywords: card.keywords,
        }
    }

    #[must_use]
    pub fn has_keyword(&self, keyword: Keyword) -> bool {
        self.keywords.contains(keyword)
    }

    #[must_use]
    pub fn max_attacks(&self) -> u8 {
        if self.has_keyword(Keyword::Windfury) { 2 } else { 1 }
    }

    #[must_use]
    pub fn is_broken(&self) -> bool {
        self.durability <= 0
    }
}
