//! Effect definitions.
//!
//! Cards declare what they do with an [`EffectDescriptor`]: a kind plus a
//! target selector. Resolution turns a descriptor into atomic
//! [`EffectAction`]s, one per affected entity, which are applied in order.

use serde::{Deserialize, Serialize};

use super::targeting::TargetSelector;
use crate::cards::{CardId, KeywordSet};
use crate::core::{EntityId, Side};

/// A card's declared ability.
///
/// In catalog JSON:
///
/// ```
/// use duel_ccg::effects::{EffectDescriptor, EffectKind, TargetSelector};
///
/// let json = r#"{"kind": {"BUFF": {"attack": 1, "health": 1}}, "target": "ALL_OTHER_FRIENDLY_MINIONS"}"#;
/// let effect: EffectDescriptor = serde_json::from_str(json).unwrap();
///
/// assert_eq!(effect.kind, EffectKind::Buff { attack: 1, health: 1 });
/// assert_eq!(effect.target, TargetSelector::AllOtherFriendlyMinions);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectDescriptor {
    pub kind: EffectKind,
    #[serde(default)]
    pub target: TargetSelector,
}

impl EffectDescriptor {
    #[must_use]
    pub fn new(kind: EffectKind, target: TargetSelector) -> Self {
        Self { kind, target }
    }
}

/// What an effect does to each thing it reaches.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EffectKind {
    Buff { attack: i32, health: i32 },
    Damage { amount: i32 },
    Heal { amount: i32 },
    Draw { count: u32 },
    Summon { token: TokenSpec, count: u32 },
    Destroy,
    RefreshMana { amount: u8 },
}

/// A minion created by an effect rather than played from hand.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSpec {
    pub card_id: CardId,
    pub name: String,
    pub attack: i32,
    pub health: i32,
    #[serde(default)]
    pub keywords: KeywordSet,
}

impl TokenSpec {
    #[must_use]
    pub fn new(card_id: CardId, name: impl Into<String>, attack: i32, health: i32) -> Self {
        Self {
            card_id,
            name: name.into(),
            attack,
            health,
            keywords: KeywordSet::empty(),
        }
    }

    #[must_use]
    pub fn with_keywords(mut self, keywords: impl Into<KeywordSet>) -> Self {
        self.keywords = keywords.into();
        self
    }
}

/// An atomic state change.
///
/// Each action names its own target, so a batch can be applied one action
/// at a time and later actions see the results of earlier ones.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectAction {
    BuffMinion { minion: EntityId, attack: i32, health: i32 },
    DamageMinion { minion: EntityId, amount: i32 },
    DamageHero { side: Side, amount: i32 },
    HealMinion { minion: EntityId, amount: i32 },
    HealHero { side: Side, amount: i32 },
    DrawCards { side: Side, count: u32 },
    SummonMinion { side: Side, token: TokenSpec },
    DestroyMinion { minion: EntityId },
    RefreshMana { side: Side, amount: u8 },
}
