//! Game actions: the closed set of things a side can ask the engine to do.
//!
//! Actions travel over the wire inside `ACTION` messages, so the enum is
//! tagged by `type` with camelCase payload fields:
//!
//! ```
//! use duel_ccg::core::{EntityId, GameAction, Side, Target};
//!
//! let json = r#"{"type":"ATTACK","attackerId":7,"targetId":{"hero":"OPPONENT"}}"#;
//! let action: GameAction = serde_json::from_str(json).unwrap();
//!
//! assert_eq!(
//!     action,
//!     GameAction::Attack { attacker_id: EntityId(7), target_id: Target::Hero(Side::Opponent) },
//! );
//! ```

use serde::{Deserialize, Serialize};

use super::entity::EntityId;
use super::side::Side;

/// A character that can be targeted: a hero or a minion.
///
/// Hero targets name the side they belong to, always from the engine's
/// own point of view. Serialized as `{"hero": "PLAYER"}` or `{"minion": 7}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Hero(Side),
    Minion(EntityId),
}

impl Target {
    #[must_use]
    pub fn is_hero(self) -> bool {
        matches!(self, Target::Hero(_))
    }

    #[must_use]
    pub fn minion_id(self) -> Option<EntityId> {
        match self {
            Target::Minion(id) => Some(id),
            Target::Hero(_) => None,
        }
    }

    /// The same target seen from the other seat.
    #[must_use]
    pub fn mirrored(self) -> Self {
        match self {
            Target::Hero(side) => Target::Hero(side.other()),
            minion => minion,
        }
    }
}

/// An action a side submits on its turn.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE", rename_all_fields = "camelCase")]
pub enum GameAction {
    /// Play a card from hand. `position` places a minion on the board
    /// (clamped, default rightmost); `target_id` feeds manual targeting.
    PlayCard {
        instance_id: EntityId,
        #[serde(default)]
        position: Option<usize>,
        #[serde(default)]
        target_id: Option<Target>,
    },

    SelectCard {
        instance_id: EntityId,
    },

    DeselectCard,

    SelectMinion {
        minion_id: EntityId,
    },

    DeselectMinion,

    /// Attack with a friendly minion.
    Attack {
        attacker_id: EntityId,
        target_id: Target,
    },

    /// Attack with the hero's weapon.
    HeroAttack {
        target_id: Target,
    },

    EndTurn,
}

impl GameAction {
    /// Shorthand for playing a card with no position or target.
    #[must_use]
    pub fn play(instance_id: EntityId) -> Self {
        Self::PlayCard {
            instance_id,
            position: None,
            target_id: None,
        }
    }

    /// Shorthand for playing a card at a manual target.
    #[must_use]
    pub fn play_at(instance_id: EntityId, target: Target) -> Self {
        Self::PlayCard {
            instance_id,
            position: None,
            target_id: Some(target),
        }
    }

    /// True for actions that only move the UI selection.
    #[must_use]
    pub fn is_selection(&self) -> bool {
        matches!(
            self,
            GameAction::SelectCard { .. }
                | GameAction::DeselectCard
                | GameAction::SelectMinion { .. }
                | GameAction::DeselectMinion
        )
    }

    /// The same action with every hero target seen from the other seat.
    #[must_use]
    pub fn mirrored(&self) -> Self {
        match self.clone() {
            GameAction::PlayCard {
                instance_id,
                position,
                target_id,
            } => GameAction::PlayCard {
                instance_id,
                position,
                target_id: target_id.map(Target::mirrored),
            },
            GameAction::Attack {
                attacker_id,
                target_id,
            } => GameAction::Attack {
                attacker_id,
                target_id: target_id.mirrored(),
            },
            GameAction::HeroAttack { target_id } => GameAction::HeroAttack {
                target_id: target_id.mirrored(),
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_json() {
        assert_eq!(
            serde_json::to_string(&Target::Hero(Side::Player)).unwrap(),
            r#"{"hero":"PLAYER"}"#
        );
        assert_eq!(serde_json::to_string(&Target::Minion(EntityId(4))).unwrap(), r#"{"minion":4}"#);
    }

    #[test]
    fn test_play_card_optional_fields() {
        let action: GameAction = serde_json::from_str(r#"{"type":"PLAY_CARD","instanceId":3}"#).unwrap();
        assert_eq!(action, GameAction::play(EntityId(3)));

        let action: GameAction = serde_json::from_str(
            r#"{"type":"PLAY_CARD","instanceId":3,"position":0,"targetId":{"minion":9}}"#,
        )
        .unwrap();
        assert_eq!(
            action,
            GameAction::PlayCard {
                instance_id: EntityId(3),
                position: Some(0),
                target_id: Some(Target::Minion(EntityId(9))),
            }
        );
    }

    #[test]
    fn test_unit_variants() {
        assert_eq!(serde_json::to_string(&GameAction::EndTurn).unwrap(), r#"{"type":"END_TURN"}"#);
        let action: GameAction = serde_json::from_str(r#"{"type":"DESELECT_MINION"}"#).unwrap();
        assert!(action.is_selection());
    }

    #[test]
    fn test_mirrored_swaps_hero_targets_only() {
        let attack = GameAction::Attack {
            attacker_id: EntityId(2),
            target_id: Target::Hero(Side::Opponent),
        };
        assert_eq!(
            attack.mirrored(),
            GameAction::Attack {
                attacker_id: EntityId(2),
                target_id: Target::Hero(Side::Player),
            }
        );

        let at_minion = GameAction::play_at(EntityId(1), Target::Minion(EntityId(5)));
        assert_eq!(at_minion.mirrored(), at_minion);
        assert_eq!(GameAction::EndTurn.mirrored(), GameAction::EndTurn);
    }
}
