//! Effect targeting.
//!
//! A [`TargetSelector`] says which characters a card effect reaches.
//! Manual selectors take the target the player picked; the rest resolve
//! against the board (every minion on a side, or one at random).

use serde::{Deserialize, Serialize};

use crate::core::{GameState, Side, Target};

/// How an effect picks what it affects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetSelector {
    /// No target resolution. Resources go to the caster; damage and
    /// healing reach every character; buffs and destroys every minion.
    #[default]
    None,

    // === Every minion on a side ===
    AllFriendlyMinions,
    AllEnemyMinions,
    /// Every friendly minion except the one that carries the effect.
    AllOtherFriendlyMinions,

    // === Manual ===
    FriendlyMinion,
    EnemyMinion,
    AnyCharacter,
    EnemyHero,
    FriendlyHero,

    // === One at random ===
    RandomFriendlyMinion,
    RandomEnemyMinion,
    RandomEnemyCharacter,
}

impl TargetSelector {
    /// True when the caller must supply the target.
    #[must_use]
    pub fn is_manual(self) -> bool {
        matches!(
            self,
            TargetSelector::FriendlyMinion
                | TargetSelector::EnemyMinion
                | TargetSelector::AnyCharacter
                | TargetSelector::EnemyHero
                | TargetSelector::FriendlyHero
        )
    }

    /// True when a minion's battlecry may aim at the minion itself.
    ///
    /// The played minion is on the board before its battlecry resolves,
    /// so selectors that reach friendly minions reach it too.
    #[must_use]
    pub fn reaches_played_minion(self) -> bool {
        matches!(self, TargetSelector::FriendlyMinion | TargetSelector::AnyCharacter)
    }

    /// Check a manual target against this selector for a caster.
    ///
    /// The target must exist; non-manual selectors accept nothing.
    #[must_use]
    pub fn accepts(self, state: &GameState, caster: Side, target: Target) -> bool {
        let enemy = caster.other();
        match (self, target) {
            (TargetSelector::FriendlyMinion, Target::Minion(id)) => {
                state.player(caster).minion(id).is_some()
            }
            (TargetSelector::EnemyMinion, Target::Minion(id)) => {
                state.player(enemy).minion(id).is_some()
            }
            (TargetSelector::AnyCharacter, Target::Minion(id)) => state.minion(id).is_some(),
            (TargetSelector::AnyCharacter, Target::Hero(_)) => true,
            (TargetSelector::EnemyHero, Target::Hero(side)) => side == enemy,
            (TargetSelector::FriendlyHero, Target::Hero(side)) => side == caster,
            _ => false,
        }
    }

    /// Every target a manual selector would accept, in board order
    /// (friendly minions, enemy minions, friendly hero, enemy hero).
    #[must_use]
    pub fn candidates(self, state: &GameState, caster: Side) -> Vec<Target> {
        if !self.is_manual() {
            return Vec::new();
        }
        let enemy = caster.other();
        let minions = [caster, enemy]
            .into_iter()
            .flat_map(|side| state.player(side).board.iter().map(|m| Target::Minion(m.id)));
        let heroes = [Target::Hero(caster), Target::Hero(enemy)].into_iter();
        minions
            .chain(heroes)
            .filter(|&target| self.accepts(state, caster, target))
            .collect()
    }
}
