//! Lethal search.
//!
//! A depth-first search over this turn's attacks and plays looking for a
//! line that kills the enemy hero before the turn ends. The search is
//! bounded by a node budget and skips any branch where even the most
//! optimistic damage count cannot reach the enemy's health and armor.

use tracing::debug;

use crate::cards::{CardType, Keyword};
use crate::core::{GameAction, GameState, Side, Target};
use crate::effects::{EffectKind, TargetSelector};
use crate::rules::RulesEngine;

/// Bounded DFS for a kill this turn.
#[derive(Clone, Copy, Debug)]
pub struct LethalSearch {
    budget: usize,
}

impl LethalSearch {
    #[must_use]
    pub fn new(budget: usize) -> Self {
        Self { budget }
    }

    #[must_use]
    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Find a sequence of actions that wins the game for `side` this turn.
    ///
    /// Returns `None` when no line exists or the budget ran out first.
    pub fn find<E: RulesEngine>(&self, engine: &E, state: &GameState, side: Side) -> Option<Vec<GameAction>> {
        if self.budget == 0 || state.current_turn != side || state.is_over() {
            return None;
        }
        let mut line = Vec::new();
        let mut nodes = 0;
        let found = self.dfs(engine, state, side, &mut line, &mut nodes);
        debug!(%side, nodes, found, "lethal search");
        found.then_some(line)
    }

    fn dfs<E: RulesEngine>(
        &self,
        engine: &E,
        state: &GameState,
        side: Side,
        line: &mut Vec<GameAction>,
        nodes: &mut usize,
    ) -> bool {
        let enemy = state.player(side.other());
        if let Some(bound) = max_face_damage(state, side) {
            if bound < enemy.health + enemy.armor {
                return false;
            }
        }

        for action in candidates(engine, state, side) {
            if *nodes >= self.budget {
                return false;
            }
            *nodes += 1;

            let mut next = state.clone();
            if engine.apply_action(&mut next, side, &action).is_err() {
                continue;
            }
            line.push(action);
            match engine.is_terminal(&next) {
                Some(result) if result.is_winner(side) => return true,
                Some(_) => {}
                None => {
                    if self.dfs(engine, &next, side, line, nodes) {
                        return true;
                    }
                }
            }
            line.pop();
        }
        false
    }
}

impl Default for LethalSearch {
    fn default() -> Self {
        Self::new(1_000)
    }
}

/// Actions worth trying when looking for lethal, face hits first.
///
/// Vanilla minions without Charge or Rush cannot add damage this turn and
/// are left out.
fn candidates<E: RulesEngine>(engine: &E, state: &GameState, side: Side) -> Vec<GameAction> {
    let face = Target::Hero(side.other());
    let player = state.player(side);
    let mut actions: Vec<GameAction> = engine
        .legal_actions(state, side)
        .into_iter()
        .filter(|action| match action {
            GameAction::EndTurn => false,
            GameAction::PlayCard { instance_id, .. } => player
                .hand_index(*instance_id)
                .map(|i| &player.hand[i].card)
                .is_some_and(|card| {
                    card.card_type != CardType::Minion
                        || card.effect.is_some()
                        || card.keywords.contains(Keyword::Charge)
                        || card.keywords.contains(Keyword::Rush)
                }),
            _ => true,
        })
        .collect();
    actions.sort_by_key(|action| match action {
        GameAction::Attack { target_id, .. } | GameAction::HeroAttack { target_id } if *target_id == face => 0,
        GameAction::PlayCard { .. } => 1,
        _ => 2,
    });
    actions
}

/// Upper bound on the damage `side` can put on the enemy hero this turn.
///
/// Ignores Taunt and the mana shared between cards. `None` when the hand
/// holds something whose contribution cannot be bounded cheaply (buffs,
/// summons, card draw, mana refresh).
#[must_use]
pub fn max_face_damage(state: &GameState, side: Side) -> Option<i32> {
    let player = state.player(side);
    let mut total = 0;

    for minion in player.board.iter() {
        if minion.ready() && !minion.restricted_to_minions() {
            total += minion.attack * i32::from(minion.max_attacks() - minion.attacks_this_turn);
        }
    }
    if let Some(weapon) = &player.weapon {
        let swings = weapon.max_attacks().saturating_sub(player.hero_attacks_this_turn);
        total += weapon.attack * i32::from(swings).min(weapon.durability.max(0));
    }

    for instance in player.hand.iter() {
        let card = &instance.card;
        if card.mana_cost > player.mana {
            continue;
        }
        let swings = if card.keywords.contains(Keyword::Windfury) { 2 } else { 1 };
        match card.card_type {
            CardType::Minion if card.keywords.contains(Keyword::Charge) => total += card.attack * swings,
            CardType::Weapon => total += card.attack * swings.min(card.durability.max(0)),
            _ => {}
        }
        if let Some(effect) = &card.effect {
            match effect.kind {
                EffectKind::Damage { amount } if can_hit_enemy_hero(effect.target) => total += amount,
                EffectKind::Damage { .. } | EffectKind::Heal { .. } | EffectKind::Destroy => {}
                EffectKind::Buff { .. }
                | EffectKind::Draw { .. }
                | EffectKind::Summon { .. }
                | EffectKind::RefreshMana { .. } => return None,
            }
        }
    }
    Some(total)
}

fn can_hit_enemy_hero(selector: TargetSelector) -> bool {
    matches!(
        selector,
        TargetSelector::None
            | TargetSelector::AnyCharacter
            | TargetSelector::EnemyHero
            | TargetSelector::RandomEnemyCharacter
    )
}
