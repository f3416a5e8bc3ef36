//! The turn engine.
//!
//! `RulesEngine` is the surface the AI and the room drive: what is legal,
//! apply it, is it over. `TurnEngine` implements it for the two-hero
//! ruleset:
//!
//! - **Start of turn**: one more mana crystal (up to the cap), mana
//!   refilled, one card drawn, the side's minions and hero may attack again
//! - **Play card**: pay mana, place the minion / equip the weapon / cast
//!   the spell, then resolve the card's effect
//! - **Attack**: through the combat resolver
//! - **End of turn**: the other side starts its turn
//! - **Deaths**: checked after every action; a hero at zero health ends
//!   the match, both at once is a draw
//!
//! Every action is fully validated before anything changes, so a rejected
//! action leaves the state exactly as it was.

use tracing::{debug, info};

use crate::cards::{Card, CardType, MinionInstance, WeaponInstance};
use crate::combat::{Attacker, CombatOutcome, CombatResolver};
use crate::core::{
    ActionError, EntityId, GameAction, GameState, Phase, RulesConfig, Side, Target,
};
use crate::effects::{EffectContext, EffectResolver, TargetSelector};

/// Result of a completed game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameResult {
    Winner(Side),
    /// Both heroes fell together.
    Draw,
}

impl GameResult {
    /// Check if a side won.
    #[must_use]
    pub fn is_winner(&self, side: Side) -> bool {
        matches!(self, GameResult::Winner(s) if *s == side)
    }
}

/// Rules engine trait.
///
/// ## Implementation Notes
///
/// - `legal_actions`: empty when the side cannot act; otherwise always
///   contains `EndTurn`
/// - `apply_action`: deterministic given the state (the state carries its RNG)
/// - `is_terminal`: `None` while the game continues
pub trait RulesEngine {
    fn config(&self) -> &RulesConfig;

    /// Every rules-changing action `side` may take now. Selection actions
    /// are UI-only and not listed.
    fn legal_actions(&self, state: &GameState, side: Side) -> Vec<GameAction>;

    /// Apply an action for `side`. On error the state is unchanged.
    fn apply_action(&self, state: &mut GameState, side: Side, action: &GameAction) -> Result<(), ActionError>;

    fn is_terminal(&self, state: &GameState) -> Option<GameResult>;
}

/// Turn engine for the two-hero ruleset.
#[derive(Clone, Debug, Default)]
pub struct TurnEngine {
    config: RulesConfig,
}

impl TurnEngine {
    #[must_use]
    pub fn new(config: RulesConfig) -> Self {
        Self { config }
    }

    /// Deal opening hands and open the first turn.
    ///
    /// The side to move draws `opening_hand` cards, the other side one more.
    pub fn start_game(&self, state: &mut GameState) {
        let first = state.current_turn;
        for (side, count) in [
            (first, self.config.opening_hand),
            (first.other(), self.config.opening_hand + 1),
        ] {
            for _ in 0..count {
                state.player_mut(side).draw(&self.config);
            }
        }
        info!(first = %first, "game started");
        self.start_turn(state);
    }

    /// Open the current side's turn.
    pub fn start_turn(&self, state: &mut GameState) {
        let side = state.current_turn;
        let player = state.player_mut(side);
        player.begin_turn(&self.config);
        let outcome = player.draw(&self.config);
        debug!(%side, turn = state.turn_number, ?outcome, "turn started");
        self.check_deaths(state);
    }

    fn check_turn(state: &GameState, side: Side) -> Result<(), ActionError> {
        if state.phase == Phase::GameOver {
            return Err(ActionError::GameOver);
        }
        if state.current_turn != side {
            return Err(ActionError::NotYourTurn);
        }
        Ok(())
    }

    /// Play a card from `side`'s hand.
    ///
    /// Minions go to `position` (clamped, default rightmost). A card whose
    /// effect needs a manual target requires one; a minion or weapon whose
    /// battlecry has nothing to aim at may be played without one. A
    /// minion's battlecry may aim at the minion itself.
    pub fn play_card(
        &self,
        state: &mut GameState,
        side: Side,
        instance_id: EntityId,
        position: Option<usize>,
        target: Option<Target>,
    ) -> Result<(), ActionError> {
        Self::check_turn(state, side)?;
        let player = state.player(side);
        let index = player
            .hand_index(instance_id)
            .ok_or(ActionError::CardNotInHand(instance_id))?;
        let card = &player.hand[index].card;

        if card.mana_cost > player.mana {
            return Err(ActionError::NotEnoughMana {
                needed: card.mana_cost,
                available: player.mana,
            });
        }
        if card.card_type == CardType::Minion && player.board.len() >= self.config.max_board {
            return Err(ActionError::BoardFull);
        }
        let target = match &card.effect {
            Some(effect) if effect.target.is_manual() => match target {
                Some(t) if Self::play_targets(state, side, instance_id, card, effect.target).contains(&t) => {
                    Some(t)
                }
                Some(_) => return Err(ActionError::InvalidTarget),
                None if card.card_type != CardType::Spell
                    && Self::play_targets(state, side, instance_id, card, effect.target).is_empty() =>
                {
                    None
                }
                None => return Err(ActionError::TargetRequired),
            },
            _ => target,
        };

        // Validated; from here on the play happens.
        let player = state.player_mut(side);
        let instance = player.hand.remove(index);
        player.mana -= instance.card.mana_cost;
        let card = instance.card;

        let mut ctx = EffectContext::new(side).with_target(target);
        match card.card_type {
            CardType::Minion => {
                let slot = position.unwrap_or(player.board.len()).min(player.board.len());
                player.board.insert(slot, MinionInstance::summon(instance.id, &card));
                ctx = ctx.with_source(instance.id);
            }
            CardType::Weapon => {
                player.weapon = Some(WeaponInstance::equip(instance.id, &card));
            }
            CardType::Spell => {}
        }
        state.selected_card = None;
        debug!(%side, card = %card.name, id = %instance.id, "card played");

        if let Some(effect) = &card.effect {
            let actions = EffectResolver::resolve(state, effect, &ctx);
            EffectResolver::apply(state, &self.config, &actions);
        }
        self.check_deaths(state);
        Ok(())
    }

    /// Attack with a friendly minion.
    pub fn attack(
        &self,
        state: &mut GameState,
        side: Side,
        attacker_id: EntityId,
        target: Target,
    ) -> Result<CombatOutcome, ActionError> {
        Self::check_turn(state, side)?;
        let outcome = CombatResolver::attack(state, side, Attacker::Minion(attacker_id), target)?;
        state.selected_minion = None;
        self.check_deaths(state);
        Ok(outcome)
    }

    /// Attack with the hero's weapon.
    pub fn hero_attack(
        &self,
        state: &mut GameState,
        side: Side,
        target: Target,
    ) -> Result<CombatOutcome, ActionError> {
        Self::check_turn(state, side)?;
        let outcome = CombatResolver::attack(state, side, Attacker::Hero, target)?;
        self.check_deaths(state);
        Ok(outcome)
    }

    /// Pass the turn to the other side.
    pub fn end_turn(&self, state: &mut GameState, side: Side) -> Result<(), ActionError> {
        Self::check_turn(state, side)?;
        state.clear_selection();
        state.current_turn = side.other();
        state.turn_number += 1;
        self.start_turn(state);
        Ok(())
    }

    /// Remove dead minions and broken weapons; end the match if a hero fell.
    pub fn check_deaths(&self, state: &mut GameState) {
        for side in Side::BOTH {
            let player = state.player_mut(side);
            let before = player.board.len();
            player.board.retain(|m| !m.is_dead());
            if player.board.len() != before {
                debug!(%side, died = before - player.board.len(), "minions died");
            }
            if player.weapon.as_ref().is_some_and(WeaponInstance::is_broken) {
                player.weapon = None;
            }
        }

        if state.phase == Phase::GameOver {
            return;
        }
        let fallen: Vec<Side> = Side::BOTH
            .into_iter()
            .filter(|&side| state.player(side).is_dead())
            .collect();
        let winner = match fallen.as_slice() {
            [] => return,
            [loser] => Some(loser.other()),
            _ => None,
        };
        info!(winner = ?winner, turn = state.turn_number, "game over");
        state.finish(winner);
    }

    fn select(state: &mut GameState, side: Side, action: &GameAction) -> Result<(), ActionError> {
        Self::check_turn(state, side)?;
        match *action {
            GameAction::SelectCard { instance_id } => {
                if state.player(side).hand_index(instance_id).is_none() {
                    return Err(ActionError::CardNotInHand(instance_id));
                }
                state.selected_card = Some(instance_id);
            }
            GameAction::DeselectCard => state.selected_card = None,
            GameAction::SelectMinion { minion_id } => {
                if state.player(side).minion(minion_id).is_none() {
                    return Err(ActionError::MinionNotFound(minion_id));
                }
                state.selected_minion = Some(minion_id);
            }
            GameAction::DeselectMinion => state.selected_minion = None,
            _ => {}
        }
        Ok(())
    }

    /// Targets a manual effect on `card` may take when it is played.
    ///
    /// A minion counts itself: it is on the board by the time its
    /// battlecry resolves.
    fn play_targets(
        state: &GameState,
        side: Side,
        instance_id: EntityId,
        card: &Card,
        selector: TargetSelector,
    ) -> Vec<Target> {
        let mut targets = selector.candidates(state, side);
        if card.card_type == CardType::Minion && selector.reaches_played_minion() {
            targets.push(Target::Minion(instance_id));
        }
        targets
    }

    fn card_plays(&self, state: &GameState, side: Side, out: &mut Vec<GameAction>) {
        let player = state.player(side);
        for instance in player.hand.iter() {
            let card = &instance.card;
            if card.mana_cost > player.mana {
                continue;
            }
            if card.card_type == CardType::Minion && player.board.len() >= self.config.max_board {
                continue;
            }
            match &card.effect {
                Some(effect) if effect.target.is_manual() => {
                    let candidates = Self::play_targets(state, side, instance.id, card, effect.target);
                    if candidates.is_empty() {
                        if card.card_type != CardType::Spell {
                            out.push(GameAction::play(instance.id));
                        }
                    } else {
                        out.extend(candidates.into_iter().map(|t| GameAction::play_at(instance.id, t)));
                    }
                }
                _ => out.push(GameAction::play(instance.id)),
            }
        }
    }
}

impl RulesEngine for TurnEngine {
    fn config(&self) -> &RulesConfig {
        &self.config
    }

    fn legal_actions(&self, state: &GameState, side: Side) -> Vec<GameAction> {
        if Self::check_turn(state, side).is_err() {
            return Vec::new();
        }
        let mut actions = Vec::new();
        self.card_plays(state, side, &mut actions);

        for minion in state.player(side).board.iter() {
            for target in CombatResolver::legal_targets(state, side, Attacker::Minion(minion.id)) {
                actions.push(GameAction::Attack {
                    attacker_id: minion.id,
                    target_id: target,
                });
            }
        }
        for target in CombatResolver::legal_targets(state, side, Attacker::Hero) {
            actions.push(GameAction::HeroAttack { target_id: target });
        }

        actions.push(GameAction::EndTurn);
        actions
    }

    fn apply_action(&self, state: &mut GameState, side: Side, action: &GameAction) -> Result<(), ActionError> {
        let result = match *action {
            GameAction::PlayCard {
                instance_id,
                position,
                target_id,
            } => self.play_card(state, side, instance_id, position, target_id),
            GameAction::Attack {
                attacker_id,
                target_id,
            } => self.attack(state, side, attacker_id, target_id).map(|_| ()),
            GameAction::HeroAttack { target_id } => self.hero_attack(state, side, target_id).map(|_| ()),
            GameAction::EndTurn => self.end_turn(state, side),
            _ => Self::select(state, side, action),
        };
        if let Err(err) = &result {
            debug!(%side, ?action, %err, "action rejected");
        }
        result
    }

    fn is_terminal(&self, state: &GameState) -> Option<GameResult> {
        if state.phase != Phase::GameOver {
            return None;
        }
        Some(match state.winner {
            Some(side) => GameResult::Winner(side),
            None => GameResult::Draw,
        })
    }
}
