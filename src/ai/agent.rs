//! The AI player.
//!
//! `AiAgent` picks one action at a time:
//!
//! 1. If lethal seeking is on, search for a kill this turn and take its
//!    first step.
//! 2. Otherwise try every legal action on a cloned state and score the
//!    result. Actions that beat the current score are profitable.
//! 3. With probability `mistake_chance` take a random profitable action,
//!    else the best one. With nothing profitable, end the turn.
//!
//! Cloning is cheap because hand, deck and board are persistent vectors.

use tracing::{debug, trace};

use crate::core::{ActionError, GameAction, GameRng, GameState, Side};
use crate::rules::RulesEngine;

use super::lethal::LethalSearch;
use super::profile::{Difficulty, DifficultyProfile};
use super::scoring::Evaluator;

/// Actions an agent takes in one turn before it is made to pass.
pub const DEFAULT_MAX_ACTIONS: usize = 64;

/// Plays one side of a match.
#[derive(Clone, Debug)]
pub struct AiAgent {
    evaluator: Evaluator,
    lethal: Option<LethalSearch>,
    rng: GameRng,
    max_actions: usize,
}

impl AiAgent {
    /// Create an agent. `seed` drives its mistakes, not the game.
    #[must_use]
    pub fn new(profile: DifficultyProfile, seed: u64) -> Self {
        let lethal = profile
            .lethal_seeking
            .then(|| LethalSearch::new(profile.lethal_search_budget));
        Self {
            evaluator: Evaluator::new(profile),
            lethal,
            rng: GameRng::new(seed),
            max_actions: DEFAULT_MAX_ACTIONS,
        }
    }

    #[must_use]
    pub fn from_difficulty(difficulty: Difficulty, seed: u64) -> Self {
        Self::new(difficulty.profile(), seed)
    }

    /// Cap the actions taken per turn (builder pattern).
    #[must_use]
    pub fn with_max_actions(mut self, max_actions: usize) -> Self {
        self.max_actions = max_actions.max(1);
        self
    }

    #[must_use]
    pub fn profile(&self) -> &DifficultyProfile {
        self.evaluator.profile()
    }

    /// Choose the next action for `side`.
    ///
    /// Returns `None` when `side` cannot act (not its turn, or game over).
    pub fn next_action<E: RulesEngine>(&mut self, engine: &E, state: &GameState, side: Side) -> Option<GameAction> {
        let legal = engine.legal_actions(state, side);
        if legal.is_empty() {
            return None;
        }

        if let Some(search) = &self.lethal {
            if let Some(first) = search.find(engine, state, side).and_then(|line| line.into_iter().next()) {
                debug!(%side, action = ?first, "lethal found");
                return Some(first);
            }
        }

        let baseline = self.evaluator.score(state, side);
        let mut profitable: Vec<(GameAction, f64)> = Vec::new();
        for action in legal {
            if action == GameAction::EndTurn {
                continue;
            }
            let mut next = state.clone();
            if engine.apply_action(&mut next, side, &action).is_err() {
                continue;
            }
            let score = self.evaluator.score(&next, side);
            trace!(?action, score, baseline, "candidate");
            if score > baseline {
                profitable.push((action, score));
            }
        }

        if profitable.is_empty() {
            return Some(GameAction::EndTurn);
        }

        let mistake = self.profile().mistake_chance;
        if mistake > 0.0 && self.rng.gen_bool(mistake) {
            let pick = self.rng.gen_index(profitable.len());
            let (action, _) = profitable.swap_remove(pick);
            debug!(%side, ?action, "mistake");
            return Some(action);
        }

        profitable
            .into_iter()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(action, _)| action)
    }

    /// Plan a whole turn without touching the live state.
    ///
    /// The plan ends with `EndTurn` unless the game ends first.
    pub fn plan_turn<E: RulesEngine>(&mut self, engine: &E, state: &GameState, side: Side) -> Vec<GameAction> {
        let mut scratch = state.clone();
        let mut plan = Vec::new();
        while let Some(action) = self.decide(engine, &scratch, side, plan.len()) {
            if engine.apply_action(&mut scratch, side, &action).is_err() {
                break;
            }
            let done = action == GameAction::EndTurn || scratch.is_over();
            plan.push(action);
            if done {
                break;
            }
        }
        plan
    }

    /// Play a whole turn on the live state. Returns the actions taken.
    pub fn play_turn<E: RulesEngine>(
        &mut self,
        engine: &E,
        state: &mut GameState,
        side: Side,
    ) -> Result<Vec<GameAction>, ActionError> {
        let mut taken = Vec::new();
        while let Some(action) = self.decide(engine, state, side, taken.len()) {
            engine.apply_action(state, side, &action)?;
            let done = action == GameAction::EndTurn || state.is_over();
            taken.push(action);
            if done {
                break;
            }
        }
        Ok(taken)
    }

    /// Play a whole turn, pausing `think_time` before each action.
    ///
    /// `on_action` sees every action right after it is applied, so a caller
    /// can publish the intermediate states.
    pub async fn play_turn_paced<E, F>(
        &mut self,
        engine: &E,
        state: &mut GameState,
        side: Side,
        mut on_action: F,
    ) -> Result<Vec<GameAction>, ActionError>
    where
        E: RulesEngine,
        F: FnMut(&GameAction, &GameState),
    {
        let think_time = self.profile().think_time;
        let mut taken = Vec::new();
        while let Some(action) = self.decide(engine, state, side, taken.len()) {
            tokio::time::sleep(think_time).await;
            engine.apply_action(state, side, &action)?;
            on_action(&action, state);
            let done = action == GameAction::EndTurn || state.is_over();
            taken.push(action);
            if done {
                break;
            }
        }
        Ok(taken)
    }

    fn decide<E: RulesEngine>(&mut self, engine: &E, state: &GameState, side: Side, taken: usize) -> Option<GameAction> {
        if taken + 1 >= self.max_actions && !engine.legal_actions(state, side).is_empty() {
            debug!(%side, taken, "action cap reached, passing");
            return Some(GameAction::EndTurn);
        }
        self.next_action(engine, state, side)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::cards::{Card, CardId};
    use crate::core::{EntityId, RulesConfig, Target};
    use crate::rules::TurnEngine;

    fn setup(mana: u8) -> (TurnEngine, GameState) {
        let engine = TurnEngine::new(RulesConfig::default().with_opening_hand(0));
        let mut state = GameState::new(engine.config(), 21);
        let player = state.player_mut(Side::Player);
        player.max_mana = mana;
        player.mana = mana;
        (engine, state)
    }

    fn ready(state: &mut GameState, side: Side, attack: i32, health: i32) -> EntityId {
        let id = state.add_to_board(side, &Card::minion(CardId::new(1), "M", 1, attack, health));
        state.minion_mut(id).unwrap().refresh();
        id
    }

    #[test]
    fn test_no_action_off_turn() {
        let (engine, state) = setup(1);
        let mut agent = AiAgent::from_difficulty(Difficulty::Hard, 1);
        assert_eq!(agent.next_action(&engine, &state, Side::Opponent), None);
    }

    #[test]
    fn test_nothing_to_do_ends_turn() {
        let (engine, state) = setup(0);
        let mut agent = AiAgent::from_difficulty(Difficulty::Medium, 1);
        assert_eq!(agent.next_action(&engine, &state, Side::Player), Some(GameAction::EndTurn));
    }

    #[test]
    fn test_takes_lethal() {
        let (engine, mut state) = setup(0);
        state.player_mut(Side::Opponent).health = 4;
        let attacker = ready(&mut state, Side::Player, 4, 1);
        // A juicy trade that is not lethal.
        state.add_to_board(Side::Opponent, &Card::minion(CardId::new(2), "Big", 6, 6, 4));

        let mut agent = AiAgent::from_difficulty(Difficulty::MaximumHell, 1);
        assert_eq!(
            agent.next_action(&engine, &state, Side::Player),
            Some(GameAction::Attack {
                attacker_id: attacker,
                target_id: Target::Hero(Side::Opponent),
            })
        );
    }

    #[test]
    fn test_plays_a_minion() {
        let (engine, mut state) = setup(3);
        let card = state.add_to_hand(Side::Player, Card::minion(CardId::new(3), "Yeti", 3, 3, 3));

        let mut agent = AiAgent::from_difficulty(Difficulty::MaximumHell, 1);
        assert_eq!(agent.next_action(&engine, &state, Side::Player), Some(GameAction::play(card)));
    }

    #[test]
    fn test_mistakes_are_still_profitable() {
        let (engine, mut state) = setup(3);
        state.add_to_hand(Side::Player, Card::minion(CardId::new(3), "Yeti", 3, 3, 3));
        ready(&mut state, Side::Player, 2, 2);

        let profile = Difficulty::Easy.profile().with_mistake_chance(1.0);
        let mut agent = AiAgent::new(profile, 7);
        let action = agent.next_action(&engine, &state, Side::Player).unwrap();
        assert_ne!(action, GameAction::EndTurn);
    }

    #[test]
    fn test_plan_turn_leaves_state_alone() {
        let (engine, mut state) = setup(3);
        state.add_to_hand(Side::Player, Card::minion(CardId::new(3), "Yeti", 3, 3, 3));
        ready(&mut state, Side::Player, 2, 2);
        let before = state.players.clone();

        let mut agent = AiAgent::from_difficulty(Difficulty::Nightmare, 1);
        let plan = agent.plan_turn(&engine, &state, Side::Player);

        assert_eq!(plan.last(), Some(&GameAction::EndTurn));
        assert!(plan.len() >= 3);
        assert_eq!(state.players, before);
    }

    #[test]
    fn test_play_turn_passes_control() {
        let (engine, mut state) = setup(3);
        state.add_to_hand(Side::Player, Card::minion(CardId::new(3), "Yeti", 3, 3, 3));

        let mut agent = AiAgent::from_difficulty(Difficulty::Hard, 1);
        let taken = agent.play_turn(&engine, &mut state, Side::Player).unwrap();

        assert_eq!(taken.last(), Some(&GameAction::EndTurn));
        assert_eq!(state.current_turn, Side::Opponent);
        assert_eq!(state.player(Side::Player).board.len(), 1);
    }

    #[test]
    fn test_action_cap() {
        let (engine, mut state) = setup(3);
        state.add_to_hand(Side::Player, Card::minion(CardId::new(3), "Yeti", 3, 3, 3));

        let mut agent = AiAgent::from_difficulty(Difficulty::Hard, 1).with_max_actions(1);
        let taken = agent.play_turn(&engine, &mut state, Side::Player).unwrap();
        assert_eq!(taken, vec![GameAction::EndTurn]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_paced_turn_waits_between_actions() {
        let (engine, mut state) = setup(3);
        state.add_to_hand(Side::Player, Card::minion(CardId::new(3), "Yeti", 3, 3, 3));

        let profile = Difficulty::Hard.profile().with_think_time(Duration::from_millis(300));
        let mut agent = AiAgent::new(profile, 1);
        let mut seen = 0;
        let start = tokio::time::Instant::now();
        let taken = agent
            .play_turn_paced(&engine, &mut state, Side::Player, |_, _| seen += 1)
            .await
            .unwrap();

        assert_eq!(taken.len(), 2);
        assert_eq!(seen, 2);
        assert!(start.elapsed() >= Duration::from_millis(600));
    }
}
