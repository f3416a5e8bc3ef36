//! AI integration tests.
//!
//! Agents of every difficulty playing whole matches against each other,
//! plus targeted lethal and determinism checks.

use duel_ccg::ai::{max_face_damage, AiAgent, Difficulty, DifficultyProfile, Evaluator, LethalSearch, WIN_SCORE};
use duel_ccg::cards::{Card, CardCatalog, CardId, Keyword};
use duel_ccg::core::{DrawPolicy, GameAction, GameState, RulesConfig, Side};
use duel_ccg::effects::{EffectDescriptor, EffectKind, TargetSelector};
use duel_ccg::rules::{RulesEngine, TurnEngine};

fn catalog() -> CardCatalog {
    CardCatalog::from_cards(vec![
        Card::minion(CardId::new(1), "Recruit", 1, 1, 2),
        Card::minion(CardId::new(2), "Shieldbearer", 2, 1, 4).with_keyword(Keyword::Taunt),
        Card::minion(CardId::new(3), "Raider", 3, 3, 2).with_keyword(Keyword::Charge),
        Card::minion(CardId::new(4), "Ogre", 5, 5, 6),
        Card::spell(
            CardId::new(5),
            "Firebolt",
            2,
            EffectDescriptor::new(EffectKind::Damage { amount: 3 }, TargetSelector::AnyCharacter),
        ),
        Card::weapon(CardId::new(6), "Hatchet", 2, 2, 2),
    ])
}

fn new_match(seed: u64) -> (TurnEngine, GameState) {
    let config = RulesConfig::default()
        .with_deck_size(15)
        .with_draw_policy(DrawPolicy::Fatigue);
    let engine = TurnEngine::new(config);
    let mut state = GameState::from_catalog(&catalog(), engine.config(), seed).unwrap();
    engine.start_game(&mut state);
    (engine, state)
}

/// Play agents against each other until the match ends. Returns turns taken.
fn play_out(engine: &TurnEngine, state: &mut GameState, agents: &mut [AiAgent; 2]) -> u32 {
    let mut turns = 0;
    while engine.is_terminal(state).is_none() {
        assert!(turns < 300, "match did not finish");
        let side = state.current_turn;
        let agent = &mut agents[side.index()];
        let taken = agent.play_turn(engine, state, side).unwrap();
        assert!(!taken.is_empty());
        turns += 1;
    }
    turns
}

// =============================================================================
// Whole Matches
// =============================================================================

/// Every difficulty finishes a match against every other without ever
/// submitting an illegal action.
#[test]
fn test_every_pairing_finishes() {
    for (i, a) in Difficulty::ALL.into_iter().enumerate() {
        for (j, b) in Difficulty::ALL.into_iter().enumerate() {
            let (engine, mut state) = new_match((i * 5 + j) as u64);
            let mut agents = [AiAgent::from_difficulty(a, 1), AiAgent::from_difficulty(b, 2)];
            play_out(&engine, &mut state, &mut agents);
            assert!(state.is_over());
        }
    }
}

/// Without mistakes the agent is fully determined by the state.
#[test]
fn test_mistake_free_agent_is_deterministic() {
    let (engine, mut state) = new_match(4);
    for _ in 0..6 {
        let side = state.current_turn;
        engine.apply_action(&mut state, side, &GameAction::EndTurn).unwrap();
    }
    let side = state.current_turn;

    let mut a = AiAgent::from_difficulty(Difficulty::MaximumHell, 10);
    let mut b = AiAgent::from_difficulty(Difficulty::MaximumHell, 99);
    assert_eq!(a.plan_turn(&engine, &state, side), b.plan_turn(&engine, &state, side));
}

/// The same seed makes the same mistakes.
#[test]
fn test_seeded_mistakes_replay() {
    let (engine, mut state) = new_match(6);
    for _ in 0..8 {
        let side = state.current_turn;
        engine.apply_action(&mut state, side, &GameAction::EndTurn).unwrap();
    }
    let side = state.current_turn;

    let plan = |seed| AiAgent::from_difficulty(Difficulty::Easy, seed).plan_turn(&engine, &state, side);
    assert_eq!(plan(3), plan(3));
}

// =============================================================================
// Lethal
// =============================================================================

fn lethal_board() -> (TurnEngine, GameState) {
    let engine = TurnEngine::new(RulesConfig::default().with_opening_hand(0));
    let mut state = GameState::new(engine.config(), 1);
    state.player_mut(Side::Opponent).health = 5;
    {
        let player = state.player_mut(Side::Player);
        player.max_mana = 2;
        player.mana = 2;
    }
    state.add_to_board(
        Side::Opponent,
        &Card::minion(CardId::new(2), "Guard", 2, 1, 2).with_keyword(Keyword::Taunt),
    );
    for attack in [2, 3] {
        let id = state.add_to_board(Side::Player, &Card::minion(CardId::new(9), "Soldier", 2, attack, 3));
        state.minion_mut(id).unwrap().refresh();
    }
    state.add_to_hand(
        Side::Player,
        Card::spell(
            CardId::new(5),
            "Firebolt",
            2,
            EffectDescriptor::new(EffectKind::Damage { amount: 3 }, TargetSelector::AnyCharacter),
        ),
    );
    (engine, state)
}

/// A kill behind a taunt is found, and the line replays to a win.
#[test]
fn test_lethal_through_taunt() {
    let (engine, state) = lethal_board();

    let line = LethalSearch::new(1_000).find(&engine, &state, Side::Player).expect("lethal exists");

    let mut replay = state.clone();
    for action in &line {
        engine.apply_action(&mut replay, Side::Player, action).unwrap();
    }
    assert_eq!(replay.winner, Some(Side::Player));
    assert!(line.iter().all(|a| *a != GameAction::EndTurn));
}

/// Hard agents take the kill; Easy agents never search for it.
#[test]
fn test_lethal_seeking_by_difficulty() {
    let (engine, state) = lethal_board();

    let mut hard = AiAgent::from_difficulty(Difficulty::Hard, 1);
    let mut live = state.clone();
    hard.play_turn(&engine, &mut live, Side::Player).unwrap();
    assert_eq!(live.winner, Some(Side::Player));

    assert!(!Difficulty::Easy.profile().lethal_seeking);
    let easy = DifficultyProfile::from_difficulty(Difficulty::Easy).with_mistake_chance(0.0);
    let plan = AiAgent::new(easy, 1).plan_turn(&engine, &state, Side::Player);
    assert!(!plan.is_empty());
}

/// The optimistic bound counts board, weapon and burn.
#[test]
fn test_face_damage_bound() {
    let (_, state) = lethal_board();
    assert_eq!(max_face_damage(&state, Side::Player), Some(8));
}

// =============================================================================
// Scoring
// =============================================================================

/// A won state outranks anything on the board.
#[test]
fn test_won_state_scores_highest() {
    let (engine, state) = lethal_board();
    let evaluator = Evaluator::new(Difficulty::Nightmare.profile());

    let mut won = state.clone();
    let line = LethalSearch::default().find(&engine, &state, Side::Player).unwrap();
    for action in &line {
        engine.apply_action(&mut won, Side::Player, action).unwrap();
    }

    assert_eq!(evaluator.score(&won, Side::Player), WIN_SCORE);
    assert_eq!(evaluator.score(&won, Side::Opponent), -WIN_SCORE);
    assert!(evaluator.score(&state, Side::Player) < WIN_SCORE);
}
