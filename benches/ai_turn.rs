use duel_ccg::ai::{AiAgent, Difficulty, LethalSearch};
use duel_ccg::cards::{Card, CardCatalog, CardId, Keyword};
use duel_ccg::core::{GameAction, GameState, RulesConfig, Side};
use duel_ccg::effects::{EffectDescriptor, EffectKind, TargetSelector};
use duel_ccg::rules::{RulesEngine, TurnEngine};

criterion::criterion_main!(benches);
criterion::criterion_group! {
    name = benches;
    config = criterion::Criterion::default()
        .without_plots()
        .sample_size(20)
        .measurement_time(std::time::Duration::from_secs(2));
    targets =
        listing_legal_actions,
        planning_midgame_turn,
        searching_for_lethal,
}

fn catalog() -> CardCatalog {
    CardCatalog::from_cards(vec![
        Card::minion(CardId::new(1), "Recruit", 1, 1, 2),
        Card::minion(CardId::new(2), "Shieldbearer", 2, 1, 4).with_keyword(Keyword::Taunt),
        Card::minion(CardId::new(3), "Raider", 3, 3, 2).with_keyword(Keyword::Charge),
        Card::minion(CardId::new(4), "Twinblade", 4, 2, 4).with_keyword(Keyword::Windfury),
        Card::spell(
            CardId::new(5),
            "Firebolt",
            2,
            EffectDescriptor::new(EffectKind::Damage { amount: 3 }, TargetSelector::AnyCharacter),
        ),
        Card::weapon(CardId::new(6), "Hatchet", 2, 2, 2),
    ])
}

/// A state some turns in, with boards on both sides.
fn midgame() -> (TurnEngine, GameState) {
    let engine = TurnEngine::new(RulesConfig::default());
    let mut state = GameState::from_catalog(&catalog(), engine.config(), 17).unwrap_or_else(|e| panic!("{e}"));
    engine.start_game(&mut state);
    let mut agents = [
        AiAgent::from_difficulty(Difficulty::Medium, 1),
        AiAgent::from_difficulty(Difficulty::Medium, 2),
    ];
    for _ in 0..10 {
        if state.is_over() {
            break;
        }
        let side = state.current_turn;
        let _ = agents[side.index()].play_turn(&engine, &mut state, side);
    }
    (engine, state)
}

fn listing_legal_actions(c: &mut criterion::Criterion) {
    let (engine, state) = midgame();
    c.bench_function("list legal actions mid-game", |b| {
        b.iter(|| engine.legal_actions(&state, state.current_turn))
    });
}

fn planning_midgame_turn(c: &mut criterion::Criterion) {
    let (engine, state) = midgame();
    for difficulty in Difficulty::ALL {
        c.bench_function(&format!("plan a mid-game turn ({difficulty:?})"), |b| {
            let mut agent = AiAgent::from_difficulty(difficulty, 7);
            b.iter(|| agent.plan_turn(&engine, &state, state.current_turn))
        });
    }
}

fn searching_for_lethal(c: &mut criterion::Criterion) {
    let engine = TurnEngine::new(RulesConfig::default().with_opening_hand(0));
    let mut state = GameState::new(engine.config(), 3);
    state.player_mut(Side::Opponent).health = 12;
    state.player_mut(Side::Player).max_mana = 6;
    state.player_mut(Side::Player).mana = 6;
    for attack in 1..=6 {
        let id = state.add_to_board(Side::Player, &Card::minion(CardId::new(9), "Soldier", 1, attack, 2));
        if let Some(minion) = state.minion_mut(id) {
            minion.refresh();
        }
    }
    state.add_to_board(
        Side::Opponent,
        &Card::minion(CardId::new(2), "Shieldbearer", 2, 1, 4).with_keyword(Keyword::Taunt),
    );
    let search = LethalSearch::new(50_000);
    c.bench_function("lethal search through a taunt", |b| {
        b.iter(|| search.find(&engine, &state, Side::Player).map_or(0, |line: Vec<GameAction>| line.len()))
    });
}
