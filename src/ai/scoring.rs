//! Board evaluation.
//!
//! One scoring function for every difficulty: the profile only changes the
//! weights. Scores are from one side's point of view and only meaningful
//! relative to each other within the same turn.
//!
//! ## Terms
//!
//! - **Threat**: enemy attack on board, what it can do to us next turn
//! - **Presence**: own board value minus enemy board value
//! - **Card advantage**: hand size lead
//! - **Mana efficiency**: mana spent this turn
//! - **Face**: damage on the enemy hero, plus a little for our own health

use crate::cards::{Keyword, MinionInstance};
use crate::core::{GameState, Phase, PlayerState, Side};

use super::profile::DifficultyProfile;

/// Score of a decided game.
pub const WIN_SCORE: f64 = 1_000_000.0;

/// Scores game states for one side.
#[derive(Clone, Debug, Default)]
pub struct Evaluator {
    profile: DifficultyProfile,
}

impl Evaluator {
    #[must_use]
    pub fn new(profile: DifficultyProfile) -> Self {
        Self { profile }
    }

    #[must_use]
    pub fn profile(&self) -> &DifficultyProfile {
        &self.profile
    }

    /// Score `state` for `side`. Higher is better.
    #[must_use]
    pub fn score(&self, state: &GameState, side: Side) -> f64 {
        if state.phase == Phase::GameOver {
            return match state.winner {
                Some(winner) if winner == side => WIN_SCORE,
                Some(_) => -WIN_SCORE,
                None => -WIN_SCORE / 2.0,
            };
        }

        let p = &self.profile;
        let me = state.player(side);
        let enemy = state.player(side.other());

        let threat: f64 = enemy.board.iter().map(threat).sum();
        let presence: f64 = me.board.iter().map(value).sum::<f64>() - enemy.board.iter().map(value).sum::<f64>()
            + weapon_value(me) - weapon_value(enemy);
        let cards = me.hand.len() as f64 - enemy.hand.len() as f64;
        let spent = f64::from(me.max_mana.saturating_sub(me.mana));
        let enemy_life = f64::from(enemy.health + enemy.armor);
        let own_life = f64::from(me.health + me.armor);

        -p.board_threat_weight * threat
            + p.board_presence_weight * presence
            + p.card_advantage_weight * cards
            + p.mana_efficiency_weight * spent
            - p.face_weight * enemy_life
            + 0.25 * own_life
    }
}

/// What a minion is worth to its owner.
fn value(minion: &MinionInstance) -> f64 {
    let mut value = f64::from(minion.attack) + f64::from(minion.health);
    for keyword in minion.keywords.iter() {
        value += match keyword {
            Keyword::Taunt => 1.0,
            Keyword::DivineShield => f64::from(minion.attack).max(1.0),
            Keyword::Windfury => f64::from(minion.attack) * 0.5,
            Keyword::Lifesteal => f64::from(minion.attack) * 0.5,
            Keyword::Rush | Keyword::Charge => 0.0,
        };
    }
    value
}

/// How much damage a minion threatens next turn.
fn threat(minion: &MinionInstance) -> f64 {
    f64::from(minion.attack) * f64::from(minion.max_attacks())
}

fn weapon_value(player: &PlayerState) -> f64 {
    player
        .weapon
        .as_ref()
        .map_or(0.0, |w| f64::from(w.attack) * f64::from(w.durability.max(0)) * 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, CardId};
    use crate::core::RulesConfig;

    fn state() -> GameState {
        GameState::new(&RulesConfig::default(), 1)
    }

    #[test]
    fn test_more_board_is_better() {
        let eval = Evaluator::default();
        let empty = state();
        let mut ahead = state();
        ahead.add_to_board(Side::Player, &Card::minion(CardId::new(1), "M", 2, 2, 2));

        assert!(eval.score(&ahead, Side::Player) > eval.score(&empty, Side::Player));
        assert!(eval.score(&ahead, Side::Opponent) < eval.score(&empty, Side::Opponent));
    }

    #[test]
    fn test_face_damage_is_better() {
        let eval = Evaluator::default();
        let base = state();
        let mut hit = state();
        hit.player_mut(Side::Opponent).damage_hero(3);

        assert!(eval.score(&hit, Side::Player) > eval.score(&base, Side::Player));
    }

    #[test]
    fn test_spending_mana_is_better() {
        let eval = Evaluator::default();
        let mut idle = state();
        idle.player_mut(Side::Player).max_mana = 4;
        idle.player_mut(Side::Player).mana = 4;
        let mut spent = idle.clone();
        spent.player_mut(Side::Player).mana = 1;

        assert!(eval.score(&spent, Side::Player) > eval.score(&idle, Side::Player));
    }

    #[test]
    fn test_terminal_scores() {
        let eval = Evaluator::default();
        let mut won = state();
        won.finish(Some(Side::Player));
        assert_eq!(eval.score(&won, Side::Player), WIN_SCORE);
        assert_eq!(eval.score(&won, Side::Opponent), -WIN_SCORE);

        let mut drawn = state();
        drawn.finish(None);
        assert!(eval.score(&drawn, Side::Player) < 0.0);
    }

    #[test]
    fn test_weights_come_from_profile() {
        use crate::ai::Difficulty;

        let mut threatened = state();
        threatened.add_to_board(Side::Opponent, &Card::minion(CardId::new(1), "Big", 5, 6, 1));

        let easy = Evaluator::new(Difficulty::Easy.profile()).score(&threatened, Side::Player);
        let hell = Evaluator::new(Difficulty::MaximumHell.profile()).score(&threatened, Side::Player);
        assert_ne!(easy, hell);
    }
}
