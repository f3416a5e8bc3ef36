//! Rules configuration.
//!
//! `RulesConfig` holds every numeric constant the turn engine enforces.
//! The defaults match the classic two-hero ruleset; tests and AI
//! benchmarks shrink them to reach interesting states quickly.

use serde::{Deserialize, Serialize};

/// What happens when a side must draw from an empty deck.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DrawPolicy {
    /// The draw does nothing.
    #[default]
    Skip,
    /// Each empty draw deals cumulative fatigue damage (1, 2, 3, ...).
    Fatigue,
}

/// Rule constants for a match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Hero health at the start of the match.
    pub starting_health: i32,

    /// Hard cap for a side's mana crystals.
    pub max_mana: u8,

    /// Maximum minions on one board.
    pub max_board: usize,

    /// Maximum cards in hand. Cards drawn into a full hand are burned.
    pub max_hand: usize,

    /// Cards drawn by the side that goes first before its first turn.
    /// The second side draws one more.
    pub opening_hand: usize,

    /// Cards in each side's deck when a match is built from a catalog.
    pub deck_size: usize,

    /// Empty-deck draw behavior.
    pub draw_policy: DrawPolicy,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            starting_health: 30,
            max_mana: 10,
            max_board: 7,
            max_hand: 10,
            opening_hand: 3,
            deck_size: 30,
            draw_policy: DrawPolicy::Skip,
        }
    }
}

impl RulesConfig {
    /// Set the starting hero health.
    pub fn with_starting_health(mut self, health: i32) -> Self {
        self.starting_health = health;
        self
    }

    /// Set the opening hand size.
    pub fn with_opening_hand(mut self, cards: usize) -> Self {
        self.opening_hand = cards;
        self
    }

    /// Set the deck size used when building decks from a catalog.
    pub fn with_deck_size(mut self, cards: usize) -> Self {
        self.deck_size = cards;
        self
    }

    /// Set the empty-deck draw policy.
    pub fn with_draw_policy(mut self, policy: DrawPolicy) -> Self {
        self.draw_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RulesConfig::default();
        assert_eq!(config.starting_health, 30);
        assert_eq!(config.max_mana, 10);
        assert_eq!(config.max_board, 7);
        assert_eq!(config.max_hand, 10);
        assert_eq!(config.draw_policy, DrawPolicy::Skip);
    }

    #[test]
    fn test_builder_pattern() {
        let config = RulesConfig::default()
            .with_starting_health(10)
            .with_opening_hand(0)
            .with_draw_policy(DrawPolicy::Fatigue);

        assert_eq!(config.starting_health, 10);
        assert_eq!(config.opening_hand, 0);
        assert_eq!(config.draw_policy, DrawPolicy::Fatigue);
    }

    #[test]
    fn test_serialization() {
        let config = RulesConfig::default().with_deck_size(20);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: RulesConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
