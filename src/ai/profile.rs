//! Difficulty levels and the profiles they map to.
//!
//! Difficulty is data, not a different algorithm: every level runs the same
//! agent, with the evaluator weights, lethal search budget, mistake rate and
//! pacing taken from its `DifficultyProfile`.

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Named difficulty level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Nightmare,
    MaximumHell,
}

impl Difficulty {
    pub const ALL: [Difficulty; 5] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Nightmare,
        Difficulty::MaximumHell,
    ];

    #[must_use]
    pub fn profile(self) -> DifficultyProfile {
        DifficultyProfile::from_difficulty(self)
    }
}

impl FromStr for Difficulty {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" | "normal" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "nightmare" => Ok(Difficulty::Nightmare),
            "maximum_hell" | "hell" => Ok(Difficulty::MaximumHell),
            _ => Err(()),
        }
    }
}

/// Parameters the agent plays with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyProfile {
    /// Penalty per point of enemy board threat (attack-weighted).
    pub board_threat_weight: f64,

    /// Reward for own board value minus enemy board value.
    pub board_presence_weight: f64,

    /// Reward per card of hand-size lead.
    pub card_advantage_weight: f64,

    /// Reward per mana spent this turn.
    pub mana_efficiency_weight: f64,

    /// Reward per point of damage on the enemy hero.
    pub face_weight: f64,

    /// Search for a kill this turn before anything else.
    pub lethal_seeking: bool,

    /// Node budget for the lethal search.
    pub lethal_search_budget: usize,

    /// Probability of taking a random profitable action instead of the best.
    pub mistake_chance: f64,

    /// Pause between actions when pacing a live turn.
    pub think_time: Duration,
}

impl DifficultyProfile {
    #[must_use]
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self {
                board_threat_weight: 0.3,
                board_presence_weight: 0.6,
                card_advantage_weight: 0.2,
                mana_efficiency_weight: 0.3,
                face_weight: 0.3,
                lethal_seeking: false,
                lethal_search_budget: 0,
                mistake_chance: 0.35,
                think_time: Duration::from_millis(1500),
            },
            Difficulty::Medium => Self {
                board_threat_weight: 0.8,
                board_presence_weight: 1.0,
                card_advantage_weight: 0.5,
                mana_efficiency_weight: 0.6,
                face_weight: 0.5,
                lethal_seeking: true,
                lethal_search_budget: 200,
                mistake_chance: 0.15,
                think_time: Duration::from_millis(1200),
            },
            Difficulty::Hard => Self {
                board_threat_weight: 1.2,
                board_presence_weight: 1.0,
                card_advantage_weight: 0.8,
                mana_efficiency_weight: 0.8,
                face_weight: 0.6,
                lethal_seeking: true,
                lethal_search_budget: 2_000,
                mistake_chance: 0.05,
                think_time: Duration::from_millis(900),
            },
            Difficulty::Nightmare => Self {
                board_threat_weight: 1.5,
                board_presence_weight: 1.1,
                card_advantage_weight: 1.0,
                mana_efficiency_weight: 1.0,
                face_weight: 0.8,
                lethal_seeking: true,
                lethal_search_budget: 10_000,
                mistake_chance: 0.01,
                think_time: Duration::from_millis(700),
            },
            Difficulty::MaximumHell => Self {
                board_threat_weight: 2.0,
                board_presence_weight: 1.2,
                card_advantage_weight: 1.2,
                mana_efficiency_weight: 1.2,
                face_weight: 1.0,
                lethal_seeking: true,
                lethal_search_budget: 50_000,
                mistake_chance: 0.0,
                think_time: Duration::from_millis(500),
            },
        }
    }

    /// Set the mistake chance.
    pub fn with_mistake_chance(mut self, chance: f64) -> Self {
        self.mistake_chance = chance.clamp(0.0, 1.0);
        self
    }

    /// Set the pause between paced actions.
    pub fn with_think_time(mut self, think_time: Duration) -> Self {
        self.think_time = think_time;
        self
    }

    /// Enable or disable lethal search.
    pub fn with_lethal_seeking(mut self, enabled: bool, budget: usize) -> Self {
        self.lethal_seeking = enabled;
        self.lethal_search_budget = budget;
        self
    }
}

impl Default for DifficultyProfile {
    fn default() -> Self {
        Self::from_difficulty(Difficulty::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!("EASY".parse::<Difficulty>(), Ok(Difficulty::Easy));
        assert_eq!("maximum-hell".parse::<Difficulty>(), Ok(Difficulty::MaximumHell));
        assert_eq!("Maximum Hell".parse::<Difficulty>(), Ok(Difficulty::MaximumHell));
        assert_eq!("normal".parse::<Difficulty>(), Ok(Difficulty::Medium));
        assert_eq!("impossible".parse::<Difficulty>(), Err(()));
    }

    #[test]
    fn test_json_names() {
        assert_eq!(serde_json::to_string(&Difficulty::MaximumHell).unwrap(), r#""MAXIMUM_HELL""#);
    }

    #[test]
    fn test_harder_means_fewer_mistakes_and_deeper_search() {
        let profiles: Vec<_> = Difficulty::ALL.iter().map(|d| d.profile()).collect();
        for pair in profiles.windows(2) {
            assert!(pair[0].mistake_chance >= pair[1].mistake_chance);
            assert!(pair[0].lethal_search_budget <= pair[1].lethal_search_budget);
            assert!(pair[0].think_time >= pair[1].think_time);
        }
        assert!(!Difficulty::Easy.profile().lethal_seeking);
        assert_eq!(Difficulty::MaximumHell.profile().mistake_chance, 0.0);
    }

    #[test]
    fn test_builder_pattern() {
        let profile = DifficultyProfile::default()
            .with_mistake_chance(2.0)
            .with_think_time(Duration::ZERO)
            .with_lethal_seeking(false, 0);

        assert_eq!(profile.mistake_chance, 1.0);
        assert_eq!(profile.think_time, Duration::ZERO);
        assert!(!profile.lethal_seeking);
    }

    #[test]
    fn test_serialization() {
        let profile = Difficulty::Hard.profile();
        let json = serde_json::to_string(&profile).unwrap();
        let restored: DifficultyProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(profile, restored);
    }
}
