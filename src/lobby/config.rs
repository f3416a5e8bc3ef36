//! Lobby configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbyConfig {
    /// A pending challenge expires after this long.
    pub challenge_ttl: Duration,

    /// Length of generated room codes.
    pub room_code_length: usize,

    /// Seed for room codes. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for LobbyConfig {
    fn default() -> Self {
        Self {
            challenge_ttl: Duration::from_secs(30),
            room_code_length: 6,
            seed: None,
        }
    }
}

impl LobbyConfig {
    /// Set the challenge time-to-live.
    pub fn with_challenge_ttl(mut self, ttl: Duration) -> Self {
        self.challenge_ttl = ttl;
        self
    }

    /// Set the room code length.
    pub fn with_room_code_length(mut self, len: usize) -> Self {
        self.room_code_length = len.max(1);
        self
    }

    /// Fix the room code seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LobbyConfig::default();
        assert_eq!(config.challenge_ttl, Duration::from_secs(30));
        assert_eq!(config.room_code_length, 6);
        assert_eq!(LobbyConfig::default().with_room_code_length(0).room_code_length, 1);
    }
}
