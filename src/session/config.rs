//! Room configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::RulesConfig;

/// Timeouts and rules for the rooms a registry spawns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    /// A turn still open after this long is ended for the side to move.
    pub turn_timeout: Duration,

    /// A room with no inbound traffic for this long is torn down.
    pub inactivity_timeout: Duration,

    /// Bound on the catalog fetch when a match starts.
    pub catalog_timeout: Duration,

    pub rules: RulesConfig,

    /// Fixed match seed. `None` seeds every match from entropy.
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            turn_timeout: Duration::from_secs(90),
            inactivity_timeout: Duration::from_secs(10 * 60),
            catalog_timeout: Duration::from_secs(10),
            rules: RulesConfig::default(),
            seed: None,
        }
    }
}

impl SessionConfig {
    /// Set the turn timeout.
    pub fn with_turn_timeout(mut self, timeout: Duration) -> Self {
        self.turn_timeout = timeout;
        self
    }

    /// Set the inactivity timeout.
    pub fn with_inactivity_timeout(mut self, timeout: Duration) -> Self {
        self.inactivity_timeout = timeout;
        self
    }

    /// Set the catalog fetch timeout.
    pub fn with_catalog_timeout(mut self, timeout: Duration) -> Self {
        self.catalog_timeout = timeout;
        self
    }

    /// Set the rules every match in the room plays by.
    pub fn with_rules(mut self, rules: RulesConfig) -> Self {
        self.rules = rules;
        self
    }

    /// Fix the match seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
