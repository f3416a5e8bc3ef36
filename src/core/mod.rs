//! Core engine types: entities, sides, state, actions, RNG, configuration.
//!
//! Everything the rules operate on lives here. Behavior that needs card
//! semantics (effects, combat, turns) lives in the modules above it.

pub mod entity;
pub mod side;
pub mod rng;
pub mod config;
pub mod action;
pub mod error;
pub mod state;

pub use entity::EntityId;
pub use side::{Side, SideMap};
pub use rng::{GameRng, GameRngState};
pub use config::{DrawPolicy, RulesConfig};
pub use action::{GameAction, Target};
pub use error::ActionError;
pub use state::{DrawOutcome, GameState, Phase, PlayerState};
