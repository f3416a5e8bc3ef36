//! Turn engine.
//!
//! `RulesEngine` is the legal-action / apply / terminal surface that the
//! AI searches over and the room drives. `TurnEngine` implements the
//! two-hero ruleset on top of the effect and combat resolvers.

pub mod engine;

pub use engine::{GameResult, RulesEngine, TurnEngine};
