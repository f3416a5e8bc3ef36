//! AI opponent.
//!
//! Every difficulty runs the same [`AiAgent`]; a [`Difficulty`] only picks
//! the [`DifficultyProfile`] it plays with:
//!
//! - [`Evaluator`]: weighted board score
//! - [`LethalSearch`]: bounded search for a kill this turn
//! - [`AiAgent`]: greedy one-step lookahead with deliberate mistakes

mod agent;
mod lethal;
mod profile;
mod scoring;

pub use agent::{AiAgent, DEFAULT_MAX_ACTIONS};
pub use lethal::{max_face_damage, LethalSearch};
pub use profile::{Difficulty, DifficultyProfile};
pub use scoring::{Evaluator, WIN_SCORE};
