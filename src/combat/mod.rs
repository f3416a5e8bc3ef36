//! Combat: who may attack what, and what an attack does.

mod resolver;

pub use resolver::{Attacker, CombatOutcome, CombatResolver, TargetList};
