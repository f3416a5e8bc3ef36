//! Effect system for card abilities.
//!
//! - `EffectDescriptor`: what a card declares (kind + target selector)
//! - `TargetSelector`: how an effect picks what it reaches
//! - `EffectAction`: one atomic state change
//! - `EffectResolver`: descriptor → actions → state
//!
//! The same descriptor serves as a spell's effect, a minion's battlecry
//! and a weapon's equip trigger; the card type decides when it fires.

mod effect;
mod targeting;
mod resolver;

pub use effect::{EffectAction, EffectDescriptor, EffectKind, TokenSpec};
pub use targeting::TargetSelector;
pub use resolver::{EffectContext, EffectResolver};
