//! # duel-ccg
//!
//! A two-player collectible card battle: heroes, minions, weapons and
//! spells, played locally against an AI or remotely through a
//! server-authoritative room.
//!
//! ## Design Principles
//!
//! 1. **One ruleset, many drivers**: the same [`TurnEngine`] is driven by a
//!    local UI, the AI and the room actor. Every mutation goes through it.
//!
//! 2. **Pure core, async shell**: rules, AI, rooms and the lobby are
//!    synchronous state machines. Tokio tasks own them and only route
//!    messages and timers.
//!
//! 3. **Cheap clones**: `GameState` uses `im` collections so the AI can
//!    simulate candidate actions on throwaway copies.
//!
//! ## Modules
//!
//! - `core`: entity IDs, sides, state, actions, RNG, configuration
//! - `cards`: card definitions, keywords, instances and the catalog
//! - `effects`: target selection and effect resolution
//! - `combat`: attack legality and resolution
//! - `rules`: the turn engine
//! - `ai`: the computer opponent and its difficulty levels
//! - `session`: two-seat multiplayer rooms
//! - `lobby`: presence and challenges
//! - `storage`: checkpoint persistence

pub mod core;
pub mod cards;
pub mod effects;
pub mod combat;
pub mod rules;
pub mod ai;
pub mod session;
pub mod lobby;
pub mod storage;

// Re-export commonly used types
pub use crate::core::{
    EntityId, Side, SideMap,
    GameRng, GameRngState,
    DrawPolicy, RulesConfig,
    GameAction, Target, ActionError,
    GameState, Phase, PlayerState,
};

pub use crate::cards::{
    Card, CardId, CardType, Rarity, Keyword, KeywordSet,
    CardInstance, MinionInstance, WeaponInstance,
    CardCatalog, CatalogError, CatalogSource, StaticCatalog,
};

pub use crate::effects::{EffectDescriptor, EffectKind, EffectResolver, TargetSelector};

pub use crate::combat::CombatResolver;

pub use crate::rules::{GameResult, RulesEngine, TurnEngine};

pub use crate::ai::{AiAgent, Difficulty, DifficultyProfile, Evaluator};

pub use crate::session::{
    ClientMessage, GameView, RoomActor, RoomHandle, RoomRegistry,
    ServerMessage, SessionConfig,
};

pub use crate::lobby::{LobbyActor, LobbyConfig, LobbyHandle, LobbyClientMessage, LobbyServerMessage};

pub use crate::storage::{FileStore, MemoryStore, SnapshotStore, StorageError};
