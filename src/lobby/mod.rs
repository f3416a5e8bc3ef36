//! The matchmaking lobby.
//!
//! Users join with an identity, see who else is around and challenge each
//! other. An accepted challenge (or two users challenging each other at
//! once) yields a shared room code both peers then join through the
//! [`RoomRegistry`](crate::session::RoomRegistry).

pub mod actor;
pub mod challenge;
pub mod code;
pub mod config;
#[allow(clippy::module_inception)]
pub mod lobby;
pub mod presence;
pub mod protocol;

pub use actor::{LobbyActor, LobbyCommand, LobbyConnection, LobbyHandle};
pub use challenge::{Challenge, ChallengeId, ChallengeStatus};
pub use config::LobbyConfig;
pub use lobby::{Lobby, LobbyEffect, LobbyError};
pub use presence::{LobbyUser, PresenceMap, PresenceStatus};
pub use protocol::{LobbyClientMessage, LobbyServerMessage};
