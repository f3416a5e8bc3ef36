//! Multiplayer rooms.
//!
//! A room seats two remote peers and runs one server-authoritative match
//! between them:
//!
//! - [`protocol`]: JSON messages exchanged with peers
//! - [`perspective`]: each seat sees itself as `PLAYER`
//! - [`room`]: the synchronous core (seats, status, game state, snapshots)
//! - [`timer`]: generation-checked timers that post into an actor inbox
//! - [`actor`]: the tokio task owning a room, its connections and timers
//! - [`registry`]: room code to running actor
//!
//! The transport is the host's concern: it calls [`RoomHandle::connect`]
//! per socket, forwards parsed [`ClientMessage`]s and pumps the outbound
//! receiver back to the socket as JSON.

pub mod actor;
pub mod config;
pub mod perspective;
pub mod protocol;
pub mod registry;
pub mod room;
pub mod timer;

pub use actor::{Connection, RoomActor, RoomCommand, RoomHandle};
pub use config::SessionConfig;
pub use perspective::{GameView, PlayerView};
pub use protocol::{ClientMessage, PlayerInfo, SeatInfo, ServerMessage};
pub use registry::RoomRegistry;
pub use room::{Applied, ConnectionId, JoinOutcome, Room, RoomSnapshot, RoomStatus, Seat, SeatState, SessionError};
pub use timer::TimerSet;
