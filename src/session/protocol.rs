//! Room wire protocol.
//!
//! JSON objects tagged by `type` with camelCase payload fields. Game
//! states and sides in server messages are always from the receiving
//! seat's point of view (see [`GameView`]).

use serde::{Deserialize, Serialize};

use super::perspective::GameView;
use super::room::{RoomStatus, Seat};
use crate::core::{GameAction, Side};

/// Who sits in a seat, as announced by the peer on `JOIN`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerInfo {
    pub identity: String,
    pub display_name: Option<String>,
    pub avatar: Option<String>,
}

impl PlayerInfo {
    #[must_use]
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            display_name: None,
            avatar: None,
        }
    }

    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }
}

/// One seat in a `ROOM_INFO` message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatInfo {
    pub seat: Seat,
    pub identity: String,
    pub display_name: Option<String>,
    pub avatar: Option<String>,
    pub connected: bool,
}

/// Messages sent from a peer to its room.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    Join {
        identity: String,
        #[serde(default)]
        display_name: Option<String>,
        #[serde(default)]
        avatar: Option<String>,
    },
    Action {
        action: GameAction,
    },
    Ping,
}

impl ClientMessage {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Messages sent from a room to one of its peers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    /// Seated alone; the match starts when a second identity joins.
    WaitingForOpponent,
    OpponentJoined {
        opponent_info: PlayerInfo,
    },
    GameState {
        state: GameView,
    },
    /// The sender's action was refused. Only the sender receives this.
    InvalidAction {
        reason: String,
    },
    OpponentDisconnected,
    OpponentReconnected,
    /// `winner` is `None` for a draw.
    GameOver {
        winner: Option<Side>,
        state: GameView,
    },
    Error {
        message: String,
    },
    RoomInfo {
        room_code: String,
        status: RoomStatus,
        players: Vec<SeatInfo>,
        seat: Seat,
    },
    Pong,
}

impl ServerMessage {
    pub fn error(message: impl ToString) -> Self {
        Self::Error {
            message: message.to_string(),
        }
    }

    pub fn invalid_action(reason: impl ToString) -> Self {
        Self::InvalidAction {
            reason: reason.to_string(),
        }
    }

    /// `GAME_OVER` for a finished view, `GAME_STATE` otherwise.
    pub fn for_view(view: GameView) -> Self {
        if view.is_over() {
            Self::GameOver {
                winner: view.winner,
                state: view,
            }
        } else {
            Self::GameState { state: view }
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
