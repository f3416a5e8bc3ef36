//! Lobby wire protocol.

use serde::{Deserialize, Serialize};

use super::challenge::{Challenge, ChallengeId};
use super::presence::{LobbyUser, PresenceStatus};

/// Messages sent from a peer to the lobby.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE", rename_all_fields = "camelCase")]
pub enum LobbyClientMessage {
    Join {
        identity: String,
        #[serde(default)]
        display_name: Option<String>,
        #[serde(default)]
        avatar: Option<String>,
    },
    Leave,
    SendChallenge {
        target_identity: String,
    },
    AcceptChallenge {
        id: ChallengeId,
    },
    DeclineChallenge {
        id: ChallengeId,
    },
    CancelChallenge {
        id: ChallengeId,
    },
    Ping,
}

impl LobbyClientMessage {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Messages sent from the lobby to a peer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE", rename_all_fields = "camelCase")]
pub enum LobbyServerMessage {
    /// Everyone in the lobby, sent to a user when they join.
    UserList {
        users: Vec<LobbyUser>,
    },
    UserJoined {
        user: LobbyUser,
    },
    UserLeft {
        identity: String,
    },
    UserStateChanged {
        identity: String,
        status: PresenceStatus,
    },
    ChallengeReceived {
        challenge: Challenge,
    },
    ChallengeSent {
        challenge: Challenge,
    },
    ChallengeAccepted {
        id: ChallengeId,
        room_code: String,
    },
    ChallengeDeclined {
        id: ChallengeId,
    },
    ChallengeExpired {
        id: ChallengeId,
    },
    ChallengeCancelled {
        id: ChallengeId,
    },
    StartGame {
        room_code: String,
        opponent: LobbyUser,
    },
    Error {
        message: String,
    },
    Pong,
}

impl LobbyServerMessage {
    pub fn error(message: impl ToString) -> Self {
        Self::Error {
            message: message.to_string(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_client_messages() {
        assert_eq!(
            LobbyClientMessage::from_json(r#"{"type":"SEND_CHALLENGE","targetIdentity":"bob"}"#).unwrap(),
            LobbyClientMessage::SendChallenge {
                target_identity: "bob".into()
            }
        );
        assert_eq!(
            LobbyClientMessage::from_json(r#"{"type":"ACCEPT_CHALLENGE","id":3}"#).unwrap(),
            LobbyClientMessage::AcceptChallenge { id: ChallengeId(3) }
        );
        assert_eq!(LobbyClientMessage::from_json(r#"{"type":"LEAVE"}"#).unwrap(), LobbyClientMessage::Leave);
    }

    #[test]
    fn test_encode_server_messages() {
        let msg = LobbyServerMessage::ChallengeAccepted {
            id: ChallengeId(2),
            room_code: "K7PQ2Z".into(),
        };
        assert_eq!(msg.to_json(), r#"{"type":"CHALLENGE_ACCEPTED","id":2,"roomCode":"K7PQ2Z"}"#);

        let changed = LobbyServerMessage::UserStateChanged {
            identity: "bob".into(),
            status: PresenceStatus::Busy,
        };
        assert_eq!(
            changed.to_json(),
            r#"{"type":"USER_STATE_CHANGED","identity":"bob","status":"BUSY"}"#
        );
    }
}
