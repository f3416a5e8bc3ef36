//! Who is in the lobby, and whether they can be challenged.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Lobby availability.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PresenceStatus {
    #[default]
    Online,
    /// Party to a pending challenge.
    Busy,
    InGame,
}

/// A user as the lobby lists them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbyUser {
    pub identity: String,
    pub display_name: Option<String>,
    pub avatar: Option<String>,
    pub status: PresenceStatus,
}

impl LobbyUser {
    #[must_use]
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            display_name: None,
            avatar: None,
            status: PresenceStatus::Online,
        }
    }
}

/// Presence keyed by identity, in identity order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceMap {
    users: BTreeMap<String, LobbyUser>,
}

impl PresenceMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a user. Returns true if the identity was new.
    pub fn insert(&mut self, user: LobbyUser) -> bool {
        self.users.insert(user.identity.clone(), user).is_none()
    }

    pub fn remove(&mut self, identity: &str) -> Option<LobbyUser> {
        self.users.remove(identity)
    }

    #[must_use]
    pub fn get(&self, identity: &str) -> Option<&LobbyUser> {
        self.users.get(identity)
    }

    #[must_use]
    pub fn status(&self, identity: &str) -> Option<PresenceStatus> {
        self.get(identity).map(|u| u.status)
    }

    /// Change a user's status. Returns true if it actually changed.
    pub fn set_status(&mut self, identity: &str, status: PresenceStatus) -> bool {
        match self.users.get_mut(identity) {
            Some(user) if user.status != status => {
                user.status = status;
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn contains(&self, identity: &str) -> bool {
        self.users.contains_key(identity)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LobbyUser> {
        self.users.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
