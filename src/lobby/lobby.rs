//! The lobby core.
//!
//! `Lobby` holds presence and pending challenges and turns each request
//! into a list of [`LobbyEffect`]s: messages to deliver, expiry timers to
//! arm or disarm, and whether the presence map must be persisted. The
//! [`LobbyActor`] carries them out.
//!
//! [`LobbyActor`]: super::actor::LobbyActor

use std::time::Duration;

use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::{debug, info};

use super::challenge::{Challenge, ChallengeId, ChallengeStatus};
use super::code;
use super::config::LobbyConfig;
use super::presence::{LobbyUser, PresenceMap, PresenceStatus};
use super::protocol::LobbyServerMessage;
use crate::core::GameRng;

/// Errors the lobby reports to the user that caused them.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LobbyError {
    #[error("unknown user")]
    UnknownUser,

    #[error("unknown challenge")]
    UnknownChallenge,

    #[error("cannot challenge yourself")]
    SelfChallenge,

    #[error("target is not available")]
    TargetUnavailable,

    #[error("you cannot send a challenge right now")]
    SenderUnavailable,

    #[error("challenge already sent")]
    AlreadyChallenged,

    #[error("not a party to this challenge")]
    NotParticipant,

    #[error("challenge is no longer pending")]
    NotPending,
}

/// Something the lobby actor must do.
#[derive(Clone, Debug, PartialEq)]
pub enum LobbyEffect {
    /// Deliver to one identity.
    Send {
        to: String,
        message: LobbyServerMessage,
    },
    /// Deliver to everyone in the lobby except `except`.
    Broadcast {
        except: Option<String>,
        message: LobbyServerMessage,
    },
    ArmExpiry {
        id: ChallengeId,
        after: Duration,
    },
    DisarmExpiry {
        id: ChallengeId,
    },
    PersistPresence,
}

/// Presence plus pending challenges.
#[derive(Debug)]
pub struct Lobby {
    config: LobbyConfig,
    presence: PresenceMap,
    pending: FxHashMap<ChallengeId, Challenge>,
    next_challenge: u64,
    rng: GameRng,
}

impl Lobby {
    #[must_use]
    pub fn new(config: LobbyConfig) -> Self {
        let rng = config.seed.map_or_else(GameRng::from_entropy, GameRng::new);
        Self {
            config,
            presence: PresenceMap::new(),
            pending: FxHashMap::default(),
            next_challenge: 1,
            rng,
        }
    }

    #[must_use]
    pub fn presence(&self) -> &PresenceMap {
        &self.presence
    }

    #[must_use]
    pub fn challenge(&self, id: ChallengeId) -> Option<&Challenge> {
        self.pending.get(&id)
    }

    /// Pending challenges, oldest first.
    #[must_use]
    pub fn pending(&self) -> Vec<&Challenge> {
        let mut pending: Vec<_> = self.pending.values().collect();
        pending.sort_by_key(|c| c.id);
        pending
    }

    /// Enter the lobby, or refresh the profile of a user already in it.
    pub fn join(&mut self, identity: &str, display_name: Option<String>, avatar: Option<String>) -> Vec<LobbyEffect> {
        let status = self.presence.status(identity).unwrap_or_default();
        let user = LobbyUser {
            identity: identity.to_string(),
            display_name,
            avatar,
            status,
        };
        let is_new = self.presence.insert(user.clone());
        info!(%identity, is_new, "lobby join");

        let mut effects = vec![LobbyEffect::Send {
            to: identity.to_string(),
            message: LobbyServerMessage::UserList {
                users: self.presence.iter().cloned().collect(),
            },
        }];
        if is_new {
            effects.push(LobbyEffect::Broadcast {
                except: Some(identity.to_string()),
                message: LobbyServerMessage::UserJoined { user },
            });
        }
        effects.push(LobbyEffect::PersistPresence);
        effects
    }

    /// Leave the lobby. Pending challenges involving the user are cancelled.
    pub fn leave(&mut self, identity: &str) -> Vec<LobbyEffect> {
        if self.presence.remove(identity).is_none() {
            return Vec::new();
        }
        info!(%identity, "lobby leave");
        let mut effects = Vec::new();
        self.cancel_involving(identity, &mut effects);
        effects.push(LobbyEffect::Broadcast {
            except: None,
            message: LobbyServerMessage::UserLeft {
                identity: identity.to_string(),
            },
        });
        effects.push(LobbyEffect::PersistPresence);
        effects
    }

    /// Challenge another user.
    ///
    /// If `target` already has a pending challenge out to `from`, that
    /// challenge is accepted instead.
    pub fn send_challenge(&mut self, from: &str, target: &str) -> Result<Vec<LobbyEffect>, LobbyError> {
        let sender = self.presence.status(from).ok_or(LobbyError::UnknownUser)?;
        if from == target {
            return Err(LobbyError::SelfChallenge);
        }
        let receiver = self.presence.status(target).ok_or(LobbyError::TargetUnavailable)?;

        if let Some(mutual) = self.find_pending(target, from) {
            debug!(%from, %target, id = %mutual, "mutual challenge");
            return Ok(self.accept_pending(mutual));
        }
        if self.find_pending(from, target).is_some() {
            return Err(LobbyError::AlreadyChallenged);
        }
        if sender != PresenceStatus::Online {
            return Err(LobbyError::SenderUnavailable);
        }
        if receiver != PresenceStatus::Online {
            return Err(LobbyError::TargetUnavailable);
        }

        let id = ChallengeId(self.next_challenge);
        self.next_challenge += 1;
        let challenge = Challenge::new(id, from, target, self.config.challenge_ttl);
        info!(%from, %target, %id, "challenge sent");

        let mut effects = vec![
            LobbyEffect::Send {
                to: from.to_string(),
                message: LobbyServerMessage::ChallengeSent {
                    challenge: challenge.clone(),
                },
            },
            LobbyEffect::Send {
                to: target.to_string(),
                message: LobbyServerMessage::ChallengeReceived {
                    challenge: challenge.clone(),
                },
            },
            LobbyEffect::ArmExpiry {
                id,
                after: self.config.challenge_ttl,
            },
        ];
        self.pending.insert(id, challenge);
        self.set_status(from, PresenceStatus::Busy, &mut effects);
        self.set_status(target, PresenceStatus::Busy, &mut effects);
        effects.push(LobbyEffect::PersistPresence);
        Ok(effects)
    }

    /// Accept a challenge addressed to `identity`.
    pub fn accept(&mut self, identity: &str, id: ChallengeId) -> Result<Vec<LobbyEffect>, LobbyError> {
        self.check_resolvable(identity, id, |c| c.to == identity)?;
        Ok(self.accept_pending(id))
    }

    /// Decline a challenge addressed to `identity`.
    pub fn decline(&mut self, identity: &str, id: ChallengeId) -> Result<Vec<LobbyEffect>, LobbyError> {
        self.check_resolvable(identity, id, |c| c.to == identity)?;
        Ok(self.close(id, ChallengeStatus::Declined))
    }

    /// Withdraw a challenge sent by `identity`.
    pub fn cancel(&mut self, identity: &str, id: ChallengeId) -> Result<Vec<LobbyEffect>, LobbyError> {
        self.check_resolvable(identity, id, |c| c.from == identity)?;
        Ok(self.close(id, ChallengeStatus::Cancelled))
    }

    /// Expire a challenge whose time ran out. No-op if already resolved.
    pub fn expire(&mut self, id: ChallengeId) -> Vec<LobbyEffect> {
        if !self.pending.contains_key(&id) {
            return Vec::new();
        }
        self.close(id, ChallengeStatus::Expired)
    }

    /// Put a user back to `ONLINE` after their match.
    pub fn return_from_game(&mut self, identity: &str) -> Vec<LobbyEffect> {
        let mut effects = Vec::new();
        if self.presence.status(identity) == Some(PresenceStatus::InGame) {
            self.set_status(identity, PresenceStatus::Online, &mut effects);
            effects.push(LobbyEffect::PersistPresence);
        }
        effects
    }

    fn check_resolvable(
        &self,
        identity: &str,
        id: ChallengeId,
        may_resolve: impl Fn(&Challenge) -> bool,
    ) -> Result<(), LobbyError> {
        if !self.presence.contains(identity) {
            return Err(LobbyError::UnknownUser);
        }
        let challenge = self.pending.get(&id).ok_or(LobbyError::UnknownChallenge)?;
        if !challenge.involves(identity) || !may_resolve(challenge) {
            return Err(LobbyError::NotParticipant);
        }
        if !challenge.is_pending() {
            return Err(LobbyError::NotPending);
        }
        Ok(())
    }

    fn find_pending(&self, from: &str, to: &str) -> Option<ChallengeId> {
        self.pending
            .values()
            .find(|c| c.is_pending() && c.from == from && c.to == to)
            .map(|c| c.id)
    }

    fn accept_pending(&mut self, id: ChallengeId) -> Vec<LobbyEffect> {
        let Some(mut challenge) = self.pending.remove(&id) else {
            return Vec::new();
        };
        challenge.resolve(ChallengeStatus::Accepted);
        let room_code = code::generate(&mut self.rng, self.config.room_code_length);
        info!(from = %challenge.from, to = %challenge.to, %id, %room_code, "challenge accepted");

        let mut effects = vec![LobbyEffect::DisarmExpiry { id }];
        for party in [&challenge.from, &challenge.to] {
            effects.push(LobbyEffect::Send {
                to: party.clone(),
                message: LobbyServerMessage::ChallengeAccepted {
                    id,
                    room_code: room_code.clone(),
                },
            });
        }
        for party in [&challenge.from, &challenge.to] {
            self.set_status(party, PresenceStatus::InGame, &mut effects);
        }
        for party in [&challenge.from, &challenge.to] {
            self.cancel_involving(party, &mut effects);
        }
        for (party, other) in [(&challenge.from, &challenge.to), (&challenge.to, &challenge.from)] {
            let opponent = self
                .presence
                .get(other)
                .cloned()
                .unwrap_or_else(|| LobbyUser::new(other.clone()));
            effects.push(LobbyEffect::Send {
                to: party.clone(),
                message: LobbyServerMessage::StartGame {
                    room_code: room_code.clone(),
                    opponent,
                },
            });
        }
        effects.push(LobbyEffect::PersistPresence);
        effects
    }

    /// Resolve a pending challenge other than by acceptance.
    fn close(&mut self, id: ChallengeId, status: ChallengeStatus) -> Vec<LobbyEffect> {
        let Some(mut challenge) = self.pending.remove(&id) else {
            return Vec::new();
        };
        challenge.resolve(status);
        info!(from = %challenge.from, to = %challenge.to, %id, ?status, "challenge closed");

        let message = match status {
            ChallengeStatus::Declined => LobbyServerMessage::ChallengeDeclined { id },
            ChallengeStatus::Expired => LobbyServerMessage::ChallengeExpired { id },
            _ => LobbyServerMessage::ChallengeCancelled { id },
        };
        let mut effects = vec![LobbyEffect::DisarmExpiry { id }];
        for party in [&challenge.from, &challenge.to] {
            effects.push(LobbyEffect::Send {
                to: party.clone(),
                message: message.clone(),
            });
        }
        for party in [&challenge.from, &challenge.to] {
            self.restore_online(party, &mut effects);
        }
        effects.push(LobbyEffect::PersistPresence);
        effects
    }

    /// Cancel every pending challenge `identity` is party to.
    fn cancel_involving(&mut self, identity: &str, effects: &mut Vec<LobbyEffect>) {
        let mut ids: Vec<ChallengeId> = self
            .pending
            .values()
            .filter(|c| c.involves(identity))
            .map(|c| c.id)
            .collect();
        ids.sort_unstable();
        for id in ids {
            effects.extend(self.close(id, ChallengeStatus::Cancelled));
        }
    }

    /// `BUSY` goes back to `ONLINE` once no pending challenge remains.
    fn restore_online(&mut self, identity: &str, effects: &mut Vec<LobbyEffect>) {
        let still_busy = self.pending.values().any(|c| c.involves(identity));
        if !still_busy && self.presence.status(identity) == Some(PresenceStatus::Busy) {
            self.set_status(identity, PresenceStatus::Online, effects);
        }
    }

    fn set_status(&mut self, identity: &str, status: PresenceStatus, effects: &mut Vec<LobbyEffect>) {
        if self.presence.set_status(identity, status) {
            effects.push(LobbyEffect::Broadcast {
                except: None,
                message: LobbyServerMessage::UserStateChanged {
                    identity: identity.to_string(),
                    status,
                },
            });
        }
    }
}
