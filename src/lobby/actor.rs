//! The lobby actor.
//!
//! A single tokio task owns the [`Lobby`] core, the connection-to-identity
//! map and one expiry timer per pending challenge. Every effect the core
//! returns is carried out here.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use super::challenge::ChallengeId;
use super::config::LobbyConfig;
use super::lobby::{Lobby, LobbyEffect, LobbyError};
use super::protocol::{LobbyClientMessage, LobbyServerMessage};
use crate::session::{ConnectionId, TimerSet};
use crate::storage::{SnapshotStore, SnapshotStoreExt, LOBBY_PRESENCE_KEY};

/// Commands the lobby actor processes, in arrival order.
#[derive(Debug)]
pub enum LobbyCommand {
    Connect {
        connection: ConnectionId,
        outbound: UnboundedSender<LobbyServerMessage>,
    },
    Message {
        connection: ConnectionId,
        message: LobbyClientMessage,
    },
    Disconnect {
        connection: ConnectionId,
    },
    /// A finished match hands both players back to the lobby.
    ReturnFromGame {
        identity: String,
    },
    ExpireChallenge {
        id: ChallengeId,
        generation: u64,
    },
    Shutdown,
}

/// One peer's end of the lobby.
#[derive(Debug)]
pub struct LobbyConnection {
    pub id: ConnectionId,
    pub outbound: UnboundedReceiver<LobbyServerMessage>,
}

/// Cloneable address of the running lobby.
#[derive(Clone, Debug)]
pub struct LobbyHandle {
    inbox: UnboundedSender<LobbyCommand>,
    connections: Arc<AtomicU64>,
}

impl LobbyHandle {
    pub fn connect(&self) -> LobbyConnection {
        let id = ConnectionId(self.connections.fetch_add(1, Ordering::Relaxed));
        let (outbound, rx) = unbounded_channel();
        let _ = self.inbox.send(LobbyCommand::Connect {
            connection: id,
            outbound,
        });
        LobbyConnection { id, outbound: rx }
    }

    /// Forward a client message. Returns false once the lobby is gone.
    pub fn send(&self, connection: ConnectionId, message: LobbyClientMessage) -> bool {
        self.inbox.send(LobbyCommand::Message { connection, message }).is_ok()
    }

    pub fn disconnect(&self, connection: ConnectionId) {
        let _ = self.inbox.send(LobbyCommand::Disconnect { connection });
    }

    pub fn return_from_game(&self, identity: impl Into<String>) {
        let _ = self.inbox.send(LobbyCommand::ReturnFromGame {
            identity: identity.into(),
        });
    }

    pub fn shutdown(&self) {
        let _ = self.inbox.send(LobbyCommand::Shutdown);
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inbox.is_closed()
    }
}

pub struct LobbyActor {
    lobby: Lobby,
    store: Arc<dyn SnapshotStore>,
    inbox: UnboundedReceiver<LobbyCommand>,
    loopback: UnboundedSender<LobbyCommand>,
    outbound: FxHashMap<ConnectionId, UnboundedSender<LobbyServerMessage>>,
    /// Identity bound by each connection's `JOIN`.
    identities: FxHashMap<ConnectionId, String>,
    timers: TimerSet<ChallengeId>,
}

impl LobbyActor {
    pub fn spawn(config: LobbyConfig, store: Arc<dyn SnapshotStore>) -> LobbyHandle {
        let (tx, rx) = unbounded_channel();
        let handle = LobbyHandle {
            inbox: tx.clone(),
            connections: Arc::new(AtomicU64::new(1)),
        };
        let actor = Self {
            lobby: Lobby::new(config),
            store,
            inbox: rx,
            loopback: tx,
            outbound: FxHashMap::default(),
            identities: FxHashMap::default(),
            timers: TimerSet::new(),
        };
        tokio::spawn(actor.run());
        handle
    }

    async fn run(mut self) {
        debug!("lobby actor running");
        while let Some(command) = self.inbox.recv().await {
            if !self.handle(command) {
                break;
            }
        }
        self.timers.cancel_all();
        self.inbox.close();
        info!("lobby closed");
    }

    fn handle(&mut self, command: LobbyCommand) -> bool {
        match command {
            LobbyCommand::Connect { connection, outbound } => {
                self.outbound.insert(connection, outbound);
            }
            LobbyCommand::Message { connection, message } => self.on_message(connection, message),
            LobbyCommand::Disconnect { connection } => {
                self.outbound.remove(&connection);
                if let Some(identity) = self.identities.remove(&connection) {
                    if !self.is_connected(&identity) {
                        let effects = self.lobby.leave(&identity);
                        self.apply(effects);
                    }
                }
            }
            LobbyCommand::ReturnFromGame { identity } => {
                let effects = self.lobby.return_from_game(&identity);
                self.apply(effects);
            }
            LobbyCommand::ExpireChallenge { id, generation } => {
                if self.timers.take(id, generation) {
                    let effects = self.lobby.expire(id);
                    self.apply(effects);
                }
            }
            LobbyCommand::Shutdown => return false,
        }
        true
    }

    fn on_message(&mut self, connection: ConnectionId, message: LobbyClientMessage) {
        if let LobbyClientMessage::Join {
            identity,
            display_name,
            avatar,
        } = message
        {
            self.identities.insert(connection, identity.clone());
            let effects = self.lobby.join(&identity, display_name, avatar);
            self.apply(effects);
            return;
        }
        if message == LobbyClientMessage::Ping {
            self.send_conn(connection, LobbyServerMessage::Pong);
            return;
        }

        let Some(identity) = self.identities.get(&connection).cloned() else {
            self.send_conn(connection, LobbyServerMessage::error(LobbyError::UnknownUser));
            return;
        };
        let result = match message {
            LobbyClientMessage::Leave => {
                let effects = self.lobby.leave(&identity);
                self.apply(effects);
                // Leaving is for the identity, not just this connection.
                self.identities.retain(|_, bound| *bound != identity);
                debug!(%identity, "lobby connections unbound");
                return;
            }
            LobbyClientMessage::SendChallenge { target_identity } => {
                self.lobby.send_challenge(&identity, &target_identity)
            }
            LobbyClientMessage::AcceptChallenge { id } => self.lobby.accept(&identity, id),
            LobbyClientMessage::DeclineChallenge { id } => self.lobby.decline(&identity, id),
            LobbyClientMessage::CancelChallenge { id } => self.lobby.cancel(&identity, id),
            LobbyClientMessage::Join { .. } | LobbyClientMessage::Ping => Ok(Vec::new()),
        };
        match result {
            Ok(effects) => self.apply(effects),
            Err(err) => {
                debug!(%identity, %err, "lobby request rejected");
                self.send_conn(connection, LobbyServerMessage::error(err));
            }
        }
    }

    fn apply(&mut self, effects: Vec<LobbyEffect>) {
        for effect in effects {
            match effect {
                LobbyEffect::Send { to, message } => self.send_to(&to, &message),
                LobbyEffect::Broadcast { except, message } => {
                    for (connection, identity) in &self.identities {
                        if except.as_deref() != Some(identity.as_str()) {
                            self.send_conn(*connection, message.clone());
                        }
                    }
                }
                LobbyEffect::ArmExpiry { id, after } => {
                    self.timers
                        .schedule(id, after, self.loopback.clone(), move |generation| {
                            LobbyCommand::ExpireChallenge { id, generation }
                        });
                }
                LobbyEffect::DisarmExpiry { id } => self.timers.cancel(id),
                LobbyEffect::PersistPresence => self.persist(),
            }
        }
    }

    fn persist(&self) {
        if let Err(err) = self.store.save(LOBBY_PRESENCE_KEY, self.lobby.presence()) {
            warn!(%err, "presence checkpoint failed");
        }
    }

    fn is_connected(&self, identity: &str) -> bool {
        self.identities.values().any(|i| i == identity)
    }

    /// Deliver to every connection bound to `identity`.
    fn send_to(&self, identity: &str, message: &LobbyServerMessage) {
        for (connection, bound) in &self.identities {
            if bound == identity {
                self.send_conn(*connection, message.clone());
            }
        }
    }

    fn send_conn(&self, connection: ConnectionId, message: LobbyServerMessage) {
        if let Some(tx) = self.outbound.get(&connection) {
            let _ = tx.send(message);
        }
    }
}
