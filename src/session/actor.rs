//! The room actor.
//!
//! One tokio task per room drains an unbounded inbox of [`RoomCommand`]s;
//! all room mutation happens there. Peers talk to it through a
//! [`RoomHandle`]: `connect` hands back an outbound receiver, `send`
//! forwards a parsed client message, `disconnect` reports a dropped socket.
//!
//! The actor owns:
//! - the [`Room`] core
//! - one outbound sender per live connection
//! - the turn and inactivity timers
//! - the snapshot store it checkpoints to after every applied action

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use super::config::SessionConfig;
use super::protocol::{ClientMessage, PlayerInfo, ServerMessage};
use super::room::{ConnectionId, JoinOutcome, Room, RoomSnapshot, Seat, SessionError};
use super::timer::TimerSet;
use crate::cards::{CardCatalog, CatalogError, CatalogSource};
use crate::core::GameAction;
use crate::storage::{room_key, SnapshotStore, SnapshotStoreExt, StorageError};

/// Commands a room actor processes, in arrival order.
#[derive(Debug)]
pub enum RoomCommand {
    Connect {
        connection: ConnectionId,
        outbound: UnboundedSender<ServerMessage>,
    },
    Message {
        connection: ConnectionId,
        message: ClientMessage,
    },
    Disconnect {
        connection: ConnectionId,
    },
    TurnTimeout {
        generation: u64,
        turn_number: u32,
    },
    InactivityTimeout {
        generation: u64,
    },
    Shutdown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum RoomTimer {
    Turn,
    Inactivity,
}

/// Cloneable address of a running room.
#[derive(Clone, Debug)]
pub struct RoomHandle {
    code: String,
    inbox: UnboundedSender<RoomCommand>,
    connections: Arc<AtomicU64>,
}

/// One peer's end of a room.
#[derive(Debug)]
pub struct Connection {
    pub id: ConnectionId,
    pub outbound: UnboundedReceiver<ServerMessage>,
}

impl RoomHandle {
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Open a connection. Messages for it arrive on `Connection::outbound`.
    pub fn connect(&self) -> Connection {
        let id = ConnectionId(self.connections.fetch_add(1, Ordering::Relaxed));
        let (outbound, rx) = unbounded_channel();
        let _ = self.inbox.send(RoomCommand::Connect {
            connection: id,
            outbound,
        });
        Connection { id, outbound: rx }
    }

    /// Forward a client message. Returns false once the room is gone.
    pub fn send(&self, connection: ConnectionId, message: ClientMessage) -> bool {
        self.inbox.send(RoomCommand::Message { connection, message }).is_ok()
    }

    pub fn disconnect(&self, connection: ConnectionId) {
        let _ = self.inbox.send(RoomCommand::Disconnect { connection });
    }

    pub fn shutdown(&self) {
        let _ = self.inbox.send(RoomCommand::Shutdown);
    }

    /// True once the actor has stopped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inbox.is_closed()
    }
}

/// Imperative shell around a [`Room`].
pub struct RoomActor {
    room: Room,
    config: SessionConfig,
    catalog: Arc<dyn CatalogSource>,
    store: Arc<dyn SnapshotStore>,
    inbox: UnboundedReceiver<RoomCommand>,
    loopback: UnboundedSender<RoomCommand>,
    outbound: FxHashMap<ConnectionId, UnboundedSender<ServerMessage>>,
    timers: TimerSet<RoomTimer>,
}

impl RoomActor {
    /// Spawn a fresh room.
    pub fn spawn(
        code: impl Into<String>,
        config: SessionConfig,
        catalog: Arc<dyn CatalogSource>,
        store: Arc<dyn SnapshotStore>,
    ) -> RoomHandle {
        let room = Room::new(code, config.rules.clone());
        Self::launch(room, config, catalog, store)
    }

    /// Resume a room from its last checkpoint.
    ///
    /// Returns `Ok(None)` when no checkpoint exists for `code`.
    pub fn restore(
        code: &str,
        config: SessionConfig,
        catalog: Arc<dyn CatalogSource>,
        store: Arc<dyn SnapshotStore>,
    ) -> Result<Option<RoomHandle>, StorageError> {
        let Some(snapshot) = store.load::<RoomSnapshot>(&room_key(code))? else {
            return Ok(None);
        };
        let room = Room::from_snapshot(snapshot, config.rules.clone());
        info!(room = code, status = ?room.status(), "room restored");
        Ok(Some(Self::launch(room, config, catalog, store)))
    }

    fn launch(
        room: Room,
        config: SessionConfig,
        catalog: Arc<dyn CatalogSource>,
        store: Arc<dyn SnapshotStore>,
    ) -> RoomHandle {
        let (tx, rx) = unbounded_channel();
        let handle = RoomHandle {
            code: room.code().to_string(),
            inbox: tx.clone(),
            connections: Arc::new(AtomicU64::new(1)),
        };
        let mut actor = Self {
            room,
            config,
            catalog,
            store,
            inbox: rx,
            loopback: tx,
            outbound: FxHashMap::default(),
            timers: TimerSet::new(),
        };
        actor.arm_inactivity();
        actor.arm_turn();
        tokio::spawn(actor.run());
        handle
    }

    async fn run(mut self) {
        debug!(room = %self.room.code(), "room actor running");
        while let Some(command) = self.inbox.recv().await {
            if !self.handle(command).await {
                break;
            }
        }
        self.teardown();
    }

    /// Process one command. Returns false when the room should close.
    async fn handle(&mut self, command: RoomCommand) -> bool {
        match command {
            RoomCommand::Connect { connection, outbound } => {
                self.outbound.insert(connection, outbound);
            }
            RoomCommand::Message { connection, message } => {
                self.arm_inactivity();
                self.room.touch();
                return self.on_message(connection, message).await;
            }
            RoomCommand::Disconnect { connection } => {
                self.outbound.remove(&connection);
                if let Some(seat) = self.room.disconnect(connection) {
                    self.send_to(seat.other(), ServerMessage::OpponentDisconnected);
                    self.checkpoint();
                }
            }
            RoomCommand::TurnTimeout {
                generation,
                turn_number,
            } => {
                if self.timers.take(RoomTimer::Turn, generation) && self.room.force_end_turn(turn_number) {
                    self.after_change(true);
                }
            }
            RoomCommand::InactivityTimeout { generation } => {
                if self.timers.take(RoomTimer::Inactivity, generation) {
                    info!(room = %self.room.code(), "room inactive");
                    return false;
                }
            }
            RoomCommand::Shutdown => return false,
        }
        true
    }

    async fn on_message(&mut self, connection: ConnectionId, message: ClientMessage) -> bool {
        match message {
            ClientMessage::Ping => self.send_conn(connection, ServerMessage::Pong),
            ClientMessage::Join {
                identity,
                display_name,
                avatar,
            } => {
                let info = PlayerInfo {
                    identity,
                    display_name,
                    avatar,
                };
                return self.on_join(connection, info).await;
            }
            ClientMessage::Action { action } => self.on_action(connection, action),
        }
        true
    }

    async fn on_join(&mut self, connection: ConnectionId, info: PlayerInfo) -> bool {
        let outcome = match self.room.join(info, connection) {
            Ok(outcome) => outcome,
            Err(err) => {
                self.send_conn(connection, ServerMessage::error(&err));
                return true;
            }
        };
        let seat = outcome.seat();
        self.send_conn(connection, self.room.room_info(seat));

        match outcome {
            JoinOutcome::Waiting(_) if self.room.game().is_none() => {
                self.send_conn(connection, ServerMessage::WaitingForOpponent);
            }
            JoinOutcome::Waiting(_) => {}
            JoinOutcome::Ready(_) => {
                for s in Seat::BOTH {
                    if let Some(opponent) = self.room.seat(s.other()) {
                        let info = opponent.info.clone();
                        self.send_to(s, ServerMessage::OpponentJoined { opponent_info: info });
                    }
                }
                if let Err(err) = self.start_game().await {
                    warn!(room = %self.room.code(), %err, "match could not start");
                    self.broadcast(|_| Some(ServerMessage::error(&err)));
                    return false;
                }
                self.after_change(true);
                return true;
            }
            JoinOutcome::Rejoined(_) => {
                self.send_to(seat.other(), ServerMessage::OpponentReconnected);
                match self.room.state_message(seat) {
                    Some(state) => self.send_conn(connection, state),
                    None => self.send_conn(connection, ServerMessage::WaitingForOpponent),
                }
            }
        }
        self.checkpoint();
        true
    }

    async fn start_game(&mut self) -> Result<(), CatalogError> {
        let catalog: CardCatalog = tokio::time::timeout(self.config.catalog_timeout, self.catalog.fetch())
            .await
            .map_err(|_| CatalogError::TimedOut)??;
        let seed = self.config.seed.unwrap_or_else(rand::random);
        self.room.start_game(&catalog, seed)
    }

    fn on_action(&mut self, connection: ConnectionId, action: GameAction) {
        let Some(seat) = self.room.seat_of(connection) else {
            self.send_conn(connection, ServerMessage::invalid_action(SessionError::NotSeated));
            return;
        };
        match self.room.apply_action(seat, action) {
            Ok(applied) => self.after_change(applied.turn_changed || applied.game_over),
            Err(err) => self.send_conn(connection, ServerMessage::invalid_action(err)),
        }
    }

    /// Publish the new state, checkpoint it, and re-arm the turn timer if
    /// the turn moved.
    fn after_change(&mut self, turn_moved: bool) {
        self.checkpoint();
        let room = &self.room;
        let messages: Vec<_> = Seat::BOTH
            .into_iter()
            .filter_map(|seat| room.state_message(seat).map(|m| (seat, m)))
            .collect();
        for (seat, message) in messages {
            self.send_to(seat, message);
        }
        if turn_moved {
            self.arm_turn();
        }
    }

    fn arm_turn(&mut self) {
        match self.room.live_turn() {
            Some(turn_number) => {
                self.timers.schedule(
                    RoomTimer::Turn,
                    self.config.turn_timeout,
                    self.loopback.clone(),
                    move |generation| RoomCommand::TurnTimeout {
                        generation,
                        turn_number,
                    },
                );
            }
            None => self.timers.cancel(RoomTimer::Turn),
        }
    }

    fn arm_inactivity(&mut self) {
        self.timers.schedule(
            RoomTimer::Inactivity,
            self.config.inactivity_timeout,
            self.loopback.clone(),
            |generation| RoomCommand::InactivityTimeout { generation },
        );
    }

    fn checkpoint(&self) {
        let key = room_key(self.room.code());
        if let Err(err) = self.store.save(&key, &self.room.snapshot()) {
            warn!(room = %self.room.code(), %err, "checkpoint failed");
        }
    }

    fn teardown(&mut self) {
        self.timers.cancel_all();
        self.inbox.close();
        self.outbound.clear();
        if let Err(err) = self.store.delete(&room_key(self.room.code())) {
            warn!(room = %self.room.code(), %err, "snapshot delete failed");
        }
        info!(room = %self.room.code(), "room closed");
    }

    fn send_conn(&self, connection: ConnectionId, message: ServerMessage) {
        if let Some(tx) = self.outbound.get(&connection) {
            let _ = tx.send(message);
        }
    }

    fn send_to(&self, seat: Seat, message: ServerMessage) {
        if let Some(connection) = self.room.connection(seat) {
            self.send_conn(connection, message);
        }
    }

    fn broadcast(&self, message: impl Fn(Seat) -> Option<ServerMessage>) {
        for seat in Seat::BOTH {
            if let Some(m) = message(seat) {
                self.send_to(seat, m);
            }
        }
    }
}
