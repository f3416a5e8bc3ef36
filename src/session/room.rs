//! The room core.
//!
//! `Room` is the synchronous half of a session: two seats, a status and
//! the authoritative `GameState`. It decides, the [`RoomActor`] delivers.
//! Every method returns what happened and leaves messaging, timers and
//! storage to the actor.
//!
//! [`RoomActor`]: super::actor::RoomActor

use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use super::perspective::{action_from_seat, GameView};
use super::protocol::{PlayerInfo, SeatInfo, ServerMessage};
use crate::cards::{CardCatalog, CatalogError};
use crate::core::{ActionError, GameAction, GameState, RulesConfig, Side};
use crate::rules::{RulesEngine, TurnEngine};

/// Errors a room reports to the peer that caused them.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("not seated in this room")]
    NotSeated,

    #[error("room is full")]
    RoomFull,

    #[error("room is finished")]
    RoomFinished,

    #[error("game has not started")]
    NotStarted,

    #[error(transparent)]
    Action(#[from] ActionError),
}

/// One of the two seats. Seat A plays the engine's `PLAYER` side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Seat {
    A,
    B,
}

impl Seat {
    pub const BOTH: [Seat; 2] = [Seat::A, Seat::B];

    #[must_use]
    pub const fn side(self) -> Side {
        match self {
            Seat::A => Side::Player,
            Seat::B => Side::Opponent,
        }
    }

    #[must_use]
    pub const fn other(self) -> Seat {
        match self {
            Seat::A => Seat::B,
            Seat::B => Seat::A,
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Seat::A => 0,
            Seat::B => 1,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomStatus {
    #[default]
    Waiting,
    Playing,
    Finished,
}

/// Handle the actor uses to address one peer connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConnectionId(pub u64);

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn#{}", self.0)
    }
}

/// Whoever occupies a seat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatState {
    pub info: PlayerInfo,
    pub connected: bool,
    /// Live connection; not persisted.
    #[serde(skip)]
    pub connection: Option<ConnectionId>,
}

/// What a successful join did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinOutcome {
    /// Took seat A; waiting for an opponent.
    Waiting(Seat),
    /// Took seat B; the match can start.
    Ready(Seat),
    /// A seated identity came back on a new connection.
    Rejoined(Seat),
}

impl JoinOutcome {
    #[must_use]
    pub fn seat(self) -> Seat {
        match self {
            JoinOutcome::Waiting(seat) | JoinOutcome::Ready(seat) | JoinOutcome::Rejoined(seat) => seat,
        }
    }
}

/// What an applied action did to the match.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Applied {
    pub turn_changed: bool,
    pub game_over: bool,
}

/// Everything needed to bring a room back after a restart.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoomSnapshot {
    pub code: String,
    pub status: RoomStatus,
    pub seats: [Option<SeatState>; 2],
    pub game: Option<GameState>,
    pub created_at: SystemTime,
    pub last_activity: SystemTime,
}

/// A two-seat room.
#[derive(Clone, Debug)]
pub struct Room {
    code: String,
    status: RoomStatus,
    seats: [Option<SeatState>; 2],
    game: Option<GameState>,
    engine: TurnEngine,
    created_at: SystemTime,
    last_activity: SystemTime,
}

impl Room {
    #[must_use]
    pub fn new(code: impl Into<String>, rules: RulesConfig) -> Self {
        let now = SystemTime::now();
        Self {
            code: code.into(),
            status: RoomStatus::Waiting,
            seats: [None, None],
            game: None,
            engine: TurnEngine::new(rules),
            created_at: now,
            last_activity: now,
        }
    }

    /// Rebuild a room from a snapshot. Every seat starts disconnected.
    #[must_use]
    pub fn from_snapshot(snapshot: RoomSnapshot, rules: RulesConfig) -> Self {
        let mut seats = snapshot.seats;
        for seat in seats.iter_mut().flatten() {
            seat.connected = false;
            seat.connection = None;
        }
        Self {
            code: snapshot.code,
            status: snapshot.status,
            seats,
            game: snapshot.game,
            engine: TurnEngine::new(rules),
            created_at: snapshot.created_at,
            last_activity: snapshot.last_activity,
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            code: self.code.clone(),
            status: self.status,
            seats: self.seats.clone(),
            game: self.game.clone(),
            created_at: self.created_at,
            last_activity: self.last_activity,
        }
    }

    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    #[must_use]
    pub fn status(&self) -> RoomStatus {
        self.status
    }

    #[must_use]
    pub fn game(&self) -> Option<&GameState> {
        self.game.as_ref()
    }

    #[must_use]
    pub fn engine(&self) -> &TurnEngine {
        &self.engine
    }

    #[must_use]
    pub fn seat(&self, seat: Seat) -> Option<&SeatState> {
        self.seats[seat.index()].as_ref()
    }

    #[must_use]
    pub fn last_activity(&self) -> SystemTime {
        self.last_activity
    }

    pub fn touch(&mut self) {
        self.last_activity = SystemTime::now();
    }

    /// The seat bound to a connection.
    #[must_use]
    pub fn seat_of(&self, connection: ConnectionId) -> Option<Seat> {
        Seat::BOTH
            .into_iter()
            .find(|&s| self.seat(s).is_some_and(|st| st.connection == Some(connection)))
    }

    /// The live connection of a seat.
    #[must_use]
    pub fn connection(&self, seat: Seat) -> Option<ConnectionId> {
        self.seat(seat)
            .filter(|st| st.connected)
            .and_then(|st| st.connection)
    }

    fn seat_of_identity(&self, identity: &str) -> Option<Seat> {
        Seat::BOTH
            .into_iter()
            .find(|&s| self.seat(s).is_some_and(|st| st.info.identity == identity))
    }

    /// Seat an identity, or rebind its connection if it already has a seat.
    pub fn join(&mut self, info: PlayerInfo, connection: ConnectionId) -> Result<JoinOutcome, SessionError> {
        if let Some(seat) = self.seat_of_identity(&info.identity) {
            if let Some(state) = self.seats[seat.index()].as_mut() {
                state.connected = true;
                state.connection = Some(connection);
            }
            info!(room = %self.code, identity = %info.identity, ?seat, "rejoined");
            return Ok(JoinOutcome::Rejoined(seat));
        }
        if self.status == RoomStatus::Finished {
            return Err(SessionError::RoomFinished);
        }

        let seat = match (&self.seats[0], &self.seats[1]) {
            (None, _) => Seat::A,
            (Some(_), None) => Seat::B,
            (Some(_), Some(_)) => return Err(SessionError::RoomFull),
        };
        info!(room = %self.code, identity = %info.identity, ?seat, "seated");
        self.seats[seat.index()] = Some(SeatState {
            info,
            connected: true,
            connection: Some(connection),
        });

        let both_seated = self.seats.iter().all(Option::is_some);
        Ok(if both_seated && self.game.is_none() {
            JoinOutcome::Ready(seat)
        } else {
            JoinOutcome::Waiting(seat)
        })
    }

    /// Mark the seat bound to `connection` as disconnected.
    pub fn disconnect(&mut self, connection: ConnectionId) -> Option<Seat> {
        let seat = self.seat_of(connection)?;
        if let Some(state) = self.seats[seat.index()].as_mut() {
            state.connected = false;
            state.connection = None;
        }
        info!(room = %self.code, ?seat, "disconnected");
        Some(seat)
    }

    /// Deal decks from `catalog` and open the first turn.
    pub fn start_game(&mut self, catalog: &CardCatalog, seed: u64) -> Result<(), CatalogError> {
        let mut game = GameState::from_catalog(catalog, self.engine.config(), seed)?;
        self.engine.start_game(&mut game);
        self.game = Some(game);
        self.status = RoomStatus::Playing;
        info!(room = %self.code, seed, cards = catalog.len(), "match started");
        Ok(())
    }

    /// Apply an action submitted by `seat`.
    pub fn apply_action(&mut self, seat: Seat, action: GameAction) -> Result<Applied, SessionError> {
        if self.seat(seat).is_none() {
            return Err(SessionError::NotSeated);
        }
        let game = match (self.status, self.game.as_mut()) {
            (RoomStatus::Waiting, _) | (_, None) => return Err(SessionError::NotStarted),
            (_, Some(game)) => game,
        };
        let before = game.turn_number;
        let action = action_from_seat(seat, action);
        self.engine.apply_action(game, seat.side(), &action)?;

        let applied = Applied {
            turn_changed: game.turn_number != before,
            game_over: game.is_over(),
        };
        if applied.game_over {
            self.status = RoomStatus::Finished;
        }
        debug!(room = %self.code, ?seat, ?action, "action applied");
        Ok(applied)
    }

    /// End the turn numbered `turn_number` on behalf of the side to move.
    ///
    /// Does nothing, and returns `false`, if that turn is already over.
    pub fn force_end_turn(&mut self, turn_number: u32) -> bool {
        let Some(game) = self.game.as_mut() else {
            return false;
        };
        if self.status != RoomStatus::Playing || game.turn_number != turn_number {
            return false;
        }
        let side = game.current_turn;
        if self.engine.end_turn(game, side).is_err() {
            return false;
        }
        info!(room = %self.code, %side, turn = turn_number, "turn timed out");
        if game.is_over() {
            self.status = RoomStatus::Finished;
        }
        true
    }

    /// The turn number currently running, while the match is live.
    #[must_use]
    pub fn live_turn(&self) -> Option<u32> {
        match (&self.game, self.status) {
            (Some(game), RoomStatus::Playing) => Some(game.turn_number),
            _ => None,
        }
    }

    #[must_use]
    pub fn view(&self, seat: Seat) -> Option<GameView> {
        self.game.as_ref().map(|game| GameView::for_seat(game, seat))
    }

    /// `GAME_STATE` or `GAME_OVER` for `seat`, once the match has started.
    #[must_use]
    pub fn state_message(&self, seat: Seat) -> Option<ServerMessage> {
        self.view(seat).map(ServerMessage::for_view)
    }

    #[must_use]
    pub fn room_info(&self, seat: Seat) -> ServerMessage {
        let players = Seat::BOTH
            .into_iter()
            .filter_map(|s| {
                self.seat(s).map(|st| SeatInfo {
                    seat: s,
                    identity: st.info.identity.clone(),
                    display_name: st.info.display_name.clone(),
                    avatar: st.info.avatar.clone(),
                    connected: st.connected,
                })
            })
            .collect();
        ServerMessage::RoomInfo {
            room_code: self.code.clone(),
            status: self.status,
            players,
            seat,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, CardId};
    use crate::core::Target;

    fn catalog() -> CardCatalog {
        CardCatalog::from_cards((1..=5).map(|n| Card::minion(CardId::new(n), format!("M{n}"), 1, 1, 2)).collect())
    }

    fn started() -> Room {
        let mut room = Room::new("ABC234", RulesConfig::default().with_deck_size(10));
        room.join(PlayerInfo::new("alice"), ConnectionId(1)).unwrap();
        room.join(PlayerInfo::new("bob"), ConnectionId(2)).unwrap();
        room.start_game(&catalog(), 7).unwrap();
        room
    }

    #[test]
    fn test_join_order() {
        let mut room = Room::new("ABC234", RulesConfig::default());
        assert_eq!(room.join(PlayerInfo::new("alice"), ConnectionId(1)), Ok(JoinOutcome::Waiting(Seat::A)));
        assert_eq!(room.join(PlayerInfo::new("bob"), ConnectionId(2)), Ok(JoinOutcome::Ready(Seat::B)));
        assert_eq!(room.join(PlayerInfo::new("carol"), ConnectionId(3)), Err(SessionError::RoomFull));
        assert_eq!(SessionError::RoomFull.to_string(), "room is full");
    }

    #[test]
    fn test_rejoin_rebinds_connection() {
        let mut room = started();
        assert_eq!(room.disconnect(ConnectionId(2)), Some(Seat::B));
        assert_eq!(room.connection(Seat::B), None);

        assert_eq!(room.join(PlayerInfo::new("bob"), ConnectionId(9)), Ok(JoinOutcome::Rejoined(Seat::B)));
        assert_eq!(room.seat_of(ConnectionId(9)), Some(Seat::B));
        assert_eq!(room.connection(Seat::B), Some(ConnectionId(9)));
    }

    #[test]
    fn test_start_game_deals_and_opens_turn() {
        let room = started();
        let game = room.game().unwrap();
        assert_eq!(room.status(), RoomStatus::Playing);
        assert_eq!(game.player(Side::Player).max_mana, 1);
        // 3 opening cards + first draw; the second side gets 4 opening cards.
        assert_eq!(game.player(Side::Player).hand.len(), 4);
        assert_eq!(game.player(Side::Opponent).hand.len(), 4);
    }

    #[test]
    fn test_actions_before_start() {
        let mut room = Room::new("ABC234", RulesConfig::default());
        room.join(PlayerInfo::new("alice"), ConnectionId(1)).unwrap();
        assert_eq!(room.apply_action(Seat::A, GameAction::EndTurn), Err(SessionError::NotStarted));
        assert_eq!(room.apply_action(Seat::B, GameAction::EndTurn), Err(SessionError::NotSeated));
    }

    #[test]
    fn test_off_turn_action_rejected() {
        let mut room = started();
        assert_eq!(
            room.apply_action(Seat::B, GameAction::EndTurn),
            Err(SessionError::Action(ActionError::NotYourTurn))
        );

        let applied = room.apply_action(Seat::A, GameAction::EndTurn).unwrap();
        assert!(applied.turn_changed);
        assert!(!applied.game_over);
        assert!(room.view(Seat::B).unwrap().is_my_turn());
    }

    #[test]
    fn test_seat_b_targets_are_translated() {
        let mut room = started();
        room.apply_action(Seat::A, GameAction::EndTurn).unwrap();
        let game = room.game.as_mut().unwrap();
        game.player_mut(Side::Opponent).weapon = Some(crate::cards::WeaponInstance::equip(
            crate::core::EntityId(500),
            &Card::weapon(CardId::new(9), "Axe", 1, 3, 2),
        ));

        // Seat B aims at "the opponent", which is seat A's hero.
        room.apply_action(
            Seat::B,
            GameAction::HeroAttack {
                target_id: Target::Hero(Side::Opponent),
            },
        )
        .unwrap();
        assert_eq!(room.game().unwrap().player(Side::Player).health, 27);
    }

    #[test]
    fn test_force_end_turn_once() {
        let mut room = started();
        assert!(room.force_end_turn(1));
        assert!(!room.force_end_turn(1));
        assert_eq!(room.live_turn(), Some(2));
    }

    #[test]
    fn test_snapshot_round_trip() {
        let room = started();
        let bytes = bincode::serialize(&room.snapshot()).unwrap();
        let snapshot: RoomSnapshot = bincode::deserialize(&bytes).unwrap();
        let restored = Room::from_snapshot(snapshot, RulesConfig::default().with_deck_size(10));

        assert_eq!(restored.code(), "ABC234");
        assert_eq!(restored.status(), RoomStatus::Playing);
        assert_eq!(restored.connection(Seat::A), None);
        assert_eq!(restored.game().unwrap().players, room.game().unwrap().players);
    }

    #[test]
    fn test_room_info_lists_seats() {
        let room = started();
        match room.room_info(Seat::B) {
            ServerMessage::RoomInfo { players, seat, .. } => {
                assert_eq!(seat, Seat::B);
                assert_eq!(players.len(), 2);
                assert_eq!(players[0].identity, "alice");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
