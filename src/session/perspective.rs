//! Seat perspective.
//!
//! The engine labels seat A's hero `PLAYER` and seat B's hero `OPPONENT`.
//! Each peer sees itself as `PLAYER`: seat B's view swaps the two heroes,
//! `current_turn` and `winner`, and hero targets in seat B's actions are
//! swapped back before they reach the engine. Minion and card ids are
//! shared by both views.
//!
//! Views are redacted: neither deck's order leaves the server, and the
//! other seat's hand is sent only as a count.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::room::Seat;
use crate::cards::{CardInstance, MinionInstance, WeaponInstance};
use crate::core::{EntityId, GameAction, GameState, Phase, PlayerState, Side};

/// One hero and its cards as a seat sees them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub health: i32,
    pub max_health: i32,
    pub armor: i32,
    pub mana: u8,
    pub max_mana: u8,
    /// `None` when the hand belongs to the other seat.
    pub hand: Option<Vector<CardInstance>>,
    pub hand_size: usize,
    pub deck_size: usize,
    pub board: Vector<MinionInstance>,
    pub weapon: Option<WeaponInstance>,
    /// Attack of the equipped weapon, 0 without one.
    pub hero_attack: i32,
    pub hero_attacks_this_turn: u8,
    pub fatigue: i32,
}

impl PlayerView {
    /// The viewing seat's own hero: the hand is visible.
    #[must_use]
    pub fn own(player: &PlayerState) -> Self {
        Self {
            hand: Some(player.hand.clone()),
            ..Self::hidden(player)
        }
    }

    /// The other seat's hero: the hand is a count.
    #[must_use]
    pub fn hidden(player: &PlayerState) -> Self {
        Self {
            health: player.health,
            max_health: player.max_health,
            armor: player.armor,
            mana: player.mana,
            max_mana: player.max_mana,
            hand: None,
            hand_size: player.hand.len(),
            deck_size: player.deck.len(),
            board: player.board.clone(),
            weapon: player.weapon.clone(),
            hero_attack: player.hero_attack(),
            hero_attacks_this_turn: player.hero_attacks_this_turn,
            fatigue: player.fatigue,
        }
    }
}

/// A game state as one seat sees it.
///
/// Carries everything a client renders; the RNG, the id allocator, deck
/// order and the other seat's hand stay on the server.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    pub player: PlayerView,
    pub opponent: PlayerView,
    pub current_turn: Side,
    pub turn_number: u32,
    pub phase: Phase,
    pub selected_card: Option<EntityId>,
    pub selected_minion: Option<EntityId>,
    pub winner: Option<Side>,
}

impl GameView {
    /// Build `seat`'s view of `state`.
    #[must_use]
    pub fn for_seat(state: &GameState, seat: Seat) -> Self {
        let own = seat.side();
        Self {
            player: PlayerView::own(state.player(own)),
            opponent: PlayerView::hidden(state.player(own.other())),
            current_turn: to_seat(seat, state.current_turn),
            turn_number: state.turn_number,
            phase: state.phase,
            selected_card: state.selected_card,
            selected_minion: state.selected_minion,
            winner: state.winner.map(|side| to_seat(seat, side)),
        }
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// True when the viewing seat is to move.
    #[must_use]
    pub fn is_my_turn(&self) -> bool {
        self.current_turn == Side::Player && !self.is_over()
    }
}

/// Translate an engine side into `seat`'s labels.
#[must_use]
pub fn to_seat(seat: Seat, side: Side) -> Side {
    match seat {
        Seat::A => side,
        Seat::B => side.other(),
    }
}

/// Translate an action submitted by `seat` into engine labels.
#[must_use]
pub fn action_from_seat(seat: Seat, action: GameAction) -> GameAction {
    match seat {
        Seat::A => action,
        Seat::B => action.mirrored(),
    }
}
