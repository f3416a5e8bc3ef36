//! Game state: both heroes, their cards, and match progression.
//!
//! ## PlayerState
//!
//! One side's hero and cards:
//! - Health, armor, mana crystals
//! - Hand, deck (draw from the front) and board, in order
//! - Equipped weapon and per-turn hero attack counter
//!
//! ## GameState
//!
//! The authoritative match state:
//! - Both PlayerStates, labeled from the engine's own point of view
//! - Whose turn, turn number, phase, winner
//! - UI selection (optional for headless play)
//! - Entity id allocator and RNG, so a stored state resumes exactly
//!
//! Hand, deck and board are `im::Vector`s, so cloning a state for AI
//! lookahead is O(1).

use im::Vector;
use serde::{Deserialize, Serialize};

use super::config::{DrawPolicy, RulesConfig};
use super::entity::EntityId;
use super::rng::GameRng;
use super::side::{Side, SideMap};
use crate::cards::{CardCatalog, CardInstance, CatalogError, MinionInstance, WeaponInstance};

/// Match phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    #[default]
    Playing,
    GameOver,
}

/// What happened when a side tried to draw a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawOutcome {
    /// The card went to hand.
    Drawn(EntityId),
    /// The hand was full; the card was destroyed.
    Burned(EntityId),
    /// The deck was empty and nothing happened.
    Empty,
    /// The deck was empty; the hero took this much fatigue damage.
    Fatigue(i32),
}

/// One side's hero and cards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    pub health: i32,
    pub max_health: i32,
    pub armor: i32,
    pub mana: u8,
    pub max_mana: u8,
    pub hand: Vector<CardInstance>,
    /// Front is the top of the deck.
    pub deck: Vector<CardInstance>,
    /// Left to right.
    pub board: Vector<MinionInstance>,
    pub weapon: Option<WeaponInstance>,
    pub hero_attacks_this_turn: u8,
    /// Damage the next empty-deck draw deals under `DrawPolicy::Fatigue`.
    pub fatigue: i32,
}

impl PlayerState {
    /// A hero with full health and no cards.
    #[must_use]
    pub fn new(health: i32) -> Self {
        Self {
            health,
            max_health: health,
            armor: 0,
            mana: 0,
            max_mana: 0,
            hand: Vector::new(),
            deck: Vector::new(),
            board: Vector::new(),
            weapon: None,
            hero_attacks_this_turn: 0,
            fatigue: 0,
        }
    }

    /// Set the deck (builder pattern).
    #[must_use]
    pub fn with_deck(mut self, deck: impl IntoIterator<Item = CardInstance>) -> Self {
        self.deck = deck.into_iter().collect();
        self
    }

    /// Board position of a minion.
    #[must_use]
    pub fn minion_index(&self, id: EntityId) -> Option<usize> {
        self.board.iter().position(|m| m.id == id)
    }

    #[must_use]
    pub fn minion(&self, id: EntityId) -> Option<&MinionInstance> {
        self.board.iter().find(|m| m.id == id)
    }

    pub fn minion_mut(&mut self, id: EntityId) -> Option<&mut MinionInstance> {
        let index = self.minion_index(id)?;
        self.board.get_mut(index)
    }

    #[must_use]
    pub fn hand_index(&self, id: EntityId) -> Option<usize> {
        self.hand.iter().position(|c| c.id == id)
    }

    /// True when any minion on this board has Taunt.
    #[must_use]
    pub fn has_taunt(&self) -> bool {
        self.board
            .iter()
            .any(|m| m.has_keyword(crate::cards::Keyword::Taunt))
    }

    /// Hero attack value: the equipped weapon's attack, if any.
    #[must_use]
    pub fn hero_attack(&self) -> i32 {
        self.weapon.as_ref().map_or(0, |w| w.attack)
    }

    /// Deal damage to the hero; armor absorbs first. Returns the damage dealt.
    pub fn damage_hero(&mut self, amount: i32) -> i32 {
        if amount <= 0 {
            return 0;
        }
        let absorbed = amount.min(self.armor);
        self.armor -= absorbed;
        self.health -= amount - absorbed;
        amount
    }

    /// Restore hero health up to max health. Returns the amount restored.
    pub fn heal_hero(&mut self, amount: i32) -> i32 {
        let restored = amount.max(0).min(self.max_health - self.health).max(0);
        self.health += restored;
        restored
    }

    /// Draw the top card of the deck.
    pub fn draw(&mut self, config: &RulesConfig) -> DrawOutcome {
        match self.deck.pop_front() {
            Some(card) if self.hand.len() >= config.max_hand => DrawOutcome::Burned(card.id),
            Some(card) => {
                let id = card.id;
                self.hand.push_back(card);
                DrawOutcome::Drawn(id)
            }
            None => match config.draw_policy {
                DrawPolicy::Skip => DrawOutcome::Empty,
                DrawPolicy::Fatigue => {
                    self.fatigue += 1;
                    self.damage_hero(self.fatigue);
                    DrawOutcome::Fatigue(self.fatigue)
                }
            },
        }
    }

    /// Open a new turn: one more mana crystal, full mana, fresh attackers.
    pub fn begin_turn(&mut self, config: &RulesConfig) {
        self.max_mana = (self.max_mana + 1).min(config.max_mana);
        self.mana = self.max_mana;
        self.hero_attacks_this_turn = 0;
        for minion in self.board.iter_mut() {
            minion.refresh();
        }
    }

    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }
}

/// The authoritative state of one match.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub players: SideMap<PlayerState>,
    pub current_turn: Side,
    /// Starts at 1 and increases on every end of turn.
    pub turn_number: u32,
    pub phase: Phase,
    pub selected_card: Option<EntityId>,
    pub selected_minion: Option<EntityId>,
    /// `None` with `Phase::GameOver` is a draw.
    pub winner: Option<Side>,
    next_entity: EntityId,
    rng: GameRng,
}

impl GameState {
    /// Create a state with two empty heroes. `Side::Player` moves first.
    #[must_use]
    pub fn new(config: &RulesConfig, seed: u64) -> Self {
        Self {
            players: SideMap::new(|_| PlayerState::new(config.starting_health)),
            current_turn: Side::Player,
            turn_number: 1,
            phase: Phase::Playing,
            selected_card: None,
            selected_minion: None,
            winner: None,
            next_entity: EntityId::FIRST,
            rng: GameRng::new(seed),
        }
    }

    /// Create a state and deal both decks from a catalog.
    pub fn from_catalog(
        catalog: &CardCatalog,
        config: &RulesConfig,
        seed: u64,
    ) -> Result<Self, CatalogError> {
        let mut state = Self::new(config, seed);
        let mut deck_rng = state.rng.fork();
        let decks = catalog.deal_decks(config.deck_size, &mut state.next_entity, &mut deck_rng)?;
        for (side, deck) in [(Side::Player, decks.player), (Side::Opponent, decks.opponent)] {
            state.players[side].deck = deck.into_iter().collect();
        }
        Ok(state)
    }

    #[must_use]
    pub fn player(&self, side: Side) -> &PlayerState {
        &self.players[side]
    }

    pub fn player_mut(&mut self, side: Side) -> &mut PlayerState {
        &mut self.players[side]
    }

    /// Allocate a fresh entity id.
    pub fn alloc_entity(&mut self) -> EntityId {
        self.next_entity.bump()
    }

    /// Put a card at the bottom of a side's deck, with a fresh id.
    ///
    /// Used to build states by hand (tests, AI benchmarks).
    pub fn add_to_deck(&mut self, side: Side, card: crate::cards::Card) -> EntityId {
        let id = self.alloc_entity();
        self.players[side].deck.push_back(CardInstance::new(id, card));
        id
    }

    /// Put a card straight into a side's hand, with a fresh id.
    pub fn add_to_hand(&mut self, side: Side, card: crate::cards::Card) -> EntityId {
        let id = self.alloc_entity();
        self.players[side].hand.push_back(CardInstance::new(id, card));
        id
    }

    /// Put a minion straight onto a side's board, with a fresh id.
    pub fn add_to_board(&mut self, side: Side, card: &crate::cards::Card) -> EntityId {
        let id = self.alloc_entity();
        self.players[side].board.push_back(MinionInstance::summon(id, card));
        id
    }

    pub fn rng_mut(&mut self) -> &mut GameRng {
        &mut self.rng
    }

    /// Which side controls a minion.
    #[must_use]
    pub fn minion_owner(&self, id: EntityId) -> Option<Side> {
        Side::BOTH
            .into_iter()
            .find(|&side| self.players[side].minion_index(id).is_some())
    }

    #[must_use]
    pub fn minion(&self, id: EntityId) -> Option<&MinionInstance> {
        self.players.iter().find_map(|(_, p)| p.minion(id))
    }

    pub fn minion_mut(&mut self, id: EntityId) -> Option<&mut MinionInstance> {
        let side = self.minion_owner(id)?;
        self.players[side].minion_mut(id)
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// End the match. `None` is a draw.
    pub fn finish(&mut self, winner: Option<Side>) {
        self.phase = Phase::GameOver;
        self.winner = winner;
        self.selected_card = None;
        self.selected_minion = None;
    }

    pub fn clear_selection(&mut self) {
        self.selected_card = None;
        self.selected_minion = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, CardId, Keyword};

    fn wisp(n: u32) -> Card {
        Card::minion(CardId::new(n), "Wisp", 0, 1, 1)
    }

    #[test]
    fn test_new_state() {
        let state = GameState::new(&RulesConfig::default(), 1);
        assert_eq!(state.current_turn, Side::Player);
        assert_eq!(state.turn_number, 1);
        assert_eq!(state.phase, Phase::Playing);
        assert_eq!(state.player(Side::Opponent).health, 30);
        assert!(state.player(Side::Player).deck.is_empty());
    }

    #[test]
    fn test_alloc_entity_is_unique() {
        let mut state = GameState::new(&RulesConfig::default(), 1);
        let a = state.alloc_entity();
        let b = state.alloc_entity();
        assert_ne!(a, b);
    }

    #[test]
    fn test_draw_into_hand() {
        let config = RulesConfig::default();
        let mut player = PlayerState::new(30);
        player.deck.push_back(CardInstance::new(EntityId(1), wisp(1)));
        player.deck.push_back(CardInstance::new(EntityId(2), wisp(2)));

        assert_eq!(player.draw(&config), DrawOutcome::Drawn(EntityId(1)));
        assert_eq!(player.hand.len(), 1);
        assert_eq!(player.deck.len(), 1);
    }

    #[test]
    fn test_draw_burns_on_full_hand() {
        let config = RulesConfig::default();
        let mut player = PlayerState::new(30);
        for n in 0..10 {
            player.hand.push_back(CardInstance::new(EntityId(100 + n), wisp(n)));
        }
        player.deck.push_back(CardInstance::new(EntityId(1), wisp(1)));

        assert_eq!(player.draw(&config), DrawOutcome::Burned(EntityId(1)));
        assert_eq!(player.hand.len(), 10);
        assert!(player.deck.is_empty());
    }

    #[test]
    fn test_empty_deck_policies() {
        let mut player = PlayerState::new(30);
        assert_eq!(player.draw(&RulesConfig::default()), DrawOutcome::Empty);
        assert_eq!(player.health, 30);

        let fatigue = RulesConfig::default().with_draw_policy(DrawPolicy::Fatigue);
        assert_eq!(player.draw(&fatigue), DrawOutcome::Fatigue(1));
        assert_eq!(player.draw(&fatigue), DrawOutcome::Fatigue(2));
        assert_eq!(player.health, 27);
    }

    #[test]
    fn test_armor_absorbs_first() {
        let mut player = PlayerState::new(30);
        player.armor = 3;
        assert_eq!(player.damage_hero(5), 5);
        assert_eq!(player.armor, 0);
        assert_eq!(player.health, 28);
    }

    #[test]
    fn test_heal_hero_caps() {
        let mut player = PlayerState::new(30);
        player.damage_hero(4);
        assert_eq!(player.heal_hero(10), 4);
        assert_eq!(player.health, 30);
    }

    #[test]
    fn test_begin_turn_caps_mana() {
        let config = RulesConfig::default();
        let mut player = PlayerState::new(30);
        for _ in 0..12 {
            player.begin_turn(&config);
        }
        assert_eq!(player.max_mana, 10);
        assert_eq!(player.mana, 10);
    }

    #[test]
    fn test_minion_lookup() {
        let mut state = GameState::new(&RulesConfig::default(), 1);
        let id = state.add_to_board(Side::Opponent, &wisp(1).with_keyword(Keyword::Taunt));

        assert_eq!(state.minion_owner(id), Some(Side::Opponent));
        assert!(state.player(Side::Opponent).has_taunt());
        assert!(!state.player(Side::Player).has_taunt());

        state.minion_mut(id).unwrap().attack = 4;
        assert_eq!(state.minion(id).unwrap().attack, 4);
    }

    #[test]
    fn test_from_catalog_deals_decks() {
        let catalog = CardCatalog::from_cards(vec![wisp(1), wisp(2)]);
        let config = RulesConfig::default().with_deck_size(8);
        let state = GameState::from_catalog(&catalog, &config, 5).unwrap();

        assert_eq!(state.player(Side::Player).deck.len(), 8);
        assert_eq!(state.player(Side::Opponent).deck.len(), 8);
    }

    #[test]
    fn test_bincode_round_trip() {
        let mut state = GameState::new(&RulesConfig::default(), 9);
        state.add_to_board(Side::Player, &wisp(1).with_keyword(Keyword::DivineShield));
        state.add_to_hand(Side::Opponent, wisp(2));

        let bytes = bincode::serialize(&state).unwrap();
        let mut restored: GameState = bincode::deserialize(&bytes).unwrap();

        assert_eq!(restored.players, state.players);
        assert_eq!(restored.alloc_entity(), state.clone().alloc_entity());
    }
}
