//! Card catalog for definition lookup and deck building.
//!
//! The `CardCatalog` stores the externally supplied card list in its
//! original order and indexes it by `CardId`. Matches are built from it by
//! expanding the catalog into a pool of card instances, shuffling the pool
//! with the match RNG and dealing one deck to each side.

use rustc_hash::FxHashMap;

use super::definition::{Card, CardId};
use super::instance::CardInstance;
use super::source::CatalogError;
use crate::core::{EntityId, GameRng, SideMap};

/// Ordered catalog of card definitions.
///
/// ## Example
///
/// ```
/// use duel_ccg::cards::{Card, CardCatalog, CardId};
///
/// let catalog = CardCatalog::from_cards(vec![
///     Card::minion(CardId::new(1), "Wisp", 0, 1, 1),
///     Card::minion(CardId::new(2), "Yeti", 4, 4, 5),
/// ]);
///
/// assert_eq!(catalog.get(CardId::new(2)).unwrap().name, "Yeti");
/// assert_eq!(catalog.len(), 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardCatalog {
    cards: Vec<Card>,
    index: FxHashMap<CardId, usize>,
}

impl CardCatalog {
    /// Build a catalog from an ordered card list.
    ///
    /// A later card with a duplicate id replaces the earlier one in place.
    #[must_use]
    pub fn from_cards(cards: Vec<Card>) -> Self {
        let mut catalog = Self::default();
        for card in cards {
            catalog.insert(card);
        }
        catalog
    }

    /// Parse a catalog from a JSON array of card records.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let cards: Vec<Card> = serde_json::from_str(json)?;
        if cards.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Self::from_cards(cards))
    }

    fn insert(&mut self, card: Card) {
        match self.index.get(&card.id) {
            Some(&slot) => self.cards[slot] = card,
            None => {
                self.index.insert(card.id, self.cards.len());
                self.cards.push(card);
            }
        }
    }

    /// Get a card definition by ID.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.index.get(&id).map(|&slot| &self.cards[slot])
    }

    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.index.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// Deal one deck of `deck_size` cards to each side.
    ///
    /// The catalog is repeated in order until the pool holds two decks'
    /// worth of cards, then the pool is shuffled and split: the first half
    /// goes to `Side::Player`, the second to `Side::Opponent`. Every card
    /// instance gets a fresh id from `next_id`.
    pub fn deal_decks(
        &self,
        deck_size: usize,
        next_id: &mut EntityId,
        rng: &mut GameRng,
    ) -> Result<SideMap<Vec<CardInstance>>, CatalogError> {
        if self.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut pool: Vec<CardInstance> = self
            .cards
            .iter()
            .cycle()
            .take(deck_size * 2)
            .map(|card| CardInstance::new(next_id.bump(), card.clone()))
            .collect();
        rng.shuffle(&mut pool);

        let opponent = pool.split_off(deck_size);
        Ok(SideMap {
            player: pool,
            opponent,
        })
    }
}

impl FromIterator<Card> for CardCatalog {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        Self::from_cards(iter.into_iter().collect())
    }
}
