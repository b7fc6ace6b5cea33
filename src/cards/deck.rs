//! The two draw piles and the card id allocator.
//!
//! Cards are drawn from the back of a pile. Returned cards go to the back as
//! well and get mixed in by the shuffle at the next round reset.

use serde::{Deserialize, Serialize};

use super::card::{Card, CardFace, CardId, CardType};
use crate::core::{GameConfig, GameRng};

/// Value and effect draw piles.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decks {
    pub value: Vec<Card>,
    pub effect: Vec<Card>,
    next_id: u32,
}

impl Decks {
    /// Empty piles. Mostly useful for hand-built test states.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            value: Vec::new(),
            effect: Vec::new(),
            next_id: 1,
        }
    }

    /// Build both piles from the configured composition and shuffle them.
    #[must_use]
    pub fn build(config: &GameConfig, rng: &mut GameRng) -> Self {
        let mut decks = Self::empty();
        for &(value, count) in &config.value_deck {
            for _ in 0..count {
                let card = decks.new_card(CardFace::Value(value));
                decks.value.push(card);
            }
        }
        for &(kind, count) in &config.effect_deck {
            for _ in 0..count {
                let card = decks.new_card(CardFace::Effect(kind));
                decks.effect.push(card);
            }
        }
        decks.shuffle(rng);
        decks
    }

    /// Allocate a fresh card that is not placed anywhere yet.
    pub fn new_card(&mut self, face: CardFace) -> Card {
        let id = CardId(self.next_id);
        self.next_id += 1;
        Card::new(id, face)
    }

    /// Allocate an ephemeral card (ability-minted or mirrored).
    pub fn mint(&mut self, face: CardFace) -> Card {
        let mut card = self.new_card(face);
        card.ephemeral = true;
        card
    }

    /// The id the next allocated card will get.
    #[must_use]
    pub fn next_id(&self) -> CardId {
        CardId(self.next_id)
    }

    #[must_use]
    pub fn pile(&self, card_type: CardType) -> &Vec<Card> {
        match card_type {
            CardType::Value => &self.value,
            CardType::Effect => &self.effect,
        }
    }

    fn pile_mut(&mut self, card_type: CardType) -> &mut Vec<Card> {
        match card_type {
            CardType::Value => &mut self.value,
            CardType::Effect => &mut self.effect,
        }
    }

    /// Draw the top card of a pile.
    pub fn draw(&mut self, card_type: CardType) -> Option<Card> {
        self.pile_mut(card_type).pop()
    }

    /// Put a card back into its pile. Ephemeral cards are dropped instead.
    pub fn discard(&mut self, mut card: Card) {
        if card.ephemeral {
            log::debug!("dropping ephemeral card {} ({})", card.id, card);
            return;
        }
        card.reset_annotations();
        let card_type = card.card_type();
        self.pile_mut(card_type).push(card);
    }

    /// Put several cards back.
    pub fn discard_all(&mut self, cards: impl IntoIterator<Item = Card>) {
        for card in cards {
            self.discard(card);
        }
    }

    /// Pull a specific card out of a pile.
    pub fn take(&mut self, card_type: CardType, id: CardId) -> Option<Card> {
        let pile = self.pile_mut(card_type);
        let index = pile.iter().position(|c| c.id == id)?;
        Some(pile.remove(index))
    }

    /// Shuffle both piles.
    pub fn shuffle(&mut self, rng: &mut GameRng) {
        rng.shuffle(&mut self.value);
        rng.shuffle(&mut self.effect);
    }
}
