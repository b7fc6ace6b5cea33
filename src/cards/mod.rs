//! Cards and decks.
//!
//! Value cards carry a number that feeds the round score; effect cards carry
//! an [`EffectKind`](crate::effects::EffectKind). Every card has a unique
//! [`CardId`] and lives in exactly one place at a time: a draw pile, a hand,
//! a played pile, or a resto slot.

mod card;
mod deck;

pub use card::{Card, CardFace, CardId, CardType};
pub use deck::Decks;
