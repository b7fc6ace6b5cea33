//! Card identity and faces.

use serde::{Deserialize, Serialize};

use crate::core::PlayerId;
use crate::effects::{Category, EffectKind};

/// Globally unique card identifier. Ids are never reused within a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What is printed on the card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardFace {
    Value(u8),
    Effect(EffectKind),
}

/// Which deck a card belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardType {
    Value,
    Effect,
}

/// A physical card plus the per-play annotations it picks up on the table.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub face: CardFace,
    /// Who cast it, once played.
    pub caster: Option<PlayerId>,
    /// Set by an individual-lock reversal.
    pub locked: bool,
    /// For reversal cards: the category they were aimed at.
    pub reversed_category: Option<Category>,
    /// Minted by an ability or mirrored; never enters a deck.
    pub ephemeral: bool,
}

impl Card {
    /// Create a fresh, unplayed card.
    #[must_use]
    pub fn new(id: CardId, face: CardFace) -> Self {
        Self {
            id,
            face,
            caster: None,
            locked: false,
            reversed_category: None,
            ephemeral: false,
        }
    }

    #[must_use]
    pub fn card_type(&self) -> CardType {
        match self.face {
            CardFace::Value(_) => CardType::Value,
            CardFace::Effect(_) => CardType::Effect,
        }
    }

    #[must_use]
    pub fn is_value(&self) -> bool {
        matches!(self.face, CardFace::Value(_))
    }

    #[must_use]
    pub fn is_effect(&self) -> bool {
        matches!(self.face, CardFace::Effect(_))
    }

    /// Face value for value cards.
    #[must_use]
    pub fn value(&self) -> Option<u8> {
        match self.face {
            CardFace::Value(v) => Some(v),
            CardFace::Effect(_) => None,
        }
    }

    /// Effect kind for effect cards.
    #[must_use]
    pub fn effect(&self) -> Option<EffectKind> {
        match self.face {
            CardFace::Effect(kind) => Some(kind),
            CardFace::Value(_) => None,
        }
    }

    /// Category this card occupies on a played pile.
    ///
    /// Reversal cards occupy the category they reversed; a global reversal
    /// occupies none.
    #[must_use]
    pub fn category(&self) -> Option<Category> {
        self.effect()
            .and_then(EffectKind::category)
            .or(self.reversed_category)
    }

    /// Clear the annotations picked up while on the table.
    pub fn reset_annotations(&mut self) {
        self.caster = None;
        self.locked = false;
        self.reversed_category = None;
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.face {
            CardFace::Value(v) => write!(f, "{v}"),
            CardFace::Effect(kind) => write!(f, "{kind}"),
        }
    }
}
