//! Card plays.
//!
//! A `Play` is a fully specified card play: which card, who it targets,
//! and the extra choices some cards need. Humans assemble one step by step
//! through choice requests; the AI produces complete ones.

use serde::{Deserialize, Serialize};

use super::player::PlayerId;
use crate::board::PathId;
use crate::cards::CardId;
use crate::effects::Category;

/// A complete card play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Play {
    pub card: CardId,
    /// Required for effect cards.
    pub target: Option<PlayerId>,
    /// Category aimed at by a reversal.
    pub category: Option<Category>,
    /// Individual-lock reversal (Reversus Total only).
    pub lock: bool,
    /// Destination for Pula.
    pub pula_path: Option<PathId>,
}

impl Play {
    /// Play a value card.
    #[must_use]
    pub const fn value(card: CardId) -> Self {
        Self {
            card,
            target: None,
            category: None,
            lock: false,
            pula_path: None,
        }
    }

    /// Play an effect card on a target.
    #[must_use]
    pub const fn effect(card: CardId, target: PlayerId) -> Self {
        Self {
            card,
            target: Some(target),
            category: None,
            lock: false,
            pula_path: None,
        }
    }

    /// Aim a reversal at a category.
    #[must_use]
    pub const fn reversing(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Make a Reversus Total an individual lock.
    #[must_use]
    pub const fn locking(mut self) -> Self {
        self.lock = true;
        self
    }

    /// Choose the Pula destination.
    #[must_use]
    pub const fn to_path(mut self, path: PathId) -> Self {
        self.pula_path = Some(path);
        self
    }
}
