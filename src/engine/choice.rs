//! Human decisions: what the engine is waiting for and how to answer.
//!
//! The suspended decision lives on the state as a [`PendingChoice`] so it
//! survives a save. The driver turns it into a [`ChoiceRequest`] listing
//! the legal options; the caller answers with a [`ChoiceResponse`].

use serde::{Deserialize, Serialize};

use crate::board::PathId;
use crate::cards::CardId;
use crate::core::{GamePhase, GameState, Play, PlayerId};
use crate::effects::{pula_destinations, reversible_categories, valid_targets, Category, EffectKind};
use crate::rules::TradeKind;

/// How a Reversus Total is cast.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReversalScope {
    /// Invert every unlocked effect on the table.
    Global,
    /// Invert and lock one category on one seat.
    Individual,
}

/// An effect card play being assembled one answer at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PendingPlay {
    pub card: CardId,
    pub kind: EffectKind,
    pub scope: Option<ReversalScope>,
    pub target: Option<PlayerId>,
    pub category: Option<Category>,
}

/// What the next answer for a pending play is about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayStep {
    Scope,
    Target,
    Category,
    Path,
    /// Everything is known; `pula_path` is filled in separately.
    Ready,
}

impl PendingPlay {
    #[must_use]
    pub const fn new(card: CardId, kind: EffectKind) -> Self {
        Self {
            card,
            kind,
            scope: None,
            target: None,
            category: None,
        }
    }

    /// The next missing piece.
    #[must_use]
    pub fn step(&self) -> PlayStep {
        let total = self.kind == EffectKind::ReversusTotal;
        if total && self.scope.is_none() {
            return PlayStep::Scope;
        }
        if self.target.is_none() {
            return PlayStep::Target;
        }
        let individual = self.kind == EffectKind::Reversus
            || (total && self.scope == Some(ReversalScope::Individual));
        if individual && self.category.is_none() {
            return PlayStep::Category;
        }
        if self.kind == EffectKind::Pula {
            return PlayStep::Path;
        }
        PlayStep::Ready
    }

    /// Phase shown while waiting on `step`.
    #[must_use]
    pub fn phase(&self) -> GamePhase {
        match self.step() {
            PlayStep::Target => GamePhase::Targeting,
            PlayStep::Scope | PlayStep::Category => GamePhase::ReversalTargeting,
            PlayStep::Path => GamePhase::PathCasting,
            PlayStep::Ready => GamePhase::Playing,
        }
    }

    /// The finished play. `None` while pieces are missing.
    #[must_use]
    pub fn to_play(&self, pula_path: Option<PathId>) -> Option<Play> {
        let mut play = Play::effect(self.card, self.target?);
        if let Some(category) = self.category {
            play = play.reversing(category);
        }
        if self.scope == Some(ReversalScope::Individual) {
            play = play.locking();
        }
        if let Some(path) = pula_path {
            play = play.to_path(path);
        }
        Some(play)
    }
}

/// A decision the engine is suspended on.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PendingChoice {
    Play(PendingPlay),
    /// A Troca the human landed on; the field walk resumes at `resume_at`.
    Trade {
        player: PlayerId,
        kind: TradeKind,
        options: Vec<PlayerId>,
        resume_at: usize,
    },
}

/// Options offered to the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChoiceRequest {
    Scope { card: CardId },
    Target { card: CardId, options: Vec<PlayerId> },
    Category { card: CardId, target: PlayerId, options: Vec<Category> },
    Path { card: CardId, target: PlayerId, options: Vec<PathId> },
    TradePartner { kind: TradeKind, options: Vec<PlayerId> },
}

impl ChoiceRequest {
    /// Describe the pending decision, with its legal options.
    #[must_use]
    pub fn from_pending(state: &GameState, pending: &PendingChoice) -> Option<Self> {
        match pending {
            PendingChoice::Trade { kind, options, .. } => Some(ChoiceRequest::TradePartner {
                kind: *kind,
                options: options.clone(),
            }),
            PendingChoice::Play(play) => {
                let card = play.card;
                match play.step() {
                    PlayStep::Scope => Some(ChoiceRequest::Scope { card }),
                    PlayStep::Target => Some(ChoiceRequest::Target {
                        card,
                        options: valid_targets(state),
                    }),
                    PlayStep::Category => play.target.map(|target| ChoiceRequest::Category {
                        card,
                        target,
                        options: reversible_categories(state, target),
                    }),
                    PlayStep::Path => play.target.map(|target| ChoiceRequest::Path {
                        card,
                        target,
                        options: pula_destinations(state, target),
                    }),
                    PlayStep::Ready => None,
                }
            }
        }
    }
}

/// An answer to a [`ChoiceRequest`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChoiceResponse {
    Scope(ReversalScope),
    Player(PlayerId),
    Category(Category),
    Path(PathId),
    /// Abandon the pending decision.
    Cancel,
}
