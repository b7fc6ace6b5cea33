//! Effect application.
//!
//! `apply_effect` writes one effect onto one seat. Card placement (pile
//! replacement, locking, target expansion) happens in
//! [`play_card`](crate::rules::play_card), which calls this once per
//! expanded target.
//!
//! ## Precedence
//!
//! 1. Imunidade on the target blocks Menos and Desce outright.
//! 2. While a global inversion is active, every invertible kind is replaced
//!    by its inverse before it lands. Reversal cards and Pula pass through.
//! 3. Score and movement kinds overwrite the target's current effect.
//! 4. Reversals flip a category: individually (optionally locking it) or
//!    globally across every seat whose category is not locked.

use crate::board::FieldEffectKind;
use crate::cards::Card;
use crate::core::{AnnouncementStyle, GameState, PlayerId};

use super::effect::{Category, EffectKind};

const ANNOUNCE_MS: u64 = 1500;

/// An effect about to be applied: the kind plus reversal options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cast {
    pub kind: EffectKind,
    pub category: Option<Category>,
    pub lock: bool,
}

impl Cast {
    /// A plain effect with no reversal options.
    #[must_use]
    pub const fn new(kind: EffectKind) -> Self {
        Self {
            kind,
            category: None,
            lock: false,
        }
    }

    /// The global inversion, with no card behind it.
    #[must_use]
    pub const fn global_reversal() -> Self {
        Self::new(EffectKind::ReversusTotal)
    }

    /// Read the cast off a played effect card.
    #[must_use]
    pub fn from_card(card: &Card) -> Option<Self> {
        card.effect().map(|kind| Self {
            kind,
            category: card.reversed_category,
            lock: card.locked,
        })
    }
}

/// Apply `cast` to `target`. An unknown target is a no-op.
pub fn apply_effect(state: &mut GameState, cast: Cast, target: PlayerId, caster: PlayerId) {
    let Some(target_name) = state.players.get(target).map(|p| p.name.clone()) else {
        log::debug!("effect {} aimed at unknown seat {target}", cast.kind);
        return;
    };
    let caster_name = state.name(caster).to_owned();
    let mut kind = cast.kind;

    if matches!(kind, EffectKind::Menos | EffectKind::Desce)
        && state.has_field_effect(target, FieldEffectKind::Imunidade)
    {
        state.push_log(format!("{target_name} is immune to {kind} this round!"));
        return;
    }

    if state.global_inversion && kind != EffectKind::ReversusTotal {
        if let Some(inverted) = kind.inverse() {
            state.push_log(format!("Reversus Total turned {kind} into {inverted}!"));
            kind = inverted;
        }
    }

    if cast.lock {
        state.announce("REVERSUS INDIVIDUAL!", AnnouncementStyle::Reversus, ANNOUNCE_MS);
    } else {
        let style = match kind {
            EffectKind::Reversus => AnnouncementStyle::Reversus,
            EffectKind::ReversusTotal => AnnouncementStyle::ReversusTotal,
            _ => AnnouncementStyle::Effect,
        };
        state.announce(kind.to_string(), style, ANNOUNCE_MS);
    }

    if let Some(score) = kind.as_score() {
        state.players[target].effects.score = Some(score);
    } else if let Some(movement) = kind.as_movement() {
        let effects = &mut state.players[target].effects;
        let overwrote_pula =
            effects.movement == Some(crate::effects::MoveEffect::Pula) && kind == EffectKind::Pula;
        effects.movement = Some(movement);
        if overwrote_pula {
            state.push_log(format!("{target_name} was already under Pula; the new one replaces it."));
        }
    } else if cast.lock {
        let Some(category) = cast.category else {
            log::warn!("individual reversal on {target_name} without a category");
            return;
        };
        let result = invert_category(state, target, category);
        state.push_log(format!(
            "{caster_name} used Reversus Individual on {target_name}, locking their {category} effect at {result}."
        ));
        return;
    } else if kind == EffectKind::ReversusTotal {
        apply_global_inversion(state);
        state.push_log(format!(
            "{caster_name} used REVERSUS TOTAL! Every unlocked effect was inverted!"
        ));
        return;
    } else {
        let Some(category) = cast.category else {
            log::warn!("Reversus on {target_name} without a category");
            return;
        };
        let result = invert_category(state, target, category);
        state.push_log(format!(
            "{caster_name} used Reversus on {target_name}, turning their {category} effect into {result}."
        ));
        return;
    }

    state.push_log(format!("{caster_name} used {kind} on {target_name}."));
}

/// Flip one category on one seat. Returns the resulting effect name.
fn invert_category(state: &mut GameState, target: PlayerId, category: Category) -> String {
    let effects = &mut state.players[target].effects;
    match category {
        Category::Score => {
            effects.score = effects.score.map(|e| e.inverse());
            effects.score.map_or_else(|| "none".to_owned(), |e| e.to_string())
        }
        Category::Movement => {
            effects.movement = effects.movement.and_then(|e| e.inverse());
            effects.movement.map_or_else(|| "none".to_owned(), |e| e.to_string())
        }
    }
}

/// Raise the global inversion flag and flip every unlocked category.
/// Pula is exempt.
fn apply_global_inversion(state: &mut GameState) {
    state.global_inversion = true;
    let seats: Vec<PlayerId> = state.players.player_ids().collect();
    for seat in seats {
        let score_locked = state.is_category_locked(seat, Category::Score);
        let movement_locked = state.is_category_locked(seat, Category::Movement);
        let effects = &mut state.players[seat].effects;
        if !score_locked {
            effects.score = effects.score.map(|e| e.inverse());
        }
        if !movement_locked && effects.movement != Some(crate::effects::MoveEffect::Pula) {
            effects.movement = effects.movement.and_then(|e| e.inverse());
        }
    }
}
