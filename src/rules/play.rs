//! Card placement.
//!
//! `play_card` validates a [`Play`] completely before touching the state,
//! so a rejected play leaves hands and piles exactly as they were.
//!
//! ## Value cards
//!
//! Appended to the caster's played-value pile while it holds fewer than the
//! cap; otherwise the card goes back to the value deck. Either way it
//! becomes the caster's next resto.
//!
//! ## Effect cards
//!
//! Placed on the primary target's effect pile, replacing any unlocked card
//! of the same category, then applied to every expanded target.

use crate::board::PathId;
use crate::cards::{CardFace, CardId};
use crate::core::{AiKind, GameState, Play, PlayerId};
use crate::effects::{apply_effect, expand_targets, pula_destinations, Cast, Category, EffectKind};
use crate::error::{EngineError, EngineResult};

use super::scoring::refresh_live_scores;

/// Play a card from `caster`'s hand.
pub fn play_card(state: &mut GameState, caster: PlayerId, play: &Play) -> EngineResult<()> {
    let face = state
        .player(caster)?
        .card_in_hand(play.card)
        .map(|c| c.face)
        .ok_or(EngineError::CardNotInHand {
            player: caster,
            card: play.card,
        })?;

    match face {
        CardFace::Value(value) => play_value(state, caster, play.card, value),
        CardFace::Effect(kind) => play_effect(state, caster, play, kind)?,
    }

    state.played_any_card_this_turn = true;
    refresh_live_scores(state);
    Ok(())
}

fn play_value(state: &mut GameState, caster: PlayerId, card_id: CardId, value: u8) {
    let cap = state.config.max_played_value_cards;
    let player = &mut state.players[caster];
    let Some(card) = player.take_from_hand(card_id) else {
        return;
    };
    player.next_resto = Some(card.id);
    player.played_value_this_turn = true;
    let overflow = if player.played.value.len() < cap {
        player.played.value.push(card);
        None
    } else {
        Some(card)
    };
    let name = player.name.clone();
    if let Some(card) = overflow {
        state.decks.discard(card);
    }
    state.push_log(format!("{name} played the value card {value}."));
}

fn play_effect(state: &mut GameState, caster: PlayerId, play: &Play, kind: EffectKind) -> EngineResult<()> {
    let target = play.target.ok_or(EngineError::MissingTarget(play.card))?;
    state.player(target)?;

    let individual = kind == EffectKind::Reversus || (kind == EffectKind::ReversusTotal && play.lock);
    let reversed_category = if individual {
        Some(play.category.ok_or(EngineError::MissingCategory(play.card))?)
    } else {
        None
    };
    let category: Option<Category> = kind.category().or(reversed_category);

    if let Some(category) = category {
        if state.is_category_locked(target, category) {
            let message = format!(
                "{}'s {category} effect is locked by a Reversus Individual and cannot be changed!",
                state.name(target)
            );
            state.push_log(message);
            state.pending = None;
            return Err(EngineError::LockedCategory { target, category });
        }
    }

    let pula_path = if kind == EffectKind::Pula {
        resolve_pula_path(state, caster, target, play.pula_path)?
    } else {
        None
    };

    let Some(mut card) = state.players[caster].take_from_hand(play.card) else {
        return Err(EngineError::CardNotInHand {
            player: caster,
            card: play.card,
        });
    };

    let targets = expand_targets(state, caster, target, kind);
    if targets.len() > 1 {
        let message = format!("{kind} spreads across the whole cluster!");
        state.push_log(message);
    }

    card.caster = Some(caster);
    card.locked = kind == EffectKind::ReversusTotal && play.lock;
    card.reversed_category = reversed_category;

    if let Some(path) = pula_path {
        state.players[target].target_path_for_pula = Some(path);
    }

    if let Some(category) = category {
        let pile = &mut state.players[target].played.effect;
        let replaced: Vec<_> = pile
            .iter()
            .filter(|c| c.category() == Some(category))
            .map(|c| c.id)
            .collect();
        let mut returned = Vec::with_capacity(replaced.len());
        pile.retain(|c| {
            if replaced.contains(&c.id) {
                returned.push(c.clone());
                false
            } else {
                true
            }
        });
        state.decks.discard_all(returned);
    }
    state.players[target].played.effect.push(card);

    let cast = Cast {
        kind,
        category: reversed_category,
        lock: kind == EffectKind::ReversusTotal && play.lock,
    };
    for seat in targets {
        apply_effect(state, cast, seat, caster);
    }
    Ok(())
}

/// Destination for a Pula: the requested path if it is free, else the first
/// free path. Only the final boss may send a seat onto a taken path.
/// Boardless modes have no destination.
fn resolve_pula_path(
    state: &GameState,
    caster: PlayerId,
    target: PlayerId,
    requested: Option<PathId>,
) -> EngineResult<Option<PathId>> {
    if state.paths.is_empty() {
        return Ok(None);
    }
    let free = pula_destinations(state, target);
    match requested {
        Some(path) if path.index() >= state.paths.len() => {
            Err(EngineError::InvalidChoice(format!("{path} does not exist")))
        }
        Some(path) if free.contains(&path) || state.players[caster].ai == AiKind::NecroversoFinal => {
            Ok(Some(path))
        }
        Some(path) => Err(EngineError::NoLegalMove(format!("{path} is already taken"))),
        None => free
            .first()
            .copied()
            .map(Some)
            .ok_or_else(|| EngineError::NoLegalMove("no free path to jump to".to_owned())),
    }
}
