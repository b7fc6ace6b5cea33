//! Board spaces firing at the start of a round.
//!
//! Seats are visited in order. A human Troca suspends the walk on a
//! [`PendingChoice::Trade`]; [`resume_trade`] finishes the trade and picks
//! the walk up at the next seat.

use serde::{Deserialize, Serialize};

use crate::board::{FieldEffect, FieldEffectKind, Polarity, SpaceColor};
use crate::cards::{Card, CardType};
use crate::core::{AiKind, AnnouncementStyle, GamePhase, GameState, PlayerId};
use crate::engine::PendingChoice;
use crate::error::{EngineError, EngineResult};

use super::abilities::{black_hole, try_contravox, yellow_space};
use super::teams::{field_team, Seats};

/// Where the field walk stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldStep {
    /// Every seat was visited.
    Done,
    /// A human decision is pending.
    NeedsChoice,
    /// A special space ended the game.
    GameOver,
}

/// Direction of a Troca.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeKind {
    /// The lander gives their lowest value card for the other's highest.
    Fair,
    /// The lander gives their highest value card for the other's lowest.
    Unfair,
}

impl TradeKind {
    #[must_use]
    pub const fn from_field(kind: FieldEffectKind) -> Option<Self> {
        match kind {
            FieldEffectKind::TrocaJusta => Some(TradeKind::Fair),
            FieldEffectKind::TrocaInjusta => Some(TradeKind::Unfair),
            _ => None,
        }
    }
}

/// Fire every unused space a seat stands on, starting at seat `from_seat`.
///
/// Contravox gets its chance before the first seat.
pub fn trigger_field_effects(state: &mut GameState, from_seat: usize) -> FieldStep {
    if from_seat == 0 {
        try_contravox(state);
    }
    for index in from_seat..state.player_count() {
        match land(state, PlayerId(index as u8)) {
            FieldStep::Done => {}
            stop => return stop,
        }
    }
    FieldStep::Done
}

fn land(state: &mut GameState, seat: PlayerId) -> FieldStep {
    let player = &state.players[seat];
    if player.is_eliminated {
        return FieldStep::Done;
    }
    let Some(path) = player.path else {
        return FieldStep::Done;
    };
    let position = player.position;
    let reversum = !player.is_human && player.ai == AiKind::Reversum;
    if position < 1 || position > state.config.board_size {
        return FieldStep::Done;
    }

    let Some(space) = state
        .paths
        .get_mut(path.index())
        .and_then(|p| p.space_mut(position))
    else {
        return FieldStep::Done;
    };
    if space.used || space.color == SpaceColor::White {
        return FieldStep::Done;
    }
    space.used = true;
    let (color, effect, polarity) = (space.color, space.effect, space.polarity());

    if reversum && polarity.is_some() {
        let message = format!("{} is immune to field effects!", state.name(seat));
        state.push_log(message);
        return FieldStep::Done;
    }

    state.phase = GamePhase::FieldEffect;
    match (color, effect, polarity) {
        (SpaceColor::Yellow, _, _) => {
            yellow_space(state, seat);
            FieldStep::Done
        }
        (SpaceColor::Black, _, _) => {
            if let Some(space) = state.paths[path.index()].space_mut(position) {
                space.neutralize();
            }
            if black_hole(state, seat) {
                FieldStep::GameOver
            } else {
                FieldStep::Done
            }
        }
        (_, Some(kind), Some(polarity)) => apply_space(state, seat, kind, polarity),
        _ => FieldStep::Done,
    }
}

fn apply_space(state: &mut GameState, seat: PlayerId, kind: FieldEffectKind, polarity: Polarity) -> FieldStep {
    let name = state.name(seat).to_owned();
    state.push_log(format!("{name} triggered field effect: {kind}!"));
    let style = match polarity {
        Polarity::Positive => AnnouncementStyle::Effect,
        Polarity::Negative => AnnouncementStyle::Negative,
    };
    state.announce(kind.to_string(), style, 2000);

    let team = field_team(state, seat);
    let rest: Seats = state
        .players
        .player_ids()
        .filter(|id| !team.contains(id))
        .collect();

    match kind {
        FieldEffectKind::CartaMenor | FieldEffectKind::CartaMaior => {
            for &member in &team {
                replace_extreme_card(state, member, kind == FieldEffectKind::CartaMenor);
            }
        }
        FieldEffectKind::JogoAberto => {
            let revealed = if polarity == Polarity::Positive { &rest } else { &team };
            for &id in revealed {
                state.revealed_hands.insert(id);
            }
            let names: Vec<&str> = revealed.iter().map(|&id| state.name(id)).collect();
            let message = format!("Open hands: {}.", names.join(", "));
            state.push_log(message);
        }
        FieldEffectKind::TrocaJusta | FieldEffectKind::TrocaInjusta => {
            let trade = if kind == FieldEffectKind::TrocaJusta {
                TradeKind::Fair
            } else {
                TradeKind::Unfair
            };
            if state.mode.is_duo() {
                if let [a, b] = team.as_slice() {
                    perform_trade(state, *a, *b, trade);
                }
                return FieldStep::Done;
            }
            let options: Vec<PlayerId> = rest
                .iter()
                .copied()
                .filter(|&id| !state.players[id].is_eliminated)
                .collect();
            if options.is_empty() {
                state.push_log(format!("{name} has nobody to trade with."));
                return FieldStep::Done;
            }
            if state.players[seat].is_human {
                state.pending = Some(PendingChoice::Trade {
                    player: seat,
                    kind: trade,
                    options,
                    resume_at: seat.index() + 1,
                });
                state.phase = GamePhase::FieldEffectTargeting;
                return FieldStep::NeedsChoice;
            }
            if let Some(&other) = state.rng.choose(&options) {
                perform_trade(state, seat, other, trade);
            }
        }
        FieldEffectKind::TotalRevesusNada => strip_effect_cards(state, &team),
        _ => {
            for &member in &team {
                state.field_effects.push(FieldEffect {
                    kind,
                    applies_to: member,
                    polarity,
                });
            }
        }
    }
    FieldStep::Done
}

/// Lowest (`lowest`) or highest value card in hand, first one on ties.
fn extreme_value_card(state: &GameState, player: PlayerId, lowest: bool) -> Option<&Card> {
    let cards = state.players[player].value_cards();
    if lowest {
        cards.min_by_key(|c| c.value())
    } else {
        cards.fold(None, |best: Option<&Card>, c| match best {
            Some(b) if b.value() >= c.value() => Some(b),
            _ => Some(c),
        })
    }
}

/// Carta Menor / Carta Maior: swap one value card for a fresh draw.
fn replace_extreme_card(state: &mut GameState, player: PlayerId, lowest: bool) {
    let Some(id) = extreme_value_card(state, player, lowest).map(|c| c.id) else {
        return;
    };
    let Some(old) = state.players[player].take_from_hand(id) else {
        return;
    };
    let drawn = state.decks.draw(CardType::Value);
    let message = match &drawn {
        Some(new) => format!("{} discarded {old} and drew {new}.", state.name(player)),
        None => format!("{} discarded {old}; the value deck is empty.", state.name(player)),
    };
    if let Some(new) = drawn {
        state.players[player].hand.push(new);
    }
    state.decks.discard(old);
    state.push_log(message);
}

/// Troca: exchange one value card between `a` (the lander) and `b`.
///
/// Returns `false` and changes nothing when either side has no value card.
pub fn perform_trade(state: &mut GameState, a: PlayerId, b: PlayerId, kind: TradeKind) -> bool {
    let a_gives_lowest = kind == TradeKind::Fair;
    let a_card = extreme_value_card(state, a, a_gives_lowest).map(|c| c.id);
    let b_card = extreme_value_card(state, b, !a_gives_lowest).map(|c| c.id);
    let (Some(a_card), Some(b_card)) = (a_card, b_card) else {
        let message = format!(
            "The trade between {} and {} failed: someone has no value cards.",
            state.name(a),
            state.name(b)
        );
        state.push_log(message);
        return false;
    };

    let taken = (
        state.players[a].take_from_hand(a_card),
        state.players[b].take_from_hand(b_card),
    );
    let (Some(from_a), Some(from_b)) = taken else {
        return false;
    };
    let message = format!(
        "{} traded {from_a} for {}'s {from_b}.",
        state.name(a),
        state.name(b)
    );
    state.players[a].hand.push(from_b);
    state.players[b].hand.push(from_a);
    state.push_log(message);
    true
}

/// Total Revesus Nada: effect cards leave the hand.
///
/// Duo: the first member loses one random effect card and the second keeps
/// at most one. Otherwise the lander loses them all.
fn strip_effect_cards(state: &mut GameState, team: &Seats) {
    let mut discards: Vec<Card> = Vec::new();
    if state.mode.is_duo() && team.len() == 2 {
        let (first, second) = (team[0], team[1]);
        let ids: Vec<_> = state.players[first].effect_cards().map(|c| c.id).collect();
        if let Some(&id) = state.rng.choose(&ids) {
            discards.extend(state.players[first].take_from_hand(id));
        }
        let extra: Vec<_> = state.players[second]
            .effect_cards()
            .skip(1)
            .map(|c| c.id)
            .collect();
        for id in extra {
            discards.extend(state.players[second].take_from_hand(id));
        }
    } else {
        for &member in team {
            let ids: Vec<_> = state.players[member].effect_cards().map(|c| c.id).collect();
            for id in ids {
                discards.extend(state.players[member].take_from_hand(id));
            }
        }
    }
    let names: Vec<&str> = team.iter().map(|&id| state.name(id)).collect();
    let message = format!("{} discarded {} effect card(s).", names.join(" and "), discards.len());
    state.push_log(message);
    state.decks.discard_all(discards);
}

/// Finish a suspended human Troca and continue the field walk.
///
/// `partner` of `None` declines the trade.
pub fn resume_trade(state: &mut GameState, partner: Option<PlayerId>) -> EngineResult<FieldStep> {
    let Some(PendingChoice::Trade {
        player,
        kind,
        options,
        resume_at,
    }) = state.pending.clone()
    else {
        return Err(EngineError::NoPendingChoice);
    };

    match partner {
        Some(other) if !options.contains(&other) => {
            return Err(EngineError::InvalidChoice(format!(
                "{} is not a trade option",
                state.name(other)
            )));
        }
        Some(other) => {
            state.pending = None;
            perform_trade(state, player, other, kind);
        }
        None => {
            state.pending = None;
            let message = format!("{} declined the trade.", state.name(player));
            state.push_log(message);
        }
    }
    state.phase = GamePhase::FieldEffect;
    Ok(trigger_field_effects(state, resume_at))
}
