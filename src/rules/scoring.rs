//! Round score calculation and live standings.
//!
//! ## Formula
//!
//! ```text
//! score = sum of played value cards
//! resto = resto card value (10 under Resto Maior, 2 under Resto Menor)
//! Mais              score += resto
//! Menos             score -= resto (twice under Super Exposto)
//! NECRO X           score *= resto, or floor(score / resto) under global inversion
//! NECRO X Invertido the mirror image of NECRO X
//! ```
//!
//! Division is skipped when the resto is zero. The same function serves the
//! live display and the authoritative resolution.

use crate::board::FieldEffectKind;
use crate::core::{GameState, PlayerId, PlayerStatus};
use crate::effects::ScoreEffect;

use super::teams::{round_sides, Seats};

/// Resto value after field effects.
#[must_use]
pub fn effective_resto(state: &GameState, player: PlayerId) -> i32 {
    if state.has_field_effect(player, FieldEffectKind::RestoMenor) {
        2
    } else if state.has_field_effect(player, FieldEffectKind::RestoMaior) {
        10
    } else {
        state
            .players
            .get(player)
            .map_or(0, |p| i32::from(p.resto_value()))
    }
}

/// Current score of `player`. Unknown seats score 0.
#[must_use]
pub fn calculate_score(state: &GameState, player: PlayerId) -> i32 {
    let Some(seat) = state.players.get(player) else {
        return 0;
    };
    let mut score: i32 = seat
        .played
        .value
        .iter()
        .filter_map(|c| c.value())
        .map(i32::from)
        .sum();
    let resto = effective_resto(state, player);

    let multiply = |score: i32| score * resto;
    let divide = |score: i32| {
        if resto == 0 {
            score
        } else {
            score.div_euclid(resto)
        }
    };

    match seat.effects.score {
        None => {}
        Some(ScoreEffect::Mais) => score += resto,
        Some(ScoreEffect::Menos) => {
            score -= resto;
            if state.has_field_effect(player, FieldEffectKind::SuperExposto) {
                score -= resto;
            }
        }
        Some(ScoreEffect::NecroX) => {
            score = if state.global_inversion {
                divide(score)
            } else {
                multiply(score)
            };
        }
        Some(ScoreEffect::NecroXInvertido) => {
            score = if state.global_inversion {
                multiply(score)
            } else {
                divide(score)
            };
        }
    }
    score
}

/// Recompute every seat's live score and standing.
///
/// Side modes compare side totals; individual modes mark the top scorers
/// winning and the bottom scorers losing, unless everyone is level.
pub fn refresh_live_scores(state: &mut GameState) {
    let scores: Vec<(PlayerId, i32)> = state
        .players
        .player_ids()
        .map(|id| (id, calculate_score(state, id)))
        .collect();
    let score_of = |id: PlayerId| scores.get(id.index()).map_or(0, |&(_, s)| s);

    let mut statuses: Vec<PlayerStatus> = vec![PlayerStatus::Neutral; scores.len()];
    if let Some((a, b)) = round_sides(state) {
        let total = |side: &Seats| side.iter().map(|&id| score_of(id)).sum::<i32>();
        let (sum_a, sum_b) = (total(&a), total(&b));
        let (ahead, behind) = match sum_a.cmp(&sum_b) {
            std::cmp::Ordering::Greater => (a, b),
            std::cmp::Ordering::Less => (b, a),
            std::cmp::Ordering::Equal => (Seats::new(), Seats::new()),
        };
        for id in ahead {
            statuses[id.index()] = PlayerStatus::Winning;
        }
        for id in behind {
            statuses[id.index()] = PlayerStatus::Losing;
        }
    } else {
        let active: Vec<(PlayerId, i32)> = scores
            .iter()
            .copied()
            .filter(|&(id, _)| !state.players[id].is_eliminated)
            .collect();
        let max = active.iter().map(|&(_, s)| s).max();
        let min = active.iter().map(|&(_, s)| s).min();
        if let (Some(max), Some(min)) = (max, min) {
            if max != min {
                for &(id, score) in &active {
                    if score == max {
                        statuses[id.index()] = PlayerStatus::Winning;
                    } else if score == min {
                        statuses[id.index()] = PlayerStatus::Losing;
                    }
                }
            }
        }
    }

    for (id, player) in state.players.iter_mut() {
        player.live_score = score_of(id);
        player.status = statuses[id.index()];
    }
}
