//! Round lifecycle: opening draw, round setup, resolution and the terminal
//! check.
//!
//! ## Round cycle
//!
//! ```text
//! prepare_round -> field trigger -> finish_round_start -> turns ...
//!   -> resolve_round -> end_game_check -> prepare_round | game over
//! ```
//!
//! The field trigger lives in [`field`](super::field) because it can
//! suspend on a human choice; the driver in [`engine`](crate::engine)
//! stitches the steps together.

use crate::cards::{Card, CardFace, CardType};
use crate::core::{AiKind, AnnouncementStyle, GamePhase, GameState, PlayerId};
use crate::board::FieldEffectKind;
use crate::effects::{EffectKind, MoveEffect};

use super::abilities::{final_boss_collisions, versatrix_swap_applies};
use super::outcome::{GameOutcome, GameResult, LossReason, OutcomeEvent};
use super::scoring::{calculate_score, refresh_live_scores};
use super::teams::{allies, cluster, duo_teams, opponents, round_sides, Seats};

/// Redraws before a tied opening draw is settled at random.
const MAX_DRAW_ATTEMPTS: usize = 16;

/// Final-battle movement: overshooting `winning` wraps back round to 1,
/// while a step below 1 stops at 1.
#[must_use]
pub fn wrap_position(position: i32, winning: u8) -> u8 {
    if position < 1 {
        return 1;
    }
    let span = i32::from(winning.max(1));
    ((position - 1) % span + 1) as u8
}

/// Cyclic movement on the final-battle loop, in both directions. Used by
/// Versatrix's yellow space.
#[must_use]
pub fn loop_position(position: i32, winning: u8) -> u8 {
    let span = i32::from(winning.max(1));
    ((position - 1).rem_euclid(span) + 1) as u8
}

/// Clamp a position into `1..=winning`.
#[must_use]
pub fn clamp_position(position: i32, winning: u8) -> u8 {
    position.clamp(1, i32::from(winning)) as u8
}

/// What happened in one resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundReport {
    pub round: u32,
    /// Final scores after any swap, in seat order.
    pub scores: Vec<(PlayerId, i32)>,
    pub winners: Vec<PlayerId>,
    pub losers: Vec<PlayerId>,
    /// Net movement per seat, in seat order. Empty in heart mode.
    pub movements: Vec<(PlayerId, i32)>,
    pub next_starter: Option<PlayerId>,
    /// Seats whose scores and movements were swapped.
    pub swap: Option<(PlayerId, PlayerId)>,
}

/// Opening draw: every seat draws a value card and the unique highest card
/// starts. The drawn cards become the opening restos.
pub fn initial_draw(state: &mut GameState) -> PlayerId {
    state.phase = GamePhase::InitialDraw;
    let seats: Vec<PlayerId> = state.players.player_ids().collect();

    for attempt in 1..=MAX_DRAW_ATTEMPTS {
        let drawn: Vec<(PlayerId, Card)> = seats
            .iter()
            .filter_map(|&id| state.decks.draw(CardType::Value).map(|c| (id, c)))
            .collect();
        let parts: Vec<String> = drawn
            .iter()
            .map(|(id, card)| format!("{} drew {card}", state.name(*id)))
            .collect();
        state.push_log(format!("Opening draw: {}.", parts.join(", ")));

        let best = drawn.iter().filter_map(|(_, c)| c.value()).max().unwrap_or(0);
        let leaders: Vec<PlayerId> = drawn
            .iter()
            .filter(|(_, c)| c.value() == Some(best))
            .map(|(id, _)| *id)
            .collect();

        let starter = match leaders.as_slice() {
            [only] => Some(*only),
            _ if attempt == MAX_DRAW_ATTEMPTS || drawn.len() < 2 => {
                state.rng.choose(&leaders).copied()
            }
            _ => None,
        };

        match starter {
            Some(starter) => {
                for (id, card) in drawn {
                    let message = format!("{}'s opening resto is {card}.", state.name(id));
                    state.players[id].resto = Some(card);
                    state.push_log(message);
                }
                state.current_player = starter;
                let message = format!("{} drew the highest card and starts!", state.name(starter));
                state.push_log(message);
                return starter;
            }
            None => {
                state.push_log("Tie! Drawing again...");
                state.decks.discard_all(drawn.into_iter().map(|(_, c)| c));
                let decks = &mut state.decks;
                state.rng.shuffle(&mut decks.value);
            }
        }
    }
    state.current_player
}

/// Final battle: every seat gets a distinct random path.
pub fn assign_final_paths(state: &mut GameState) {
    let mut free: Vec<usize> = (0..state.paths.len()).collect();
    state.rng.shuffle(&mut free);
    let seats: Vec<PlayerId> = state.players.player_ids().collect();
    for (seat, index) in seats.into_iter().zip(free) {
        let path = state.paths[index].id;
        state.paths[index].owner = Some(seat);
        state.players[seat].path = Some(path);
    }
}

/// Set up a round: collisions, resets, dealing and the mirror hand.
///
/// Returns `false` when a start-of-round collision ended the game.
pub fn prepare_round(state: &mut GameState, first: bool) -> bool {
    if state.is_over() {
        return false;
    }
    if !first {
        state.turn += 1;
        if state.mode.is_final_boss() && final_boss_collisions(state) {
            return false;
        }
    }

    state.global_inversion = false;
    state.field_effects.clear();
    state.revealed_hands.clear();
    state.consecutive_passes = 0;
    state.abilities.reset_round();
    state.pending = None;

    let mirror = mirror_seat(state);
    let seats: Vec<PlayerId> = state.players.player_ids().collect();
    for &seat in &seats {
        reset_seat(state, seat, first);
        if Some(seat) == mirror {
            let old_hand = std::mem::take(&mut state.players[seat].hand);
            state.decks.discard_all(old_hand);
        }
    }

    let decks = &mut state.decks;
    decks.shuffle(&mut state.rng);

    for &seat in &seats {
        if state.players[seat].is_eliminated || Some(seat) == mirror {
            continue;
        }
        deal(state, seat);
    }

    if let (Some(mirror), Some(human)) = (mirror, state.human()) {
        let faces: Vec<CardFace> = state.players[human].hand.iter().map(|c| c.face).collect();
        let copies: Vec<Card> = faces.into_iter().map(|f| state.decks.mint(f)).collect();
        state.players[mirror].hand = copies;
        let message = format!("{}'s hand mirrored yours!", state.name(mirror));
        state.push_log(message);
    }

    if state.players[state.current_player].is_eliminated {
        if let Some(next) = next_active_after(state, state.current_player) {
            state.current_player = next;
        }
    }
    refresh_live_scores(state);
    true
}

/// The heart-mode mirror seat, if any.
fn mirror_seat(state: &GameState) -> Option<PlayerId> {
    if state.mode.is_heart_mode() {
        state.find_ai(AiKind::Inversus)
    } else {
        None
    }
}

fn reset_seat(state: &mut GameState, seat: PlayerId, first: bool) {
    let final_boss = state.mode.is_final_boss();
    let player = &mut state.players[seat];

    let old_resto = if first { None } else { player.resto.take() };
    let next = player.next_resto.take();
    let mut returning = std::mem::take(&mut player.played.value);
    let pile = std::mem::take(&mut player.played.effect);
    player.effects = Default::default();
    player.played_value_this_turn = false;
    player.target_path_for_pula = None;

    let (mut carried, unlocked): (Vec<Card>, Vec<Card>) = pile.into_iter().partition(|c| c.locked);
    for card in &mut carried {
        card.locked = false;
    }
    player.played.effect = carried;

    if let Some(card) = old_resto {
        state.decks.discard(card);
    }
    state.decks.discard_all(unlocked);

    let from_pile = next.and_then(|id| {
        let index = returning.iter().position(|c| c.id == id)?;
        Some(returning.remove(index))
    });
    let new_resto = from_pile.or_else(|| next.and_then(|id| state.decks.take(CardType::Value, id)));
    state.decks.discard_all(returning);

    match new_resto {
        Some(mut card) => {
            card.reset_annotations();
            state.players[seat].resto = Some(card);
        }
        None if !first => {
            state.players[seat].resto = if final_boss {
                state.decks.draw(CardType::Value)
            } else {
                None
            };
        }
        None => {}
    }
}

fn deal(state: &mut GameState, seat: PlayerId) {
    let value_cap = state.config.max_value_cards_in_hand;
    let effect_cap = state.config.max_effect_cards_in_hand;
    let (values, effects) = {
        let player = &state.players[seat];
        (player.value_card_count(), player.effect_cards().count())
    };
    for _ in values..value_cap {
        match state.decks.draw(CardType::Value) {
            Some(card) => state.players[seat].hand.push(card),
            None => break,
        }
    }
    for _ in effects..effect_cap {
        match state.decks.draw(CardType::Effect) {
            Some(card) => state.players[seat].hand.push(card),
            None => break,
        }
    }
}

/// Next seat after `from` in fixed rotation that is still in play.
#[must_use]
pub fn next_active_after(state: &GameState, from: PlayerId) -> Option<PlayerId> {
    let count = state.player_count();
    (1..=count)
        .map(|step| PlayerId((from.index() + step).rem_euclid(count) as u8))
        .find(|&id| !state.players[id].is_eliminated)
}

/// Hand control to the current player once the round is set up.
pub fn finish_round_start(state: &mut GameState) {
    state.phase = GamePhase::Playing;
    state.played_any_card_this_turn = false;
    let message = format!(
        "--- Starting round {} ({}'s turn) ---",
        state.turn,
        state.name(state.current_player)
    );
    state.push_log(message);
}

/// Resolve the round: scores, winners, next starter, hearts or movement.
pub fn resolve_round(state: &mut GameState) -> RoundReport {
    state.phase = GamePhase::Resolution;
    state.abilities.inversus_total_active = false;

    let swap = versatrix_swap_applies(state);
    state.abilities.versatrix_swap_active = swap.is_some();
    if swap.is_some() {
        state.push_log("Versatrix uses her ability: CAMPO VERSÁTIL!");
        state.announce("CAMPO VERSÁTIL!", AnnouncementStyle::Reversus, 2500);
    }

    let seats: Vec<PlayerId> = state.players.player_ids().collect();
    let mut scores: Vec<i32> = seats.iter().map(|&id| calculate_score(state, id)).collect();
    let summary: Vec<String> = seats
        .iter()
        .map(|&id| format!("{}: {}", state.name(id), scores[id.index()]))
        .collect();
    state.push_log(format!("End of round: scores - {}.", summary.join(", ")));

    if let Some((a, b)) = swap {
        scores.swap(a.index(), b.index());
        let message = format!("CAMPO VERSÁTIL swapped the scores of {} and {}!", state.name(a), state.name(b));
        state.push_log(message);
    }

    let winners = round_winners(state, &scores);
    let losers: Vec<PlayerId> = seats.iter().copied().filter(|id| !winners.contains(id)).collect();

    let next_starter = pick_starter(state, &winners);
    if let Some(starter) = next_starter {
        state.current_player = starter;
        let message = format!("Next to play: {} (round winner).", state.name(starter));
        state.push_log(message);
    }

    let mut report = RoundReport {
        round: state.turn,
        scores: seats.iter().map(|&id| (id, scores[id.index()])).collect(),
        winners: winners.clone(),
        losers: losers.clone(),
        movements: Vec::new(),
        next_starter,
        swap,
    };

    if state.mode.is_heart_mode() {
        for &id in &losers {
            let player = &mut state.players[id];
            if let Some(hearts) = player.hearts.as_mut().filter(|h| **h > 0) {
                *hearts -= 1;
                let message = format!("{} lost a heart! Remaining: {hearts}", player.name);
                state.push_log(message);
            }
        }
        return report;
    }

    let mut movements: Vec<i32> = vec![0; seats.len()];
    for &id in &winners {
        let name = state.name(id).to_owned();
        if state.has_field_effect(id, FieldEffectKind::Parada) {
            state.push_log(format!("{name} won, but Parada keeps them in place."));
        } else if state.has_field_effect(id, FieldEffectKind::Desafio) {
            let played_positive = state.players[id]
                .played
                .effect
                .iter()
                .any(|c| matches!(c.effect(), Some(EffectKind::Mais | EffectKind::Sobe)));
            if played_positive {
                movements[id.index()] += 1;
                state.push_log(format!("{name} won but failed the Desafio and advances 1 space."));
            } else {
                movements[id.index()] += 3;
                state.push_log(format!("{name} completed the Desafio and advances 3 spaces!"));
            }
        } else {
            movements[id.index()] += 1;
        }
    }
    if winners.is_empty() {
        state.push_log("The round is tied! Nobody gets the bonus.");
    } else {
        let names: Vec<&str> = winners.iter().map(|&id| state.name(id)).collect();
        let message = format!("Round winner(s): {}.", names.join(", "));
        state.push_log(message);
    }

    for &id in &losers {
        let name = state.name(id).to_owned();
        if state.has_field_effect(id, FieldEffectKind::Impulso) {
            movements[id.index()] += 1;
            state.push_log(format!("{name} lost, but Impulso advances them 1 space."));
        } else if state.has_field_effect(id, FieldEffectKind::Castigo) {
            movements[id.index()] -= 3;
            state.push_log(format!("{name} lost and suffers Castigo, retreating 3 spaces."));
        }
    }

    for &id in &seats {
        let Some(movement) = state.players[id].effects.movement else {
            continue;
        };
        let mut delta = movement.delta();
        if movement == MoveEffect::Desce && state.has_field_effect(id, FieldEffectKind::SuperExposto) {
            delta *= 2;
        }
        if delta != 0 {
            movements[id.index()] += delta;
            let message = format!("{} applies {movement}.", state.name(id));
            state.push_log(message);
        }
    }

    let wraps = state.mode.is_final_boss();
    for &id in &seats {
        let player = &state.players[id];
        if player.effects.movement != Some(MoveEffect::Pula) {
            continue;
        }
        let Some(destination) = player.target_path_for_pula else {
            continue;
        };
        if destination.index() >= state.paths.len() {
            continue;
        }
        let owner = state.paths[destination.index()].owner;
        if !wraps && owner.is_some_and(|owner| owner != id) {
            let message = format!("{} could not jump: {destination} is already taken.", state.name(id));
            state.push_log(message);
            continue;
        }
        for path in state.paths.iter_mut().filter(|p| p.owner == Some(id)) {
            path.owner = None;
        }
        state.paths[destination.index()].owner = Some(id);
        state.players[id].path = Some(destination);
        let message = format!("{} jumped to {destination}.", state.name(id));
        state.push_log(message);
    }

    if let Some((a, b)) = swap {
        movements.swap(a.index(), b.index());
        let message = format!("CAMPO VERSÁTIL swapped the movements of {} and {}!", state.name(a), state.name(b));
        state.push_log(message);
    }

    let winning = state.config.winning_position;
    for &id in &seats {
        let player = &mut state.players[id];
        if player.is_eliminated {
            continue;
        }
        let old = player.position;
        let target = i32::from(old) + movements[id.index()];
        player.position = if wraps {
            wrap_position(target, winning)
        } else {
            clamp_position(target, winning)
        };
        if player.position != old {
            let message = format!("{} moved from {old} to {}.", player.name, player.position);
            state.push_log(message);
        }
    }
    release_vacated_spaces(state);

    report.movements = seats.iter().map(|&id| (id, movements[id.index()])).collect();
    report
}

fn round_winners(state: &mut GameState, scores: &[i32]) -> Vec<PlayerId> {
    let total = |side: &Seats| side.iter().map(|id| scores[id.index()]).sum::<i32>();

    if let Some((a, b)) = round_sides(state) {
        let (sum_a, sum_b) = (total(&a), total(&b));
        state.push_log(format!("Side totals: {sum_a} vs {sum_b}."));
        return match sum_a.cmp(&sum_b) {
            std::cmp::Ordering::Greater => a.to_vec(),
            std::cmp::Ordering::Less => b.to_vec(),
            std::cmp::Ordering::Equal if state.mode.is_one_vs_many() => {
                state.push_log("Tie! Everyone advances!");
                a.iter().chain(b.iter()).copied().collect()
            }
            std::cmp::Ordering::Equal => Vec::new(),
        };
    }

    let active: Vec<PlayerId> = state.active_players().collect();
    let Some(max) = active.iter().map(|id| scores[id.index()]).max() else {
        return Vec::new();
    };
    active.into_iter().filter(|id| scores[id.index()] == max).collect()
}

/// Sole winner starts; tied winners are split by highest resto, then at
/// random.
fn pick_starter(state: &mut GameState, winners: &[PlayerId]) -> Option<PlayerId> {
    let candidates: Vec<PlayerId> = winners
        .iter()
        .copied()
        .filter(|&id| !state.players[id].is_eliminated)
        .collect();
    if candidates.len() <= 1 {
        return candidates.first().copied();
    }
    let best = candidates
        .iter()
        .map(|&id| state.players[id].resto_value())
        .max()
        .unwrap_or(0);
    let top: Vec<PlayerId> = candidates
        .into_iter()
        .filter(|&id| state.players[id].resto_value() == best)
        .collect();
    state.rng.choose(&top).copied()
}

/// A space fires once per occupancy: free the ones nobody stands on.
fn release_vacated_spaces(state: &mut GameState) {
    let occupied: Vec<(usize, u8)> = state
        .players
        .values()
        .filter_map(|p| p.path.map(|path| (path.index(), p.position)))
        .collect();
    for (index, path) in state.paths.iter_mut().enumerate() {
        for space in &mut path.spaces {
            if space.used && !occupied.contains(&(index, space.id)) {
                space.used = false;
            }
        }
    }
}

/// Mode-specific terminal check. Returns whether the game ended.
pub fn end_game_check(state: &mut GameState) -> bool {
    if state.is_over() {
        return true;
    }
    let winning = state.config.winning_position;
    let reached = |state: &GameState, id: PlayerId| state.players[id].position >= winning;

    if state.mode.is_heart_mode() {
        let human = state.human();
        let mirror = state.find_ai(AiKind::Inversus);
        let out_of_hearts = |id: Option<PlayerId>| {
            id.and_then(|id| state.players[id].hearts).is_some_and(|h| h == 0)
        };
        let (human_out, mirror_out) = (out_of_hearts(human), out_of_hearts(mirror));
        if human_out {
            let result = GameResult::from_winners(mirror.into_iter().collect());
            finish_game(state, result, "You lost all your hearts. Inversus wins!".to_owned(), None);
            return true;
        }
        if mirror_out {
            let result = GameResult::from_winners(human.into_iter().collect());
            finish_game(state, result, "Inversus lost all its hearts. You win!".to_owned(), None);
            return true;
        }
        return false;
    }

    if let Some(battle) = state.mode.story_battle() {
        if state.mode.is_final_boss() {
            return false;
        }
        let Some(human) = state.human() else {
            return false;
        };
        let rivals: Seats = if state.mode.is_one_vs_many() {
            cluster(state)
        } else {
            opponents(state, human)
        };
        let verdict = if reached(state, human) {
            Some(true)
        } else if rivals.iter().any(|&id| reached(state, id)) {
            Some(false)
        } else {
            None
        };
        if let Some(won) = verdict {
            log::debug!("story battle {} decided: won={won}", battle.id());
            finish_story_battle(state, won, None);
            return true;
        }
        return false;
    }

    if state.mode.is_duo() {
        let [team_a, team_b] = duo_teams(state);
        let a_done = !team_a.is_empty() && team_a.iter().all(|&id| reached(state, id));
        let b_done = !team_b.is_empty() && team_b.iter().all(|&id| reached(state, id));
        let (winners, message): (Vec<PlayerId>, &str) = match (a_done, b_done) {
            (true, true) => (
                team_a.iter().chain(team_b.iter()).copied().collect(),
                "Incredible tie! Both teams won!",
            ),
            (true, false) => (team_a.to_vec(), "Team A (You & Player 3) won!"),
            (false, true) => (team_b.to_vec(), "Team B (Player 2 & Player 4) won!"),
            (false, false) => return false,
        };
        finish_game(state, GameResult::from_winners(winners), message.to_owned(), None);
        return true;
    }

    let winners: Vec<PlayerId> = state
        .players
        .player_ids()
        .filter(|&id| reached(state, id))
        .collect();
    if winners.is_empty() {
        return false;
    }
    let names: Vec<&str> = winners.iter().map(|&id| state.name(id)).collect();
    let message = format!("Game over! {} won!", names.join(" and "));
    finish_game(state, GameResult::from_winners(winners), message, None);
    true
}

/// Record the outcome and stop the game.
pub fn finish_game(state: &mut GameState, result: GameResult, message: String, story: Option<OutcomeEvent>) {
    state.push_log(message.clone());
    state.phase = GamePhase::GameOver;
    state.pending = None;
    state.outcome = Some(GameOutcome {
        result,
        message,
        story,
    });
}

/// End the current story battle from the human's point of view.
pub(crate) fn finish_story_battle(state: &mut GameState, won: bool, reason: Option<LossReason>) {
    let Some(battle) = state.mode.story_battle() else {
        log::warn!("story outcome requested outside story mode");
        return;
    };
    let winners: Vec<PlayerId> = match state.human() {
        Some(human) if won => allies(state, human).to_vec(),
        Some(human) => opponents(state, human).to_vec(),
        None => Vec::new(),
    };
    let message = match (won, reason) {
        (true, _) => format!("You won the battle: {}!", battle.id()),
        (false, Some(LossReason::Collision)) => "A Necroverso caught you. You lost!".to_owned(),
        (false, Some(LossReason::BlackHole)) => "You fell into a Black Hole. You lost!".to_owned(),
        (false, Some(LossReason::Time)) => "Time is up. You lost!".to_owned(),
        (false, None) => format!("You lost the battle: {}.", battle.id()),
    };
    let event = OutcomeEvent { battle, won, reason };
    finish_game(state, GameResult::from_winners(winners), message, Some(event));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{FieldEffect, PathId, Polarity};
    use crate::core::{GameConfig, GameMode, StoryBattle};

    const P0: PlayerId = PlayerId::new(0);
    const P1: PlayerId = PlayerId::new(1);
    const P2: PlayerId = PlayerId::new(2);

    fn solo(players: u8) -> GameState {
        GameState::new(GameMode::Solo { players }, GameConfig::default(), 77)
    }

    /// Move a value card with face `value` from the deck onto a played pile.
    fn play_value(state: &mut GameState, player: PlayerId, value: u8) {
        let id = state
            .decks
            .value
            .iter()
            .find(|c| c.value() == Some(value))
            .map(|c| c.id)
            .unwrap();
        let card = state.decks.take(CardType::Value, id).unwrap();
        state.players[player].next_resto = Some(card.id);
        state.players[player].played.value.push(card);
    }

    fn set_resto(state: &mut GameState, player: PlayerId, value: u8) {
        let id = state
            .decks
            .value
            .iter()
            .find(|c| c.value() == Some(value))
            .map(|c| c.id)
            .unwrap();
        state.players[player].resto = state.decks.take(CardType::Value, id);
    }

    #[test]
    fn test_position_helpers() {
        assert_eq!(clamp_position(11, 10), 10);
        assert_eq!(clamp_position(-2, 10), 1);
        assert_eq!(wrap_position(11, 10), 1);
        assert_eq!(wrap_position(10, 10), 10);
        assert_eq!(wrap_position(0, 10), 1);
        assert_eq!(wrap_position(-3, 10), 1);
        assert_eq!(loop_position(0, 10), 10);
        assert_eq!(loop_position(11, 10), 1);
    }

    #[test]
    fn test_initial_draw_sets_restos_and_starter() {
        let mut state = solo(4);
        let starter = initial_draw(&mut state);

        assert_eq!(state.current_player, starter);
        assert!(state.players.values().all(|p| p.resto.is_some()));
        let best = state.players[starter].resto_value();
        let others = state
            .players
            .values()
            .filter(|p| p.id != starter)
            .all(|p| p.resto_value() < best);
        assert!(others || state.log.contains("Tie"));
        assert!(state.validate().is_ok());
    }

    #[test]
    fn test_prepare_round_deals_to_caps() {
        let mut state = solo(3);
        initial_draw(&mut state);
        assert!(prepare_round(&mut state, true));

        for player in state.players.values() {
            assert_eq!(player.value_card_count(), 3);
            assert_eq!(player.effect_cards().count(), 2);
        }
        assert_eq!(state.turn, 1);
        assert!(state.validate().is_ok());
    }

    #[test]
    fn test_reset_moves_next_resto_and_keeps_locked_cards() {
        let mut state = solo(2);
        initial_draw(&mut state);
        prepare_round(&mut state, true);

        play_value(&mut state, P0, 8);
        let next = state.players[P0].next_resto;

        let mut lock = state.decks.effect.pop().unwrap();
        lock.locked = true;
        lock.face = CardFace::Effect(EffectKind::ReversusTotal);
        let lock_id = lock.id;
        lock.reversed_category = Some(crate::effects::Category::Score);
        state.players[P1].played.effect.push(lock);
        let unlocked = state.decks.effect.pop().unwrap();
        let unlocked_id = unlocked.id;
        state.players[P1].played.effect.push(unlocked);

        assert!(prepare_round(&mut state, false));
        assert_eq!(state.turn, 2);
        assert_eq!(state.players[P0].resto.as_ref().map(|c| c.id), next);
        assert!(state.players[P0].played.value.is_empty());

        let pile = &state.players[P1].played.effect;
        assert_eq!(pile.len(), 1);
        assert_eq!(pile[0].id, lock_id);
        assert!(!pile[0].locked);
        assert!(state.decks.effect.iter().any(|c| c.id == unlocked_id)
            || state.players.values().any(|p| p.card_in_hand(unlocked_id).is_some()));
        assert!(state.validate().is_ok());

        // Carried for one round only: the next reset returns it.
        assert!(prepare_round(&mut state, false));
        assert!(state.players[P1].played.effect.is_empty());
        assert!(state.decks.effect.iter().any(|c| c.id == lock_id)
            || state.players.values().any(|p| p.card_in_hand(lock_id).is_some()));
        assert!(state.validate().is_ok());
    }

    #[test]
    fn test_resolution_individual_winner_moves() {
        let mut state = solo(3);
        state.turn = 1;
        play_value(&mut state, P0, 10);
        play_value(&mut state, P1, 4);
        play_value(&mut state, P2, 2);
        state.players[P2].effects.movement = Some(MoveEffect::Sobe);

        let report = resolve_round(&mut state);
        assert_eq!(report.winners, vec![P0]);
        assert_eq!(report.next_starter, Some(P0));
        assert_eq!(state.players[P0].position, 2);
        assert_eq!(state.players[P1].position, 1);
        assert_eq!(state.players[P2].position, 2);
        assert_eq!(state.current_player, P0);
    }

    #[test]
    fn test_tie_broken_by_highest_resto() {
        let mut state = solo(2);
        play_value(&mut state, P0, 6);
        play_value(&mut state, P1, 6);
        set_resto(&mut state, P0, 4);
        set_resto(&mut state, P1, 8);

        let report = resolve_round(&mut state);
        assert_eq!(report.winners.len(), 2);
        assert_eq!(report.next_starter, Some(P1));
    }

    #[test]
    fn test_field_modifiers_on_movement() {
        let mut state = solo(2);
        play_value(&mut state, P0, 10);
        play_value(&mut state, P1, 2);
        state.players[P0].position = 5;
        state.players[P1].position = 5;
        for (kind, seat) in [(FieldEffectKind::Desafio, P0), (FieldEffectKind::Castigo, P1)] {
            state.field_effects.push(FieldEffect {
                kind,
                applies_to: seat,
                polarity: Polarity::Positive,
            });
        }

        resolve_round(&mut state);
        assert_eq!(state.players[P0].position, 8);
        assert_eq!(state.players[P1].position, 2);
    }

    #[test]
    fn test_clamp_in_normal_mode_and_wrap_in_final_battle() {
        let mut state = solo(2);
        play_value(&mut state, P0, 10);
        state.players[P0].position = 9;
        state.players[P0].effects.movement = Some(MoveEffect::Sobe);
        resolve_round(&mut state);
        assert_eq!(state.players[P0].position, 10);

        let mut state = GameState::new(
            GameMode::Story(StoryBattle::NecroversoFinal),
            GameConfig::default(),
            4,
        );
        assign_final_paths(&mut state);
        play_value(&mut state, P0, 10);
        state.players[P0].position = 9;
        state.players[P0].effects.movement = Some(MoveEffect::Sobe);
        resolve_round(&mut state);
        assert_eq!(state.players[P0].position, 1);
    }

    #[test]
    fn test_pula_relocates_and_frees_old_path() {
        let mut state = solo(2);
        play_value(&mut state, P0, 10);
        state.players[P1].effects.movement = Some(MoveEffect::Pula);
        state.players[P1].target_path_for_pula = Some(PathId(4));

        resolve_round(&mut state);
        assert_eq!(state.players[P1].path, Some(PathId(4)));
        assert_eq!(state.paths[4].owner, Some(P1));
        assert_eq!(state.paths[1].owner, None);
    }

    #[test]
    fn test_second_jump_onto_a_taken_path_is_skipped() {
        let mut state = solo(4);
        play_value(&mut state, P0, 10);
        let old = state.players[P2].path;
        for seat in [P1, P2] {
            state.players[seat].effects.movement = Some(MoveEffect::Pula);
            state.players[seat].target_path_for_pula = Some(PathId(4));
        }

        resolve_round(&mut state);
        assert_eq!(state.players[P1].path, Some(PathId(4)));
        assert_eq!(state.paths[4].owner, Some(P1));
        assert_eq!(state.players[P2].path, old);
        assert!(state.log.contains("could not jump"));
    }

    #[test]
    fn test_final_battle_retreat_stops_at_one() {
        let mut state = GameState::new(
            GameMode::Story(StoryBattle::NecroversoFinal),
            GameConfig::default(),
            9,
        );
        assign_final_paths(&mut state);
        play_value(&mut state, P0, 10);
        state.players[P1].position = 1;
        state.players[P1].effects.movement = Some(MoveEffect::Desce);

        resolve_round(&mut state);
        assert_eq!(state.players[P1].position, 1);
    }

    #[test]
    fn test_heart_mode_losers_lose_hearts_and_do_not_move() {
        let mut state = GameState::new(GameMode::Inversus, GameConfig::default(), 8);
        play_value(&mut state, P0, 10);
        play_value(&mut state, P1, 2);
        state.players[P1].effects.movement = Some(MoveEffect::Sobe);

        let report = resolve_round(&mut state);
        assert!(report.movements.is_empty());
        assert_eq!(state.players[P1].hearts, Some(9));
        assert_eq!(state.players[P1].position, 1);

        state.players[P1].hearts = Some(0);
        assert!(end_game_check(&mut state));
        assert!(state.outcome.as_ref().unwrap().result.is_winner(P0));
    }

    #[test]
    fn test_versatrix_swap() {
        let mut state = GameState::new(
            GameMode::Story(StoryBattle::Versatrix),
            GameConfig::default(),
            8,
        );
        state.turn = 3;
        state.players[P0].position = 7;
        play_value(&mut state, P0, 10);
        play_value(&mut state, P1, 2);

        let report = resolve_round(&mut state);
        assert_eq!(report.swap, Some((P0, P1)));
        assert_eq!(report.winners, vec![P1]);
        assert_eq!(report.scores, vec![(P0, 2), (P1, 10)]);
        assert_eq!(state.players[P0].position, 8);
        assert_eq!(state.players[P1].position, 1);
    }

    #[test]
    fn test_one_vs_many_tie_moves_everyone() {
        let mut state = GameState::new(
            GameMode::Story(StoryBattle::NecroversoKing),
            GameConfig::default(),
            8,
        );
        let report = resolve_round(&mut state);
        assert_eq!(report.winners.len(), 4);
        assert!(state.players.values().all(|p| p.position == 2));
    }

    #[test]
    fn test_duo_tie_has_no_winner() {
        let mut state = GameState::new(GameMode::Duo, GameConfig::default(), 8);
        play_value(&mut state, P0, 4);
        play_value(&mut state, P1, 4);
        let report = resolve_round(&mut state);
        assert!(report.winners.is_empty());
        assert!(state.players.values().all(|p| p.position == 1));
    }

    #[test]
    fn test_duo_both_teams_finish_is_a_tie_win() {
        let mut state = GameState::new(GameMode::Duo, GameConfig::default(), 8);
        let seats: Vec<PlayerId> = state.players.player_ids().collect();
        for seat in seats {
            state.players[seat].position = 10;
        }
        assert!(end_game_check(&mut state));
        let outcome = state.outcome.unwrap();
        assert!(outcome.message.contains("Both teams"));
        assert_eq!(
            outcome.result,
            GameResult::Winners(vec![P0, P1, P2, PlayerId::new(3)])
        );
    }

    #[test]
    fn test_solo_simultaneous_winners() {
        let mut state = solo(3);
        state.players[P0].position = 10;
        state.players[P2].position = 10;
        assert!(end_game_check(&mut state));
        assert_eq!(
            state.outcome.unwrap().result,
            GameResult::Winners(vec![P0, P2])
        );
    }

    #[test]
    fn test_story_human_checked_first() {
        let mut state = GameState::new(
            GameMode::Story(StoryBattle::Contravox),
            GameConfig::default(),
            8,
        );
        state.players[P0].position = 10;
        state.players[P1].position = 10;
        assert!(end_game_check(&mut state));
        assert!(state.outcome.unwrap().story.unwrap().won);
    }

    #[test]
    fn test_final_battle_never_ends_by_position() {
        let mut state = GameState::new(
            GameMode::Story(StoryBattle::NecroversoFinal),
            GameConfig::default(),
            8,
        );
        state.players[P0].position = 10;
        assert!(!end_game_check(&mut state));
        assert!(state.outcome.is_none());
    }
}
