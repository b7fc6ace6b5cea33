//! Story-battle abilities and special spaces.

use crate::board::SpaceColor;
use crate::cards::CardFace;
use crate::core::{AiKind, AnnouncementStyle, GameState, PlayerId};
use crate::effects::{apply_effect, Cast, Category, EffectKind};

use super::outcome::LossReason;
use super::round::{finish_story_battle, loop_position};

/// NECRO X: mint a NECRO X card onto the caster's own pile, replacing
/// their score card, and apply it.
pub fn trigger_necro_x(state: &mut GameState, caster: PlayerId) {
    state.abilities.necro_x_used_this_round = true;
    let name = state.name(caster).to_owned();
    state.push_log(format!("{name}: \"This is my best card!\""));

    let mut card = state.decks.mint(CardFace::Effect(EffectKind::NecroX));
    card.caster = Some(caster);

    let pile = &mut state.players[caster].played.effect;
    if let Some(index) = pile.iter().position(|c| c.category() == Some(Category::Score)) {
        let old = pile.remove(index);
        state.decks.discard(old);
    }
    state.players[caster].played.effect.push(card);
    apply_effect(state, Cast::new(EffectKind::NecroX), caster, caster);
}

/// Rei Reversum's free global inversion.
pub fn trigger_reversum(state: &mut GameState, caster: PlayerId) {
    let name = state.name(caster).to_owned();
    state.push_log(format!("{name} uses their ability: REVERSUS TOTAL!"));
    state.abilities.reversum_used_this_round = true;
    apply_effect(state, Cast::global_reversal(), caster, caster);
}

/// Inversus' total inversion. Presentational; cleared at resolution.
pub fn trigger_inversus(state: &mut GameState, caster: PlayerId) {
    let name = state.name(caster).to_owned();
    state.push_log(format!("{name} uses their ability: INVERSÃO TOTAL!"));
    state.announce("INVERSÃO TOTAL", AnnouncementStyle::Inversus, 2500);
    state.abilities.inversus_total_active = true;
}

/// Contravox obscures the human's cards for the round when the human
/// stands on 3, 6 or 9. Returns whether it fired.
pub fn try_contravox(state: &mut GameState) -> bool {
    if state.find_ai(AiKind::Contravox).is_none() || state.abilities.contravox_uses == 0 {
        return false;
    }
    let Some(human) = state.human() else {
        return false;
    };
    if ![3, 6, 9].contains(&state.players[human].position) {
        return false;
    }
    state.push_log("Contravox uses their ability: OÃSUFNOC!");
    state.announce("OÃSUFNOC", AnnouncementStyle::ReversusTotal, 2000);
    state.abilities.human_cards_obscured = true;
    state.abilities.contravox_uses -= 1;
    true
}

/// Knock Versatrix out: her power goes and every yellow space turns white.
pub fn eliminate_versatrix(state: &mut GameState, seat: PlayerId) {
    state.players[seat].is_eliminated = true;
    state.abilities.versatrix_power_disabled = true;
    for space in state.paths.iter_mut().flat_map(|p| p.spaces.iter_mut()) {
        if space.color == SpaceColor::Yellow {
            space.neutralize();
        }
    }
}

/// Versatrix's yellow space, landed on by `seat`.
pub fn yellow_space(state: &mut GameState, seat: PlayerId) {
    if state.abilities.versatrix_power_disabled {
        state.push_log("Versatrix's space is inactive!");
        return;
    }
    let winning = state.config.winning_position;
    let name = state.name(seat).to_owned();

    if state.mode.is_final_boss() {
        state.push_log(format!("{name} triggered a Versatrix space! It affects everyone."));
        let mut moves: Vec<(PlayerId, i32)> = Vec::new();
        if let Some(human) = state.human() {
            moves.push((human, 1));
        }
        if let Some(versatrix) = state.find_ai(AiKind::Versatrix) {
            moves.push((versatrix, 1));
        }
        for necro in state.seats_with(AiKind::NecroversoFinal) {
            moves.push((necro, -1));
        }
        for (id, delta) in moves {
            let player = &mut state.players[id];
            if player.is_eliminated {
                continue;
            }
            let old = player.position;
            player.position = loop_position(i32::from(old) + delta, winning);
            let message = format!("{} moved from {old} to {}.", player.name, player.position);
            state.push_log(message);
        }
        return;
    }

    let player = &mut state.players[seat];
    if player.ai == AiKind::Versatrix && !player.is_human {
        player.position = (player.position + 1).min(winning);
        let message = format!("Versatrix landed on her space and advanced to {}.", player.position);
        state.push_log(message);
    } else {
        player.position = player.position.saturating_sub(1).max(1);
        let message = format!("{name} landed on Versatrix's space and fell back to {}.", player.position);
        state.push_log(message);
    }
}

/// A black hole swallows `seat`. Returns whether the game ended.
pub fn black_hole(state: &mut GameState, seat: PlayerId) -> bool {
    let name = state.name(seat).to_owned();
    state.push_log(format!("{name} fell into a Black Hole!"));
    state.announce("Black Hole!", AnnouncementStyle::Negative, 2500);

    let (is_human, ai) = {
        let player = &state.players[seat];
        (player.is_human, player.ai)
    };
    if is_human {
        finish_story_battle(state, false, Some(LossReason::BlackHole));
        return true;
    }
    match ai {
        AiKind::Versatrix => {
            eliminate_versatrix(state, seat);
            state.push_log("Versatrix was eliminated by the Black Hole! Her powers are gone.");
        }
        AiKind::NecroversoFinal => {
            state.abilities.boss_hearts = state.abilities.boss_hearts.saturating_sub(1);
            let hearts = state.abilities.boss_hearts;
            state.push_log(format!("{name} was hit by a Black Hole! Hearts left: {hearts}"));
            if hearts == 0 {
                finish_story_battle(state, true, None);
                return true;
            }
        }
        _ => {}
    }
    false
}

/// Start-of-round collisions in the final battle. Returns whether the game
/// ended.
pub fn final_boss_collisions(state: &mut GameState) -> bool {
    let spot = |state: &GameState, id: PlayerId| {
        let p = &state.players[id];
        (!p.is_eliminated).then_some((p.path, p.position))
    };
    let human = state.human();
    let versatrix = state.find_ai(AiKind::Versatrix);

    for necro in state.seats_with(AiKind::NecroversoFinal) {
        let Some(necro_spot) = spot(state, necro) else {
            continue;
        };
        if human.and_then(|h| spot(state, h)) == Some(necro_spot) {
            state.push_log("A Necroverso caught you!");
            finish_story_battle(state, false, Some(LossReason::Collision));
            return true;
        }
        if let Some(v) = versatrix {
            if spot(state, v) == Some(necro_spot) {
                eliminate_versatrix(state, v);
                state.push_log("Versatrix was caught by a Necroverso and eliminated! Her powers are gone.");
            }
        }
    }
    false
}

/// Versatrix's Campo Versátil: swap scores and movements with the human
/// this resolution.
#[must_use]
pub fn versatrix_swap_applies(state: &GameState) -> Option<(PlayerId, PlayerId)> {
    let versatrix = state.find_ai(AiKind::Versatrix)?;
    let human = state.human()?;
    if state.players[versatrix].is_eliminated || state.turn < 2 {
        return None;
    }
    let versatrix_score = super::scoring::calculate_score(state, versatrix);
    let human_score = super::scoring::calculate_score(state, human);
    let position = state.players[human].position;
    (versatrix_score < human_score && (6..=9).contains(&position)).then_some((human, versatrix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::PathId;
    use crate::core::{GameConfig, GameMode, GamePhase, StoryBattle};
    use crate::effects::ScoreEffect;

    fn final_battle() -> GameState {
        GameState::new(
            GameMode::Story(StoryBattle::NecroversoFinal),
            GameConfig::default(),
            21,
        )
    }

    const HUMAN: PlayerId = PlayerId::new(0);
    const NECRO: PlayerId = PlayerId::new(1);
    const NECRO_II: PlayerId = PlayerId::new(2);
    const VERSATRIX: PlayerId = PlayerId::new(3);

    #[test]
    fn test_necro_x_replaces_score_card() {
        let mut state = final_battle();
        let mut old = state.decks.effect.pop().unwrap();
        old.face = CardFace::Effect(EffectKind::Menos);
        state.players[NECRO].played.effect.push(old);
        state.players[NECRO].effects.score = Some(ScoreEffect::Menos);

        trigger_necro_x(&mut state, NECRO);

        let pile = &state.players[NECRO].played.effect;
        assert_eq!(pile.len(), 1);
        assert!(pile[0].ephemeral);
        assert_eq!(pile[0].effect(), Some(EffectKind::NecroX));
        assert_eq!(state.players[NECRO].effects.score, Some(ScoreEffect::NecroX));
        assert!(state.abilities.necro_x_used_this_round);
        assert_eq!(state.decks.effect.len(), 25);
    }

    #[test]
    fn test_reversum_ability_sets_global_inversion() {
        let mut state = GameState::new(
            GameMode::Story(StoryBattle::Reversum),
            GameConfig::default(),
            2,
        );
        state.players[HUMAN].effects.score = Some(ScoreEffect::Mais);
        trigger_reversum(&mut state, PlayerId::new(1));

        assert!(state.global_inversion);
        assert!(state.abilities.reversum_used_this_round);
        assert_eq!(state.players[HUMAN].effects.score, Some(ScoreEffect::Menos));
    }

    #[test]
    fn test_contravox_needs_uses_and_position() {
        let mut state = GameState::new(
            GameMode::Story(StoryBattle::Contravox),
            GameConfig::default(),
            2,
        );
        assert!(!try_contravox(&mut state));

        state.players[HUMAN].position = 6;
        assert!(try_contravox(&mut state));
        assert!(state.abilities.human_cards_obscured);
        assert_eq!(state.abilities.contravox_uses, 2);

        state.abilities.contravox_uses = 0;
        assert!(!try_contravox(&mut state));
    }

    #[test]
    fn test_black_hole_outcomes() {
        let mut state = final_battle();
        assert!(!black_hole(&mut state, VERSATRIX));
        assert!(state.players[VERSATRIX].is_eliminated);
        assert!(state.abilities.versatrix_power_disabled);
        assert!(state
            .paths
            .iter()
            .flat_map(|p| &p.spaces)
            .all(|s| s.color != SpaceColor::Yellow));

        assert!(!black_hole(&mut state, NECRO));
        assert!(!black_hole(&mut state, NECRO_II));
        assert!(black_hole(&mut state, NECRO));
        let outcome = state.outcome.clone().unwrap();
        assert!(outcome.story.unwrap().won);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_black_hole_ends_battle_for_human() {
        let mut state = final_battle();
        assert!(black_hole(&mut state, HUMAN));
        let story = state.outcome.unwrap().story.unwrap();
        assert!(!story.won);
        assert_eq!(story.reason, Some(LossReason::BlackHole));
    }

    #[test]
    fn test_yellow_space_in_final_battle_wraps() {
        let mut state = final_battle();
        state.players[HUMAN].position = 10;
        state.players[NECRO].position = 1;
        yellow_space(&mut state, HUMAN);

        assert_eq!(state.players[HUMAN].position, 1);
        assert_eq!(state.players[VERSATRIX].position, 2);
        assert_eq!(state.players[NECRO].position, 10);
    }

    #[test]
    fn test_yellow_space_in_versatrix_battle() {
        let mut state = GameState::new(
            GameMode::Story(StoryBattle::Versatrix),
            GameConfig::default(),
            2,
        );
        state.players[HUMAN].position = 1;
        yellow_space(&mut state, HUMAN);
        assert_eq!(state.players[HUMAN].position, 1);

        yellow_space(&mut state, PlayerId::new(1));
        assert_eq!(state.players[PlayerId::new(1)].position, 2);
    }

    #[test]
    fn test_collisions() {
        let mut state = final_battle();
        for (seat, path) in [(HUMAN, 0), (NECRO, 1), (NECRO_II, 2), (VERSATRIX, 1)] {
            state.players[seat].path = Some(PathId(path));
            state.players[seat].position = 4;
        }
        assert!(!final_boss_collisions(&mut state));
        assert!(state.players[VERSATRIX].is_eliminated);

        state.players[NECRO_II].path = Some(PathId(0));
        assert!(final_boss_collisions(&mut state));
        assert_eq!(
            state.outcome.unwrap().story.unwrap().reason,
            Some(LossReason::Collision)
        );
    }
}
