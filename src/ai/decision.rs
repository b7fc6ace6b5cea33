//! Heuristic turn planning.
//!
//! [`decide`] reads the state and returns an ordered intent list; nothing
//! here mutates the game. Chance rolls draw from the RNG handed in, which
//! the driver forks off the game RNG.
//!
//! ## Priorities
//!
//! 1. Reversum: free global inversion when it nets the own side a gain.
//! 2. Final boss: NECRO X, one roll in three with a resto of 8 or more.
//! 3. The mandatory value card: lowest when far behind, highest otherwise.
//! 4. At most one effect card, first one in hand order with a good target.
//!
//! Inversus plays a separate mirroring strategy.

use crate::board::{PathId, SpaceColor};
use crate::cards::{Card, CardFace};
use crate::core::{AiKind, GameRng, GameState, Play, Player, PlayerId, PlayerStatus};
use crate::effects::{pula_destinations, Category, EffectKind, MoveEffect, ScoreEffect};
use crate::rules::teams::{duo_teams, Seats};

use super::intent::{AiDecision, AiIntent};

/// Chance that Inversus opens with its total inversion.
const INVERSUS_ABILITY_CHANCE: f64 = 0.25;
/// Chance that the final boss casts NECRO X when allowed.
const NECRO_X_CHANCE: f64 = 0.33;
const NECRO_X_MIN_RESTO: u8 = 8;
/// Position gap that makes a seat dump its lowest card.
const BEHIND_MARGIN: i32 = 3;

/// A strategy for computer-controlled seats.
pub trait AiPolicy: Send + Sync {
    /// Plan `player`'s turn.
    fn decide(&self, state: &GameState, player: PlayerId, rng: &mut GameRng) -> AiDecision;
}

/// The built-in heuristic strategy.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicPolicy;

impl AiPolicy for HeuristicPolicy {
    fn decide(&self, state: &GameState, player: PlayerId, rng: &mut GameRng) -> AiDecision {
        decide(state, player, rng)
    }
}

/// Plan a turn for `ai`.
#[must_use]
pub fn decide(state: &GameState, ai: PlayerId, rng: &mut GameRng) -> AiDecision {
    let Some(player) = state.players.get(ai) else {
        return AiDecision::default();
    };
    if player.ai == AiKind::Inversus {
        return mirror_turn(state, player, rng);
    }

    let (team, opponents) = sides(state, player);
    let inverted = state.global_inversion;
    let mut intents = Vec::new();

    let reversum = player.ai == AiKind::Reversum
        && !inverted
        && !state.abilities.reversum_used_this_round
        && !state.mode.is_one_vs_many()
        && inversion_gain(state, &team) > 0;
    if reversum {
        intents.push(AiIntent::UseReversumAbility);
    }

    let necro_x = player.ai == AiKind::NecroversoFinal
        && player.resto_value() >= NECRO_X_MIN_RESTO
        && !state.abilities.necro_x_used_this_round
        && rng.gen_bool(NECRO_X_CHANCE)
        && player
            .effects
            .score
            .map_or(true, |s| s == ScoreEffect::debuff(inverted));
    if necro_x {
        intents.push(AiIntent::UseNecroXAbility);
    }

    if let Some(card) = choose_value_card(state, player, &team, &opponents) {
        intents.push(AiIntent::Play(Play::value(card)));
    }

    if !reversum {
        let planner = EffectPlanner {
            state,
            player,
            team: &team,
            opponents: &opponents,
            inverted,
            necro_x,
        };
        if let Some(play) = planner.first_play() {
            intents.push(AiIntent::Play(play));
        }
    }

    log::debug!("{} plans {:?}", player.name, intents);
    AiDecision::new(intents)
}

/// Ensure a decision honours the mandatory value play by putting the lowest
/// value card in front when the plan left it out.
#[must_use]
pub fn with_mandatory_value(state: &GameState, ai: PlayerId, mut decision: AiDecision) -> AiDecision {
    let Some(player) = state.players.get(ai) else {
        return decision;
    };
    if !player.owes_value_play() {
        return decision;
    }
    let queued = decision.plays().any(|play| {
        player
            .card_in_hand(play.card)
            .is_some_and(Card::is_value)
    });
    if queued {
        return decision;
    }
    if let Some(lowest) = lowest_value(player) {
        log::warn!("{} left out its mandatory value card; forcing {}", player.name, lowest.id);
        decision.intents.insert(0, AiIntent::Play(Play::value(lowest.id)));
    }
    decision
}

/// Own side and opposing seats from the AI's point of view.
///
/// The one-vs-many cluster and the final bosses group by archetype, duo
/// uses the fixed teams, everybody else plays alone.
fn sides(state: &GameState, player: &Player) -> (Seats, Seats) {
    let all: Vec<PlayerId> = state.players.player_ids().collect();
    let team: Seats = if state.mode.is_one_vs_many()
        || (state.mode.is_final_boss() && player.ai == AiKind::NecroversoFinal)
    {
        all.iter()
            .copied()
            .filter(|&id| !state.players[id].is_human && state.players[id].ai == player.ai)
            .collect()
    } else if state.mode.is_duo() {
        let [a, b] = duo_teams(state);
        if a.contains(&player.id) {
            a
        } else {
            b
        }
    } else {
        smallvec::smallvec![player.id]
    };
    let opponents = all.into_iter().filter(|id| !team.contains(id)).collect();
    (team, opponents)
}

/// Net gain for `team` if every Mais/Menos and Sobe/Desce flipped.
fn inversion_gain(state: &GameState, team: &Seats) -> i32 {
    state
        .players
        .values()
        .map(|p| {
            let score = match p.effects.score {
                Some(ScoreEffect::Mais) => -2,
                Some(ScoreEffect::Menos) => 2,
                _ => 0,
            };
            let movement = match p.effects.movement {
                Some(MoveEffect::Sobe) => -2,
                Some(MoveEffect::Desce) => 2,
                _ => 0,
            };
            let change = score + movement;
            if team.contains(&p.id) {
                change
            } else {
                -change
            }
        })
        .sum()
}

fn lowest_value(player: &Player) -> Option<&Card> {
    player.value_cards().min_by_key(|c| c.value())
}

fn highest_value(player: &Player) -> Option<&Card> {
    player.value_cards().fold(None, |best: Option<&Card>, c| match best {
        Some(b) if b.value() >= c.value() => Some(b),
        _ => Some(c),
    })
}

fn choose_value_card(
    state: &GameState,
    player: &Player,
    team: &Seats,
    opponents: &Seats,
) -> Option<crate::cards::CardId> {
    if !player.owes_value_play() {
        return None;
    }
    let best_position = |seats: &Seats| {
        seats
            .iter()
            .map(|&id| i32::from(state.players[id].position))
            .max()
            .unwrap_or(0)
    };
    let aggressive = player.ai == AiKind::Tutorial || state.mode.is_one_vs_many();
    let behind = best_position(opponents) - best_position(team) >= BEHIND_MARGIN;
    let card = if behind && !aggressive {
        lowest_value(player)
    } else {
        highest_value(player)
    };
    card.map(|c| c.id)
}

struct EffectPlanner<'a> {
    state: &'a GameState,
    player: &'a Player,
    team: &'a Seats,
    opponents: &'a Seats,
    inverted: bool,
    necro_x: bool,
}

impl<'a> EffectPlanner<'a> {
    fn first_play(&self) -> Option<Play> {
        self.player
            .effect_cards()
            .find_map(|card| card.effect().and_then(|kind| self.plan(card, kind)))
    }

    fn seats(&self, seats: &'a Seats) -> impl Iterator<Item = &'a Player> + 'a {
        let state = self.state;
        seats
            .iter()
            .map(move |&id| &state.players[id])
            .filter(|p| !p.is_eliminated)
    }

    /// The opponent furthest along, first seat on ties.
    fn leader(&self) -> Option<&'a Player> {
        self.seats(self.opponents).fold(None, |best: Option<&Player>, p| match best {
            Some(b) if b.position >= p.position => Some(b),
            _ => Some(p),
        })
    }

    /// The ally with the lowest live score among those `lacks` accepts.
    fn weakest_ally(&self, lacks: impl Fn(&Player) -> bool) -> Option<&'a Player> {
        self.seats(self.team).filter(|p| lacks(p)).min_by_key(|p| p.live_score)
    }

    fn plan(&self, card: &Card, kind: EffectKind) -> Option<Play> {
        let buff = ScoreEffect::buff(self.inverted);
        let debuff = ScoreEffect::debuff(self.inverted);
        let id = card.id;

        match kind {
            EffectKind::Mais | EffectKind::Menos => {
                if self.necro_x {
                    return None;
                }
                if kind == EffectKind::from(buff) {
                    self.weakest_ally(|p| p.effects.score != Some(buff))
                        .map(|p| Play::effect(id, p.id))
                } else {
                    self.leader()
                        .filter(|p| p.effects.score != Some(debuff))
                        .map(|p| Play::effect(id, p.id))
                }
            }
            EffectKind::Sobe => self
                .weakest_ally(|p| p.effects.movement != Some(MoveEffect::Sobe))
                .map(|p| Play::effect(id, p.id)),
            EffectKind::Desce => self
                .leader()
                .filter(|p| p.effects.movement != Some(MoveEffect::Desce))
                .map(|p| Play::effect(id, p.id)),
            EffectKind::Pula => {
                let leader = self.leader()?;
                let path = self.pula_path(leader.id)?;
                Some(Play::effect(id, leader.id).to_path(path))
            }
            EffectKind::Reversus => {
                let rescue = self.seats(self.team).find(|p| {
                    p.effects.score == Some(debuff) || p.effects.movement == Some(MoveEffect::Desce)
                });
                if let Some(ally) = rescue {
                    let category = if ally.effects.score == Some(debuff) {
                        Category::Score
                    } else {
                        Category::Movement
                    };
                    return Some(Play::effect(id, ally.id).reversing(category));
                }
                self.seats(self.opponents)
                    .find(|p| p.effects.score == Some(buff) || p.effects.movement == Some(MoveEffect::Sobe))
                    .map(|p| {
                        let category = if p.effects.score == Some(buff) {
                            Category::Score
                        } else {
                            Category::Movement
                        };
                        Play::effect(id, p.id).reversing(category)
                    })
            }
            EffectKind::ReversusTotal => {
                let winning = self.seats(self.opponents).find(|p| {
                    p.status == PlayerStatus::Winning
                        && p.effects.score == Some(buff)
                        && !self.state.is_category_locked(p.id, Category::Score)
                });
                if let Some(p) = winning {
                    return Some(Play::effect(id, p.id).reversing(Category::Score).locking());
                }
                (self.global_gain(buff, debuff) > 0).then(|| Play::effect(id, self.player.id))
            }
            EffectKind::NecroX | EffectKind::NecroXInvertido => None,
        }
    }

    /// Net effect of a global reversal: +1 per seat currently hurt, -1 per
    /// seat currently helped, from the own side's point of view.
    fn global_gain(&self, buff: ScoreEffect, debuff: ScoreEffect) -> i32 {
        self.state
            .players
            .values()
            .map(|p| {
                let helped = p.effects.score == Some(buff) || p.effects.movement == Some(MoveEffect::Sobe);
                let hurt = p.effects.score == Some(debuff) || p.effects.movement == Some(MoveEffect::Desce);
                let change = if helped {
                    -1
                } else if hurt {
                    1
                } else {
                    0
                };
                if self.team.contains(&p.id) {
                    change
                } else {
                    -change
                }
            })
            .sum()
    }

    /// Pula destination with the most unused red spaces. Only the final
    /// boss may land on an occupied path.
    fn pula_path(&self, target: PlayerId) -> Option<PathId> {
        let candidates: Vec<PathId> = if self.player.ai == AiKind::NecroversoFinal {
            self.state.paths.iter().map(|p| p.id).collect()
        } else {
            pula_destinations(self.state, target)
        };
        let red = |id: PathId| {
            self.state
                .paths
                .get(id.index())
                .map_or(0, |p| {
                    p.spaces
                        .iter()
                        .filter(|s| s.color == SpaceColor::Red && !s.used)
                        .count()
                })
        };
        candidates.into_iter().fold(None, |best: Option<PathId>, id| match best {
            Some(b) if red(b) >= red(id) => Some(b),
            _ => Some(id),
        })
    }
}

/// Inversus copies the human: the same effect cards aimed back at them and
/// the same value card.
fn mirror_turn(state: &GameState, player: &Player, rng: &mut GameRng) -> AiDecision {
    if !state.abilities.inversus_total_active && rng.gen_bool(INVERSUS_ABILITY_CHANCE) {
        return AiDecision::new(vec![AiIntent::UseInversusAbility]);
    }
    let Some(human) = state.human() else {
        return AiDecision::default();
    };
    let mirrored = &state.players[human];
    let mut intents: Vec<AiIntent> = Vec::new();
    let mut used: Vec<crate::cards::CardId> = Vec::new();

    for theirs in &mirrored.played.effect {
        let Some(kind) = theirs.effect() else {
            continue;
        };
        if player.played.effect.iter().any(|c| c.face == theirs.face) {
            continue;
        }
        let Some(mine) = player
            .effect_cards()
            .find(|c| c.face == theirs.face && !used.contains(&c.id))
        else {
            continue;
        };
        let target = if kind == EffectKind::ReversusTotal {
            player.id
        } else {
            human
        };
        let mut play = Play::effect(mine.id, target);
        if kind == EffectKind::Reversus {
            let Some(category) = theirs.reversed_category else {
                continue;
            };
            play = play.reversing(category);
        }
        used.push(mine.id);
        intents.push(AiIntent::Play(play));
    }

    if player.owes_value_play() {
        let echo = mirrored
            .played
            .value
            .last()
            .and_then(Card::value)
            .and_then(|v| player.value_cards().find(|c| c.face == CardFace::Value(v)));
        if let Some(card) = echo.or_else(|| lowest_value(player)) {
            intents.push(AiIntent::Play(Play::value(card.id)));
        }
    }
    AiDecision::new(intents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardType;
    use crate::core::{GameConfig, GameMode, StoryBattle};

    const P0: PlayerId = PlayerId::new(0);
    const P1: PlayerId = PlayerId::new(1);
    const P2: PlayerId = PlayerId::new(2);

    fn give(state: &mut GameState, seat: PlayerId, face: CardFace) -> crate::cards::CardId {
        let card_type = match face {
            CardFace::Value(_) => CardType::Value,
            CardFace::Effect(_) => CardType::Effect,
        };
        let id = state
            .decks
            .pile(card_type)
            .iter()
            .find(|c| c.face == face)
            .map(|c| c.id)
            .unwrap();
        let card = state.decks.take(card_type, id).unwrap();
        state.players[seat].hand.push(card);
        id
    }

    fn rng() -> GameRng {
        GameRng::new(99)
    }

    fn play_for(decision: &AiDecision, card: crate::cards::CardId) -> Option<Play> {
        decision.plays().find(|p| p.card == card).copied()
    }

    #[test]
    fn test_value_choice_depends_on_gap() {
        let mut state = GameState::new(GameMode::Solo { players: 2 }, GameConfig::default(), 1);
        let low = give(&mut state, P1, CardFace::Value(2));
        let high = give(&mut state, P1, CardFace::Value(10));

        let decision = decide(&state, P1, &mut rng());
        assert!(play_for(&decision, high).is_some());

        state.players[P0].position = 5;
        let decision = decide(&state, P1, &mut rng());
        assert!(play_for(&decision, low).is_some());
        assert!(play_for(&decision, high).is_none());
    }

    #[test]
    fn test_tutorial_always_plays_highest() {
        let mut state = GameState::new(
            GameMode::Story(StoryBattle::Tutorial),
            GameConfig::default(),
            1,
        );
        give(&mut state, P1, CardFace::Value(2));
        let high = give(&mut state, P1, CardFace::Value(8));
        state.players[P0].position = 8;

        let decision = decide(&state, P1, &mut rng());
        assert!(play_for(&decision, high).is_some());
    }

    #[test]
    fn test_no_value_play_with_a_single_card() {
        let mut state = GameState::new(GameMode::Solo { players: 2 }, GameConfig::default(), 1);
        give(&mut state, P1, CardFace::Value(6));
        assert!(decide(&state, P1, &mut rng()).is_empty());
    }

    #[test]
    fn test_buff_self_and_debuff_leader() {
        let mut state = GameState::new(GameMode::Solo { players: 3 }, GameConfig::default(), 1);
        let mais = give(&mut state, P1, CardFace::Effect(EffectKind::Mais));
        let decision = decide(&state, P1, &mut rng());
        assert_eq!(play_for(&decision, mais).and_then(|p| p.target), Some(P1));

        let mut state = GameState::new(GameMode::Solo { players: 3 }, GameConfig::default(), 1);
        state.players[P2].position = 6;
        let menos = give(&mut state, P1, CardFace::Effect(EffectKind::Menos));
        let decision = decide(&state, P1, &mut rng());
        assert_eq!(play_for(&decision, menos).and_then(|p| p.target), Some(P2));
    }

    #[test]
    fn test_buff_and_debuff_swap_under_inversion() {
        let mut state = GameState::new(GameMode::Solo { players: 2 }, GameConfig::default(), 1);
        state.global_inversion = true;
        let menos = give(&mut state, P1, CardFace::Effect(EffectKind::Menos));
        let decision = decide(&state, P1, &mut rng());
        assert_eq!(play_for(&decision, menos).and_then(|p| p.target), Some(P1));
    }

    #[test]
    fn test_only_one_effect_card_per_turn() {
        let mut state = GameState::new(GameMode::Solo { players: 2 }, GameConfig::default(), 1);
        give(&mut state, P1, CardFace::Effect(EffectKind::Mais));
        give(&mut state, P1, CardFace::Effect(EffectKind::Sobe));
        let decision = decide(&state, P1, &mut rng());
        assert_eq!(decision.plays().count(), 1);
    }

    #[test]
    fn test_reversus_rescues_debuffed_self() {
        let mut state = GameState::new(GameMode::Solo { players: 2 }, GameConfig::default(), 1);
        state.players[P1].effects.movement = Some(MoveEffect::Desce);
        let reversus = give(&mut state, P1, CardFace::Effect(EffectKind::Reversus));
        let play = play_for(&decide(&state, P1, &mut rng()), reversus).unwrap();
        assert_eq!(play.target, Some(P1));
        assert_eq!(play.category, Some(Category::Movement));
    }

    #[test]
    fn test_reversus_total_locks_winning_opponent() {
        let mut state = GameState::new(GameMode::Solo { players: 2 }, GameConfig::default(), 1);
        state.players[P0].status = PlayerStatus::Winning;
        state.players[P0].effects.score = Some(ScoreEffect::Mais);
        let total = give(&mut state, P1, CardFace::Effect(EffectKind::ReversusTotal));
        let play = play_for(&decide(&state, P1, &mut rng()), total).unwrap();
        assert_eq!(play.target, Some(P0));
        assert!(play.lock);
        assert_eq!(play.category, Some(Category::Score));
    }

    #[test]
    fn test_reversus_total_global_only_when_it_helps() {
        let mut state = GameState::new(GameMode::Solo { players: 2 }, GameConfig::default(), 1);
        let total = give(&mut state, P1, CardFace::Effect(EffectKind::ReversusTotal));
        assert!(play_for(&decide(&state, P1, &mut rng()), total).is_none());

        state.players[P1].effects.score = Some(ScoreEffect::Menos);
        let play = play_for(&decide(&state, P1, &mut rng()), total).unwrap();
        assert_eq!(play.target, Some(P1));
        assert!(!play.lock);
    }

    #[test]
    fn test_pula_prefers_red_paths_and_skips_occupied() {
        let mut state = GameState::new(GameMode::Solo { players: 2 }, GameConfig::default(), 1);
        for space in state.paths.iter_mut().flat_map(|p| p.spaces.iter_mut()) {
            space.neutralize();
        }
        state.paths[4].spaces[3].color = SpaceColor::Red;
        state.paths[0].spaces[3].color = SpaceColor::Red;
        state.paths[0].spaces[4].color = SpaceColor::Red;
        let pula = give(&mut state, P1, CardFace::Effect(EffectKind::Pula));

        let play = play_for(&decide(&state, P1, &mut rng()), pula).unwrap();
        assert_eq!(play.target, Some(P0));
        assert_eq!(play.pula_path, Some(PathId(4)));
    }

    #[test]
    fn test_reversum_ability_when_inversion_pays() {
        let mut state = GameState::new(
            GameMode::Story(StoryBattle::Reversum),
            GameConfig::default(),
            1,
        );
        give(&mut state, P1, CardFace::Effect(EffectKind::Mais));
        state.players[P0].effects.score = Some(ScoreEffect::Mais);

        let decision = decide(&state, P1, &mut rng());
        assert_eq!(decision.intents, vec![AiIntent::UseReversumAbility]);

        state.abilities.reversum_used_this_round = true;
        let decision = decide(&state, P1, &mut rng());
        assert!(!decision.intents.contains(&AiIntent::UseReversumAbility));
    }

    #[test]
    fn test_duo_buffs_teammate_with_lowest_score() {
        let mut state = GameState::new(GameMode::Duo, GameConfig::default(), 1);
        state.players[P1].live_score = 10;
        state.players[PlayerId::new(3)].live_score = 2;
        let sobe = give(&mut state, P1, CardFace::Effect(EffectKind::Sobe));
        let play = play_for(&decide(&state, P1, &mut rng()), sobe).unwrap();
        assert_eq!(play.target, Some(PlayerId::new(3)));
    }

    #[test]
    fn test_mandatory_value_is_forced_in_front() {
        let mut state = GameState::new(GameMode::Solo { players: 2 }, GameConfig::default(), 1);
        let low = give(&mut state, P1, CardFace::Value(4));
        give(&mut state, P1, CardFace::Value(8));

        let forced = with_mandatory_value(&state, P1, AiDecision::default());
        assert_eq!(forced.intents[0], AiIntent::Play(Play::value(low)));

        let planned = decide(&state, P1, &mut rng());
        let unchanged = with_mandatory_value(&state, P1, planned.clone());
        assert_eq!(unchanged, planned);
    }

    #[test]
    fn test_plans_only_cards_in_hand() {
        for seed in 0..30 {
            let mut state = GameState::new(GameMode::Solo { players: 4 }, GameConfig::default(), seed);
            crate::rules::initial_draw(&mut state);
            crate::rules::prepare_round(&mut state, true);
            for seat in [P1, P2, PlayerId::new(3)] {
                let decision = decide(&state, seat, &mut GameRng::new(seed));
                for play in decision.plays() {
                    assert!(state.players[seat].card_in_hand(play.card).is_some());
                }
            }
        }
    }

    #[test]
    fn test_inversus_mirrors_human() {
        let mut state = GameState::new(GameMode::Inversus, GameConfig::default(), 1);
        state.abilities.inversus_total_active = true;
        let mais = give(&mut state, P0, CardFace::Effect(EffectKind::Mais));
        let card = state.players[P0].take_from_hand(mais).unwrap();
        state.players[P0].played.effect.push(card);
        let six = give(&mut state, P0, CardFace::Value(6));
        let card = state.players[P0].take_from_hand(six).unwrap();
        state.players[P0].played.value.push(card);

        let my_mais = give(&mut state, P1, CardFace::Effect(EffectKind::Mais));
        give(&mut state, P1, CardFace::Value(2));
        let my_six = give(&mut state, P1, CardFace::Value(6));

        let decision = decide(&state, P1, &mut rng());
        assert_eq!(play_for(&decision, my_mais).and_then(|p| p.target), Some(P0));
        assert!(play_for(&decision, my_six).is_some());
    }
}
