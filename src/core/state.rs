//! Game state.
//!
//! `GameState` is the single owner of everything a game consists of:
//! seats, decks, board, phase, round-scoped modifiers, the message log and
//! the RNG. Engine operations take it by `&mut` and nothing else holds on
//! to it; restarting or loading replaces it wholesale.
//!
//! ## Card ledger
//!
//! Every non-ephemeral card is in exactly one location at any time.
//! [`GameState::card_locations`] builds the ledger and
//! [`GameState::validate`] checks it, together with the other structural
//! invariants, before a loaded state is accepted.

use im::OrdSet;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::config::{GameConfig, GameMode, PlayerSetup};
use super::messages::{Announcement, AnnouncementStyle, GameLog};
use super::player::{AiKind, Player, PlayerId, PlayerMap};
use super::rng::GameRng;
use crate::board::{generate_board_paths, BoardPath, FieldEffect, FieldEffectKind, PathId};
use crate::cards::{Card, CardId, CardType, Decks};
use crate::effects::Category;
use crate::engine::PendingChoice;
use crate::error::{EngineError, EngineResult};
use crate::rules::GameOutcome;

/// Where the game is in its round/turn cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    Setup,
    InitialDraw,
    Playing,
    /// An AI seat is acting.
    Paused,
    Targeting,
    ReversalTargeting,
    PathCasting,
    FieldEffect,
    FieldEffectTargeting,
    Resolution,
    GameOver,
}

/// One-shot ability bookkeeping and story counters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityState {
    pub reversum_used_this_round: bool,
    pub necro_x_used_this_round: bool,
    pub inversus_total_active: bool,
    pub versatrix_swap_active: bool,
    pub versatrix_power_disabled: bool,
    pub contravox_uses: u8,
    pub human_cards_obscured: bool,
    /// Shared by both bosses of the final battle.
    pub boss_hearts: u8,
}

impl AbilityState {
    fn new(config: &GameConfig) -> Self {
        Self {
            reversum_used_this_round: false,
            necro_x_used_this_round: false,
            inversus_total_active: false,
            versatrix_swap_active: false,
            versatrix_power_disabled: false,
            contravox_uses: config.contravox_uses,
            human_cards_obscured: false,
            boss_hearts: config.boss_hearts,
        }
    }

    /// Clear the flags that only last one round.
    pub fn reset_round(&mut self) {
        self.reversum_used_this_round = false;
        self.necro_x_used_this_round = false;
        self.human_cards_obscured = false;
    }
}

/// Where a card currently sits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CardLocation {
    Deck(CardType),
    Hand(PlayerId),
    PlayedValue(PlayerId),
    PlayedEffect(PlayerId),
    Resto(PlayerId),
}

/// Complete game state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub config: GameConfig,
    pub mode: GameMode,
    pub phase: GamePhase,
    /// Round counter, starting at 1.
    pub turn: u32,
    pub current_player: PlayerId,
    pub players: PlayerMap<Player>,
    pub decks: Decks,
    pub paths: Vec<BoardPath>,
    /// Round-scoped field effects.
    pub field_effects: Vec<FieldEffect>,
    pub global_inversion: bool,
    pub consecutive_passes: usize,
    pub played_any_card_this_turn: bool,
    pub revealed_hands: OrdSet<PlayerId>,
    pub abilities: AbilityState,
    /// Suspended human decision, if any.
    pub pending: Option<PendingChoice>,
    pub outcome: Option<GameOutcome>,
    pub log: GameLog,
    pub rng: GameRng,
    #[serde(skip)]
    pub(crate) announcements: Vec<Announcement>,
}

impl GameState {
    /// Create a game with the mode's default roster.
    #[must_use]
    pub fn new(mode: GameMode, config: GameConfig, seed: u64) -> Self {
        let roster = mode.default_roster();
        Self::with_roster(mode, config, &roster, seed)
    }

    /// Create a game with an explicit roster.
    ///
    /// Paths are assigned by seat except in heart mode (no board) and the
    /// final battle (assigned at game start).
    #[must_use]
    pub fn with_roster(mode: GameMode, config: GameConfig, roster: &[PlayerSetup], seed: u64) -> Self {
        let mut rng = GameRng::new(seed);
        let decks = Decks::build(&config, &mut rng);
        let mut paths = if mode.has_board() {
            generate_board_paths(&config, mode.board_options(), &mut rng)
        } else {
            Vec::new()
        };

        let players = PlayerMap::from_vec(
            roster
                .iter()
                .enumerate()
                .map(|(i, setup)| {
                    let id = PlayerId(i as u8);
                    let mut player = Player::new(id, setup.name.clone(), setup.is_human, setup.ai);
                    if mode.is_heart_mode() {
                        player.hearts = Some(config.inversus_hearts);
                    }
                    if !mode.is_final_boss() {
                        if let Some(path) = paths.get_mut(i) {
                            path.owner = Some(id);
                            player.path = Some(path.id);
                        }
                    }
                    player
                })
                .collect(),
        );

        let mut log = GameLog::new(config.log_capacity);
        log.push(format!("Welcome to Reversus! Mode: {mode}."));
        if mode.is_duo() {
            log.push("Team A (Player 1 & Player 3) vs. Team B (Player 2 & Player 4)");
        }

        Self {
            abilities: AbilityState::new(&config),
            config,
            mode,
            phase: GamePhase::Setup,
            turn: 1,
            current_player: PlayerId::new(0),
            players,
            decks,
            paths,
            field_effects: Vec::new(),
            global_inversion: false,
            consecutive_passes: 0,
            played_any_card_this_turn: false,
            revealed_hands: OrdSet::new(),
            pending: None,
            outcome: None,
            log,
            rng,
            announcements: Vec::new(),
        }
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.player_count()
    }

    /// Look up a seat.
    pub fn player(&self, id: PlayerId) -> EngineResult<&Player> {
        self.players.get(id).ok_or(EngineError::UnknownPlayer(id))
    }

    /// Look up a seat mutably.
    pub fn player_mut(&mut self, id: PlayerId) -> EngineResult<&mut Player> {
        self.players.get_mut(id).ok_or(EngineError::UnknownPlayer(id))
    }

    /// Display name of a seat.
    #[must_use]
    pub fn name(&self, id: PlayerId) -> &str {
        self.players.get(id).map_or("?", |p| p.name.as_str())
    }

    /// The first human seat.
    #[must_use]
    pub fn human(&self) -> Option<PlayerId> {
        self.players.values().find(|p| p.is_human).map(|p| p.id)
    }

    /// The first seat driven by `kind`.
    #[must_use]
    pub fn find_ai(&self, kind: AiKind) -> Option<PlayerId> {
        self.players
            .values()
            .find(|p| !p.is_human && p.ai == kind)
            .map(|p| p.id)
    }

    /// All seats driven by `kind`.
    #[must_use]
    pub fn seats_with(&self, kind: AiKind) -> Vec<PlayerId> {
        self.players
            .values()
            .filter(|p| !p.is_human && p.ai == kind)
            .map(|p| p.id)
            .collect()
    }

    /// Seats still in play.
    pub fn active_players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.players
            .values()
            .filter(|p| !p.is_eliminated)
            .map(|p| p.id)
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Append to the message log.
    pub fn push_log(&mut self, message: impl Into<String>) {
        self.log.push(message);
    }

    /// Queue an announcement for the presentation layer.
    pub fn announce(&mut self, text: impl Into<String>, style: AnnouncementStyle, duration_ms: u64) {
        self.announcements.push(Announcement {
            text: text.into(),
            style,
            duration_ms,
        });
    }

    /// Drain queued announcements.
    pub fn take_announcements(&mut self) -> Vec<Announcement> {
        std::mem::take(&mut self.announcements)
    }

    /// Whether `player` has field effect `kind` this round.
    #[must_use]
    pub fn has_field_effect(&self, player: PlayerId, kind: FieldEffectKind) -> bool {
        self.field_effects
            .iter()
            .any(|fe| fe.applies_to == player && fe.kind == kind)
    }

    /// Whether `player`'s `category` is held by a locked card.
    #[must_use]
    pub fn is_category_locked(&self, player: PlayerId, category: Category) -> bool {
        self.players.get(player).is_some_and(|p| {
            p.played
                .effect
                .iter()
                .any(|c| c.locked && c.category() == Some(category))
        })
    }

    /// Paths somebody currently stands on.
    #[must_use]
    pub fn occupied_paths(&self) -> Vec<PathId> {
        self.players.values().filter_map(|p| p.path).collect()
    }

    /// Build the card ledger. Ephemeral cards are listed too.
    ///
    /// Returns the first duplicated id as an error.
    pub fn card_locations(&self) -> Result<FxHashMap<CardId, CardLocation>, CardId> {
        let mut ledger = FxHashMap::default();
        let mut place = |card: &Card, location: CardLocation| {
            if ledger.insert(card.id, location).is_some() {
                Err(card.id)
            } else {
                Ok(())
            }
        };

        for card in &self.decks.value {
            place(card, CardLocation::Deck(CardType::Value))?;
        }
        for card in &self.decks.effect {
            place(card, CardLocation::Deck(CardType::Effect))?;
        }
        for player in self.players.values() {
            for card in &player.hand {
                place(card, CardLocation::Hand(player.id))?;
            }
            for card in &player.played.value {
                place(card, CardLocation::PlayedValue(player.id))?;
            }
            for card in &player.played.effect {
                place(card, CardLocation::PlayedEffect(player.id))?;
            }
            if let Some(card) = &player.resto {
                place(card, CardLocation::Resto(player.id))?;
            }
        }
        Ok(ledger)
    }

    /// Count non-ephemeral cards of a type across every location.
    #[must_use]
    pub fn conserved_card_count(&self, card_type: CardType) -> usize {
        let decks = self.decks.pile(card_type).iter();
        let seats = self.players.values().flat_map(|p| {
            p.hand
                .iter()
                .chain(&p.played.value)
                .chain(&p.played.effect)
                .chain(p.resto.as_ref())
        });
        decks
            .chain(seats)
            .filter(|c| !c.ephemeral && c.card_type() == card_type)
            .count()
    }

    /// Check the structural invariants.
    pub fn validate(&self) -> EngineResult<()> {
        fn corrupt(msg: String) -> EngineResult<()> {
            Err(EngineError::CorruptSave(msg))
        }

        if !self.players.contains(self.current_player) {
            return corrupt(format!("current player {} is not seated", self.current_player));
        }

        let ledger = match self.card_locations() {
            Ok(ledger) => ledger,
            Err(id) => return corrupt(format!("card {id} is in two places")),
        };
        if let Some(id) = ledger.keys().find(|id| id.0 >= self.decks.next_id().0) {
            return corrupt(format!("card {id} was never allocated"));
        }

        for card in &self.decks.value {
            if !card.is_value() {
                return corrupt(format!("effect card {} in the value deck", card.id));
            }
        }
        for card in &self.decks.effect {
            if !card.is_effect() {
                return corrupt(format!("value card {} in the effect deck", card.id));
            }
        }

        let values = self.conserved_card_count(CardType::Value);
        if values != self.config.value_deck_size() {
            return corrupt(format!(
                "{values} value cards in play, expected {}",
                self.config.value_deck_size()
            ));
        }
        let effects = self.conserved_card_count(CardType::Effect);
        if effects != self.config.effect_deck_size() {
            return corrupt(format!(
                "{effects} effect cards in play, expected {}",
                self.config.effect_deck_size()
            ));
        }

        for player in self.players.values() {
            if player.position == 0 || player.position > self.config.winning_position {
                return corrupt(format!("{} stands on position {}", player.name, player.position));
            }
            if let Some(path) = player.path {
                if path.index() >= self.paths.len() {
                    return corrupt(format!("{} stands on missing {path}", player.name));
                }
            }
            if player.played.value.len() > self.config.max_played_value_cards {
                return corrupt(format!("{} has too many played value cards", player.name));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StoryBattle;

    #[test]
    fn test_new_solo_state() {
        let state = GameState::new(GameMode::Solo { players: 3 }, GameConfig::default(), 42);

        assert_eq!(state.player_count(), 3);
        assert_eq!(state.phase, GamePhase::Setup);
        assert_eq!(state.human(), Some(PlayerId::new(0)));
        assert_eq!(state.paths.len(), 6);
        assert_eq!(state.players[PlayerId::new(2)].path, Some(PathId(2)));
        assert_eq!(state.paths[2].owner, Some(PlayerId::new(2)));
        assert!(state.validate().is_ok());
    }

    #[test]
    fn test_heart_mode_has_no_board() {
        let state = GameState::new(GameMode::Inversus, GameConfig::default(), 1);

        assert!(state.paths.is_empty());
        for player in state.players.values() {
            assert_eq!(player.path, None);
            assert_eq!(player.hearts, Some(10));
        }
    }

    #[test]
    fn test_final_battle_paths_unassigned_until_start() {
        let state = GameState::new(
            GameMode::Story(StoryBattle::NecroversoFinal),
            GameConfig::default(),
            1,
        );
        assert!(state.players.values().all(|p| p.path.is_none()));
        assert_eq!(state.abilities.boss_hearts, 3);
        assert_eq!(state.seats_with(AiKind::NecroversoFinal).len(), 2);
    }

    #[test]
    fn test_validate_detects_duplicate_card() {
        let mut state = GameState::new(GameMode::Solo { players: 2 }, GameConfig::default(), 42);
        let duplicate = state.decks.value[0].clone();
        state.players[PlayerId::new(0)].hand.push(duplicate);

        assert!(matches!(state.validate(), Err(EngineError::CorruptSave(_))));
    }

    #[test]
    fn test_validate_detects_lost_card() {
        let mut state = GameState::new(GameMode::Solo { players: 2 }, GameConfig::default(), 42);
        state.decks.effect.pop();

        assert!(state.validate().is_err());
    }

    #[test]
    fn test_ephemeral_cards_do_not_count() {
        let mut state = GameState::new(GameMode::Solo { players: 2 }, GameConfig::default(), 42);
        let minted = state
            .decks
            .mint(crate::cards::CardFace::Effect(crate::effects::EffectKind::NecroX));
        state.players[PlayerId::new(1)].played.effect.push(minted);

        assert_eq!(state.conserved_card_count(CardType::Effect), 25);
        assert!(state.validate().is_ok());
    }
}
