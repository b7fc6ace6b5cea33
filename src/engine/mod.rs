//! Game driver.
//!
//! [`Game`] owns the [`GameState`] and sequences the rules: round setup,
//! field effects, turns, resolution and the terminal check. AI turns run
//! inline, one after another, in a loop that only stops when the human has
//! to act or the game is over. What the caller has to do next comes back
//! as a [`Progress`].
//!
//! ## Human protocol
//!
//! - [`Game::select_card`] plays a value card, or starts an effect card
//!   play that asks for its target (and category, scope or path) through
//!   [`ChoiceRequest`]s
//! - [`Game::respond`] answers the pending request; `Cancel` abandons it
//! - [`Game::end_turn`] passes control on
//!
//! ## Snapshots
//!
//! A [`RoundSnapshot`] is taken once each round is set up.
//! [`Game::rollback`] swaps it back in wholesale.

mod ai_turn;
pub mod choice;
pub mod hooks;
mod human;
pub mod timer;

pub use choice::{ChoiceRequest, ChoiceResponse, PendingChoice, PendingPlay, PlayStep, ReversalScope};
pub use hooks::{GameHooks, NoopHooks};
pub use timer::{format_clock, GameTimer};

use crate::ai::{AiPolicy, HeuristicPolicy};
use crate::core::{GameConfig, GameMode, GamePhase, GameState, PlayerId, PlayerSetup};
use crate::error::EngineResult;
use crate::persist::{RoundSnapshot, SaveFile};
use crate::rules::outcome::LossReason;
use crate::rules::round::{assign_final_paths, finish_round_start, finish_story_battle};
use crate::rules::{
    advance_to_next_player, end_game_check, initial_draw, prepare_round, resolve_round,
    trigger_field_effects, FieldStep, GameOutcome, TurnAdvance,
};

/// What the caller has to do next.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Progress {
    /// The human seat may play cards or end the turn.
    AwaitingPlay(PlayerId),
    /// A decision is pending.
    AwaitingChoice(ChoiceRequest),
    /// See [`Game::outcome`].
    GameOver,
}

/// Next step of the driver loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flow {
    NewRound { first: bool },
    FieldEffects { from: usize },
    TurnStart,
    EndTurn,
    ResolveRound,
}

/// Everything needed to start a game.
#[derive(Clone, Debug)]
pub struct GameSetup {
    pub mode: GameMode,
    pub config: GameConfig,
    pub seed: u64,
    /// Replaces the mode's default roster.
    pub roster: Option<Vec<PlayerSetup>>,
}

impl GameSetup {
    #[must_use]
    pub fn new(mode: GameMode) -> Self {
        Self {
            mode,
            config: GameConfig::default(),
            seed: 0,
            roster: None,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_roster(mut self, roster: Vec<PlayerSetup>) -> Self {
        self.roster = Some(roster);
        self
    }

    /// Rename one seat, keeping the rest of the roster.
    #[must_use]
    pub fn with_player_name(mut self, seat: PlayerId, name: impl Into<String>) -> Self {
        let mut roster = self.roster.take().unwrap_or_else(|| self.mode.default_roster());
        if let Some(setup) = roster.get_mut(seat.index()) {
            setup.name = name.into();
        }
        self.roster = Some(roster);
        self
    }

    /// The initial state, before the opening draw.
    #[must_use]
    pub fn build_state(&self) -> GameState {
        match &self.roster {
            Some(roster) => GameState::with_roster(self.mode, self.config.clone(), roster, self.seed),
            None => GameState::new(self.mode, self.config.clone(), self.seed),
        }
    }
}

/// A running game.
pub struct Game<H: GameHooks = NoopHooks> {
    state: GameState,
    hooks: H,
    policy: Box<dyn AiPolicy>,
    snapshot: Option<RoundSnapshot>,
    timer: GameTimer,
    outcome_reported: bool,
}

impl Game<NoopHooks> {
    /// Create a game. Nothing happens until [`Game::start`].
    #[must_use]
    pub fn new(setup: &GameSetup) -> Self {
        Self::from_state(setup.build_state())
    }

    /// Drive an existing state.
    #[must_use]
    pub fn from_state(state: GameState) -> Self {
        let timer = GameTimer::new(countdown_for(&state));
        Self {
            state,
            hooks: NoopHooks,
            policy: Box::new(HeuristicPolicy),
            snapshot: None,
            timer,
            outcome_reported: false,
        }
    }
}

impl<H: GameHooks> Game<H> {
    /// Replace the presentation hooks.
    #[must_use]
    pub fn with_hooks<H2: GameHooks>(self, hooks: H2) -> Game<H2> {
        Game {
            state: self.state,
            hooks,
            policy: self.policy,
            snapshot: self.snapshot,
            timer: self.timer,
            outcome_reported: self.outcome_reported,
        }
    }

    /// Replace the AI policy.
    #[must_use]
    pub fn with_policy<P: AiPolicy + 'static>(mut self, policy: P) -> Self {
        self.policy = Box::new(policy);
        self
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    #[must_use]
    pub fn timer(&self) -> &GameTimer {
        &self.timer
    }

    #[must_use]
    pub fn snapshot(&self) -> Option<&RoundSnapshot> {
        self.snapshot.as_ref()
    }

    #[must_use]
    pub fn outcome(&self) -> Option<&GameOutcome> {
        self.state.outcome.as_ref()
    }

    #[must_use]
    pub fn into_state(self) -> GameState {
        self.state
    }

    /// Opening draw (or final-battle path assignment) and the first round.
    pub fn start(&mut self) -> Progress {
        if self.state.phase != GamePhase::Setup {
            log::warn!("start called during {:?}", self.state.phase);
            return self.progress();
        }
        log::info!("starting {} with seed {}", self.state.mode, self.state.rng.state().seed);
        self.timer = GameTimer::new(countdown_for(&self.state));
        if self.state.mode.is_final_boss() {
            assign_final_paths(&mut self.state);
        } else if self.state.mode.has_initial_draw() {
            self.state.phase = GamePhase::InitialDraw;
            initial_draw(&mut self.state);
        }
        self.run(Flow::NewRound { first: true })
    }

    /// What the game is waiting for, without advancing it.
    #[must_use]
    pub fn progress(&self) -> Progress {
        if self.state.is_over() {
            return Progress::GameOver;
        }
        if let Some(request) = self.pending_request() {
            return Progress::AwaitingChoice(request);
        }
        Progress::AwaitingPlay(self.state.current_player)
    }

    /// Check the countdown. Returns whether it just ended the game.
    pub fn tick(&mut self) -> bool {
        let expired = self.check_timer();
        if expired {
            self.game_over();
        }
        expired
    }

    /// Encode the game for storage.
    pub fn save(&self) -> EngineResult<Vec<u8>> {
        SaveFile::new(self.state.clone(), self.timer.elapsed_secs()).encode()
    }

    /// Replace the running game with a saved one.
    ///
    /// Nothing changes unless the whole save decodes and validates.
    pub fn load(&mut self, bytes: &[u8]) -> EngineResult<Progress> {
        let save = match SaveFile::decode(bytes) {
            Ok(save) => save,
            Err(err) => {
                log::warn!("rejected save: {err}");
                return Err(err);
            }
        };
        self.timer = GameTimer::new(countdown_for(&save.state)).with_elapsed(save.elapsed_secs);
        self.state = save.state;
        self.snapshot = None;
        self.outcome_reported = self.state.is_over();
        self.state.push_log("Game loaded.");
        Ok(self.resume())
    }

    /// Continue after the state was swapped in from outside.
    fn resume(&mut self) -> Progress {
        if self.state.is_over() || self.state.pending.is_some() {
            self.hooks.render(&self.state);
            return self.progress();
        }
        match self.state.phase {
            GamePhase::Setup => self.start(),
            _ => self.run(Flow::TurnStart),
        }
    }

    /// The pending decision with its options.
    #[must_use]
    pub fn pending_request(&self) -> Option<ChoiceRequest> {
        self.state
            .pending
            .as_ref()
            .and_then(|pending| ChoiceRequest::from_pending(&self.state, pending))
    }

    /// Forward queued announcements.
    fn flush(&mut self) {
        for announcement in self.state.take_announcements() {
            self.hooks.announce(&announcement);
        }
    }

    fn check_timer(&mut self) -> bool {
        if self.state.is_over() || !self.timer.is_expired() {
            return false;
        }
        log::info!("final battle countdown expired");
        finish_story_battle(&mut self.state, false, Some(LossReason::Time));
        true
    }

    fn game_over(&mut self) -> Progress {
        self.flush();
        self.hooks.render(&self.state);
        if !self.outcome_reported {
            self.outcome_reported = true;
            if let Some(outcome) = &self.state.outcome {
                log::info!("game over: {}", outcome.message);
                self.hooks.outcome(outcome);
            }
        }
        Progress::GameOver
    }

    /// Round set up and field effects done: hand over to the first seat.
    fn begin_round(&mut self) {
        finish_round_start(&mut self.state);
        self.snapshot = Some(RoundSnapshot::capture(&self.state));
        log::debug!("round {} snapshot taken", self.state.turn);
    }

    /// Run until the human must act or the game ends.
    fn run(&mut self, mut flow: Flow) -> Progress {
        loop {
            self.flush();
            self.check_timer();
            if self.state.is_over() {
                return self.game_over();
            }

            flow = match flow {
                Flow::NewRound { first } => {
                    if !prepare_round(&mut self.state, first) {
                        continue;
                    }
                    self.state.phase = GamePhase::FieldEffect;
                    Flow::FieldEffects { from: 0 }
                }
                Flow::FieldEffects { from } => match trigger_field_effects(&mut self.state, from) {
                    FieldStep::Done => {
                        self.begin_round();
                        Flow::TurnStart
                    }
                    FieldStep::GameOver => continue,
                    FieldStep::NeedsChoice => {
                        self.flush();
                        self.hooks.render(&self.state);
                        return self.progress();
                    }
                },
                Flow::TurnStart => {
                    let current = self.state.current_player;
                    if self.state.players[current].is_human {
                        self.state.phase = GamePhase::Playing;
                        self.hooks.render(&self.state);
                        return Progress::AwaitingPlay(current);
                    }
                    self.run_ai_turn(current);
                    Flow::EndTurn
                }
                Flow::EndTurn => match advance_to_next_player(&mut self.state) {
                    TurnAdvance::NextPlayer(_) => Flow::TurnStart,
                    TurnAdvance::RoundOver => Flow::ResolveRound,
                },
                Flow::ResolveRound => {
                    let report = resolve_round(&mut self.state);
                    self.flush();
                    self.hooks.round_summary(&report);
                    if end_game_check(&mut self.state) {
                        continue;
                    }
                    Flow::NewRound { first: false }
                }
            };
        }
    }
}

fn countdown_for(state: &GameState) -> Option<u64> {
    state
        .mode
        .is_final_boss()
        .then_some(state.config.final_countdown_secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StoryBattle;

    fn quick(mode: GameMode, seed: u64) -> GameSetup {
        GameSetup::new(mode)
            .with_config(GameConfig::default().without_pacing())
            .with_seed(seed)
    }

    #[test]
    fn test_start_hands_control_to_a_seat() {
        let mut game = Game::new(&quick(GameMode::Solo { players: 3 }, 5));
        let progress = game.start();

        match progress {
            Progress::AwaitingPlay(seat) => {
                assert_eq!(seat, PlayerId::new(0));
                assert_eq!(game.state().phase, GamePhase::Playing);
                assert!(game.snapshot().is_some());
            }
            Progress::AwaitingChoice(_) => assert!(game.state().pending.is_some()),
            Progress::GameOver => assert!(game.outcome().is_some()),
        }
        assert!(game.state().players.values().all(|p| p.resto.is_some()));
    }

    #[test]
    fn test_start_twice_is_harmless() {
        let mut game = Game::new(&quick(GameMode::Duo, 8));
        let first = game.start();
        let turn = game.state().turn;
        let second = game.start();
        assert_eq!(first, second);
        assert_eq!(game.state().turn, turn);
    }

    #[test]
    fn test_player_name_override() {
        let setup = GameSetup::new(GameMode::Solo { players: 2 }).with_player_name(PlayerId::new(1), "Rival");
        let state = setup.build_state();
        assert_eq!(state.name(PlayerId::new(1)), "Rival");
        assert_eq!(state.name(PlayerId::new(0)), "You");
    }

    #[test]
    fn test_final_battle_uses_a_countdown() {
        let game = Game::new(&quick(GameMode::Story(StoryBattle::NecroversoFinal), 1));
        assert!(game.timer().is_countdown());
        let solo = Game::new(&quick(GameMode::Solo { players: 2 }, 1));
        assert!(!solo.timer().is_countdown());
    }
}
