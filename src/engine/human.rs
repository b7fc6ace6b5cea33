//! The human side of the request/response protocol.

use crate::cards::{CardFace, CardId};
use crate::core::{GamePhase, Play, PlayerId};
use crate::effects::{pula_destinations, reversible_categories, valid_targets};
use crate::error::{EngineError, EngineResult};
use crate::rules::{play_card, resume_trade, FieldStep};

use super::choice::{ChoiceResponse, PendingChoice, PendingPlay, PlayStep, ReversalScope};
use super::{Flow, Game, GameHooks, Progress};

impl<H: GameHooks> Game<H> {
    /// Pick a card from the human's hand.
    ///
    /// Value cards are played at once. Effect cards open a pending play
    /// whose first request comes back as [`Progress::AwaitingChoice`].
    pub fn select_card(&mut self, card: CardId) -> EngineResult<Progress> {
        let seat = self.human_turn()?;
        if self.state.phase != GamePhase::Playing || self.state.pending.is_some() {
            return Err(EngineError::WrongPhase(self.state.phase));
        }
        let player = &self.state.players[seat];
        let face = player
            .card_in_hand(card)
            .map(|c| c.face)
            .ok_or(EngineError::CardNotInHand { player: seat, card })?;

        match face {
            CardFace::Value(_) => {
                if player.played_value_this_turn {
                    return Err(self.reject(EngineError::NoLegalMove(
                        "only one value card can be played per turn".to_owned(),
                    )));
                }
                self.play(seat, Play::value(card))
            }
            CardFace::Effect(kind) => {
                let pending = PendingPlay::new(card, kind);
                log::debug!("{seat} selected {kind}");
                self.state.phase = pending.phase();
                self.state.pending = Some(PendingChoice::Play(pending));
                self.hooks.render(&self.state);
                Ok(self.progress())
            }
        }
    }

    /// Answer the pending request.
    pub fn respond(&mut self, response: ChoiceResponse) -> EngineResult<Progress> {
        let Some(pending) = self.state.pending.clone() else {
            return Err(EngineError::NoPendingChoice);
        };
        match pending {
            PendingChoice::Trade { .. } => {
                let partner = match response {
                    ChoiceResponse::Player(partner) => Some(partner),
                    ChoiceResponse::Cancel => None,
                    other => {
                        return Err(self.reject(EngineError::InvalidChoice(format!(
                            "{other:?} does not answer a trade"
                        ))))
                    }
                };
                let step = resume_trade(&mut self.state, partner).map_err(|err| self.reject(err))?;
                Ok(self.continue_field_effects(step))
            }
            PendingChoice::Play(_) if response == ChoiceResponse::Cancel => Ok(self.cancel_play()),
            PendingChoice::Play(play) => {
                let seat = self.human_turn()?;
                self.advance_play(seat, play, response)
            }
        }
    }

    /// Abandon the pending decision. A pending trade is declined.
    pub fn cancel(&mut self) -> EngineResult<Progress> {
        self.respond(ChoiceResponse::Cancel)
    }

    /// End the human's turn and run the AI seats that follow.
    pub fn end_turn(&mut self) -> EngineResult<Progress> {
        let seat = self.human_turn()?;
        if self.state.pending.is_some() {
            return Err(EngineError::WrongPhase(self.state.phase));
        }
        if self.state.players[seat].owes_value_play() {
            self.state
                .push_log("Rule: you must play a value card before ending the turn");
            return Err(EngineError::MandatoryValuePlay);
        }
        Ok(self.run(Flow::EndTurn))
    }

    /// Restore the state captured when the current round started.
    pub fn rollback(&mut self) -> EngineResult<Progress> {
        let snapshot = self.snapshot.as_ref().ok_or(EngineError::NoSnapshot)?;
        log::info!("rolling back to round {}", snapshot.round);
        self.state = snapshot.restore();
        self.outcome_reported = self.state.is_over();
        self.state.push_log("The round was restarted.");
        Ok(self.resume())
    }

    /// The human seat, if it is the one to act.
    fn human_turn(&self) -> EngineResult<PlayerId> {
        if self.state.is_over() {
            return Err(EngineError::WrongPhase(GamePhase::GameOver));
        }
        let current = self.state.current_player;
        if self.state.players[current].is_human {
            return Ok(current);
        }
        Err(EngineError::NotYourTurn {
            current,
            attempted: self.state.human().unwrap_or(current),
        })
    }

    /// Log a rejection and hand the error back.
    fn reject(&mut self, err: EngineError) -> EngineError {
        if !matches!(err, EngineError::LockedCategory { .. }) {
            self.state.push_log(format!("Invalid move: {err}."));
        }
        err
    }

    fn cancel_play(&mut self) -> Progress {
        self.state.pending = None;
        self.state.phase = GamePhase::Playing;
        self.state.push_log("Play cancelled.");
        self.hooks.render(&self.state);
        self.progress()
    }

    fn advance_play(
        &mut self,
        seat: PlayerId,
        mut play: PendingPlay,
        response: ChoiceResponse,
    ) -> EngineResult<Progress> {
        match (play.step(), response) {
            (PlayStep::Scope, ChoiceResponse::Scope(scope)) => {
                play.scope = Some(scope);
                if scope == ReversalScope::Global {
                    play.target = Some(seat);
                }
            }
            (PlayStep::Target, ChoiceResponse::Player(target)) => {
                if !valid_targets(&self.state).contains(&target) {
                    return Err(self.reject(EngineError::InvalidChoice(format!(
                        "{} cannot be targeted",
                        self.state.name(target)
                    ))));
                }
                play.target = Some(target);
                if play.step() == PlayStep::Category && reversible_categories(&self.state, target).is_empty() {
                    return Err(self.reject(EngineError::NoLegalMove(format!(
                        "{} has no effect to reverse",
                        self.state.name(target)
                    ))));
                }
            }
            (PlayStep::Category, ChoiceResponse::Category(category)) => {
                let offered = play
                    .target
                    .map(|target| reversible_categories(&self.state, target))
                    .unwrap_or_default();
                if !offered.contains(&category) {
                    return Err(self.reject(EngineError::InvalidChoice(format!(
                        "{category} cannot be reversed"
                    ))));
                }
                play.category = Some(category);
            }
            (PlayStep::Path, ChoiceResponse::Path(path)) => {
                if !self.destinations(&play).contains(&path) {
                    return Err(self.reject(EngineError::InvalidChoice(format!("{path} is not free"))));
                }
                return self.finish_play(seat, play, Some(path));
            }
            (step, other) => {
                return Err(self.reject(EngineError::InvalidChoice(format!(
                    "{other:?} does not answer {step:?}"
                ))))
            }
        }

        match play.step() {
            PlayStep::Ready => self.finish_play(seat, play, None),
            // Nothing to choose from: let the rules decide (no board, or no free path).
            PlayStep::Path if self.destinations(&play).is_empty() => self.finish_play(seat, play, None),
            _ => {
                self.state.phase = play.phase();
                self.state.pending = Some(PendingChoice::Play(play));
                self.hooks.render(&self.state);
                Ok(self.progress())
            }
        }
    }

    fn destinations(&self, play: &PendingPlay) -> Vec<crate::board::PathId> {
        play.target
            .map(|target| pula_destinations(&self.state, target))
            .unwrap_or_default()
    }

    fn finish_play(
        &mut self,
        seat: PlayerId,
        pending: PendingPlay,
        path: Option<crate::board::PathId>,
    ) -> EngineResult<Progress> {
        let play = pending
            .to_play(path)
            .ok_or_else(|| EngineError::InvalidChoice("the play is incomplete".to_owned()))?;
        self.state.pending = None;
        self.state.phase = GamePhase::Playing;
        self.play(seat, play)
    }

    fn play(&mut self, seat: PlayerId, play: Play) -> EngineResult<Progress> {
        let result = play_card(&mut self.state, seat, &play);
        self.state.pending = None;
        self.state.phase = GamePhase::Playing;
        self.flush();
        self.hooks.render(&self.state);
        match result {
            Ok(()) => Ok(self.progress()),
            Err(err) => Err(self.reject(err)),
        }
    }

    /// Pick the field walk back up after a trade.
    fn continue_field_effects(&mut self, step: FieldStep) -> Progress {
        match step {
            FieldStep::Done => {
                self.begin_round();
                self.run(Flow::TurnStart)
            }
            FieldStep::GameOver => self.run(Flow::TurnStart),
            FieldStep::NeedsChoice => {
                self.flush();
                self.hooks.render(&self.state);
                self.progress()
            }
        }
    }
}
