//! Running one AI turn.
//!
//! The policy plans on a fork of the game RNG, the mandatory value play is
//! enforced, then every intent is executed in order with a pause before
//! each. A failed intent is logged and skipped; it never aborts the turn.

use crate::ai::{with_mandatory_value, AiIntent};
use crate::core::{GamePhase, Play, PlayerId};
use crate::effects::EffectKind;
use crate::rules::abilities::{trigger_inversus, trigger_necro_x, trigger_reversum};
use crate::rules::play_card;

use super::{Game, GameHooks};

impl<H: GameHooks> Game<H> {
    /// Plan and execute `seat`'s turn. The caller advances the turn.
    pub(super) fn run_ai_turn(&mut self, seat: PlayerId) {
        let message = format!("{} is thinking...", self.state.name(seat));
        self.state.push_log(message);
        self.state.phase = GamePhase::Paused;
        self.hooks.render(&self.state);
        self.hooks.pause(self.state.config.ai_think_ms);

        let mut rng = self.state.rng.fork();
        let planned = self.policy.decide(&self.state, seat, &mut rng);
        let decision = with_mandatory_value(&self.state, seat, planned);
        log::debug!("{seat} plans {:?}", decision.intents);

        for intent in decision.intents {
            self.hooks.pause(self.state.config.ai_action_ms);
            self.execute_intent(seat, intent);
            self.flush();
            self.hooks.render(&self.state);
            if self.state.is_over() {
                return;
            }
        }

        self.hooks.pause(self.state.config.ai_wrapup_ms);
        self.state.phase = GamePhase::Playing;
    }

    fn execute_intent(&mut self, seat: PlayerId, intent: AiIntent) {
        match intent {
            AiIntent::UseReversumAbility => trigger_reversum(&mut self.state, seat),
            AiIntent::UseNecroXAbility => trigger_necro_x(&mut self.state, seat),
            AiIntent::UseInversusAbility => trigger_inversus(&mut self.state, seat),
            AiIntent::Play(play) => self.execute_play(seat, &play),
        }
    }

    fn execute_play(&mut self, seat: PlayerId, play: &Play) {
        let Some(card) = self.state.players[seat].card_in_hand(play.card) else {
            log::warn!("{seat} planned card {} which is not in hand", play.card);
            self.state.push_log("(AI tried to play a card not in hand)");
            return;
        };
        if card.effect() == Some(EffectKind::Pula) {
            if let (Some(target), Some(path)) = (play.target, play.pula_path) {
                let message = format!(
                    "{} chose for {} to jump to {path}.",
                    self.state.name(seat),
                    self.state.name(target)
                );
                self.state.push_log(message);
            }
        }
        if let Err(err) = play_card(&mut self.state, seat, play) {
            log::warn!("{seat}'s play of card {} failed: {err}", play.card);
        }
    }
}
