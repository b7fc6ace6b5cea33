//! Game rules.
//!
//! Everything here is a plain function over `&mut GameState`:
//! - `play`: card placement and effect application
//! - `scoring`: round score and live standings
//! - `turn`: rotation and passes
//! - `round`: opening draw, round setup, resolution, terminal checks
//! - `field`: board spaces firing at round start
//! - `abilities`: story-battle abilities and special spaces
//! - `teams`: side membership per mode
//!
//! Sequencing these into a playable game is the job of
//! [`engine`](crate::engine).

pub mod abilities;
pub mod field;
pub mod outcome;
pub mod play;
pub mod round;
pub mod scoring;
pub mod teams;
pub mod turn;

pub use field::{perform_trade, resume_trade, trigger_field_effects, FieldStep, TradeKind};
pub use outcome::{GameOutcome, GameResult, LossReason, OutcomeEvent};
pub use play::play_card;
pub use round::{
    end_game_check, initial_draw, prepare_round, resolve_round, wrap_position, RoundReport,
};
pub use scoring::{calculate_score, effective_resto, refresh_live_scores};
pub use turn::{advance_to_next_player, TurnAdvance};
