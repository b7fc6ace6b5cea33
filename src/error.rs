//! Engine error type.
//!
//! Every rule rejection is recoverable: the operation that failed leaves the
//! game state as it was (apart from a log entry) and reports one of these.

use thiserror::Error;

use crate::cards::CardId;
use crate::core::{GamePhase, PlayerId};

/// Errors raised by engine operations.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("unknown player: {0}")]
    UnknownPlayer(PlayerId),

    #[error("card {card} is not in {player}'s hand")]
    CardNotInHand { player: PlayerId, card: CardId },

    #[error("it is {current}'s turn, not {attempted}'s")]
    NotYourTurn { current: PlayerId, attempted: PlayerId },

    #[error("operation not allowed during {0:?}")]
    WrongPhase(GamePhase),

    #[error("effect card {0} needs a target")]
    MissingTarget(CardId),

    #[error("effect card {0} needs a category to reverse")]
    MissingCategory(CardId),

    #[error("{target}'s {category} effect is locked for this round")]
    LockedCategory {
        target: PlayerId,
        category: crate::effects::Category,
    },

    #[error("no legal move: {0}")]
    NoLegalMove(String),

    #[error("a value card must be played before ending the turn")]
    MandatoryValuePlay,

    #[error("no choice is pending")]
    NoPendingChoice,

    #[error("invalid choice: {0}")]
    InvalidChoice(String),

    #[error("no round snapshot to roll back to")]
    NoSnapshot,

    #[error("save data could not be decoded: {0}")]
    Codec(#[from] bincode::Error),

    #[error("save data is corrupt: {0}")]
    CorruptSave(String),

    #[error("unsupported save version {found} (expected {expected})")]
    SaveVersion { found: u32, expected: u32 },
}

/// Result alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
