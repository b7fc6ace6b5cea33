//! Effect system.
//!
//! - `EffectKind`: closed set of card and ability effects, with the
//!   involutive inversion table
//! - `Cast` / `apply_effect`: writes one effect onto one seat
//! - targeting helpers: legal targets, cluster expansion, Pula destinations
//!
//! ## Inversion layers
//!
//! Three modifiers interact. A plain Reversus flips one category on one
//! seat. Reversus Total either flips one category and locks it for the
//! round, or raises the global inversion flag, which flips every unlocked
//! category at once and substitutes the inverse for every later effect
//! until the round ends.

mod effect;
mod resolver;
mod targeting;

pub use effect::{Category, EffectKind, MoveEffect, ScoreEffect};
pub use resolver::{apply_effect, Cast};
pub use targeting::{expand_targets, pula_destinations, reversible_categories, valid_targets};
