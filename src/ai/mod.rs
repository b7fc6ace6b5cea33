//! Computer-controlled seats.
//!
//! Planning is pure: a policy looks at the state and returns an
//! [`AiDecision`], an ordered list of [`AiIntent`]s. Executing the intents,
//! pacing them and ending the turn is the driver's job.
//!
//! Policies are trait-based so a game can swap in its own:
//! - `HeuristicPolicy`: the built-in archetype heuristics

pub mod decision;
pub mod intent;

pub use decision::{decide, with_mandatory_value, AiPolicy, HeuristicPolicy};
pub use intent::{AiDecision, AiIntent};
