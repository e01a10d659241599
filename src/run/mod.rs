//! A single run: lifecycle, per-frame tick, input timing and confetti.

pub mod confetti;
pub mod input;
pub mod state;
pub mod types;

pub use confetti::{ConfettiColor, ConfettiParticle};
pub use input::{hold_strength, InputTracker};
pub use state::RunState;
pub use types::{EndCause, RunPhase, TickEvent};
