//! Run phases and the events a tick reports to the presentation layer.

use crate::scoring::MultiplierChange;

/// Lifecycle of a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunPhase {
    /// Menu shown, world seeded, no physics.
    #[default]
    Idle,
    Running,
    /// Physics frozen; the end-of-run leaderboard flow is active.
    GameOver,
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndCause {
    Hazard,
    /// Fell below the bottom of the visible area.
    Fell,
}

/// A single event produced by a tick.
///
/// The UI maps these to HUD cues (pop on pickup, highlight on multiplier
/// increase) and to the end-of-run flow. Game logic never touches UI state.
#[derive(Debug, Clone, PartialEq)]
pub enum TickEvent {
    ShardsCollected { count: u32, bonus: f64 },
    Multiplier(MultiplierChange),
    RunEnded {
        cause: EndCause,
        final_score: u64,
        /// True if the run beat the stored local best.
        new_best: bool,
    },
}
