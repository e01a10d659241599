//! Frame clock that turns wall-clock timestamps into clamped step sizes.

use super::constants::MAX_FRAME_DT;

/// Clamp a raw frame delta to `[0, MAX_FRAME_DT]`.
///
/// Non-finite input (a clock glitch) is treated as a zero-length frame.
pub fn clamp_dt(raw: f64) -> f64 {
    if !raw.is_finite() {
        return 0.0;
    }
    raw.clamp(0.0, MAX_FRAME_DT)
}

/// Tracks the previous frame time. The first frame always has a zero step.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_seconds: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a frame at `now_seconds` and return the step to simulate.
    pub fn advance(&mut self, now_seconds: f64) -> f64 {
        let last = self.last_seconds.unwrap_or(now_seconds);
        self.last_seconds = Some(now_seconds);
        clamp_dt(now_seconds - last)
    }
}
