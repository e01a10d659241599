//! Single-button input: press/release timing and the hold-to-jump strength.

use crate::core::constants::FULL_JUMP_HOLD_SECONDS;

/// Tracks how long the button has been held.
///
/// The frontend reports edges with a millisecond timestamp. While held the
/// run glides; on release the hold duration becomes the jump strength.
#[derive(Debug, Clone, Default)]
pub struct InputTracker {
    pressed_at_ms: Option<u64>,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_held(&self) -> bool {
        self.pressed_at_ms.is_some()
    }

    /// Record a press. Repeated presses while held keep the first timestamp.
    pub fn press_start(&mut self, now_ms: u64) {
        if self.pressed_at_ms.is_none() {
            self.pressed_at_ms = Some(now_ms);
        }
    }

    /// Record a release and return the jump strength, or `None` if the
    /// button was not held.
    pub fn press_end(&mut self, now_ms: u64) -> Option<f64> {
        let start = self.pressed_at_ms.take()?;
        Some(hold_strength(now_ms.saturating_sub(start)))
    }

    /// Drop any in-progress hold without producing a jump.
    pub fn cancel(&mut self) {
        self.pressed_at_ms = None;
    }
}

/// Jump strength for a hold of `held_ms`: linear up to a full jump.
pub fn hold_strength(held_ms: u64) -> f64 {
    let held_seconds = held_ms as f64 / 1000.0;
    (held_seconds / FULL_JUMP_HOLD_SECONDS).clamp(0.0, 1.0)
}
