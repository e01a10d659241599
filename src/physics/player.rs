//! Player body: vertical integration and the two-jump budget.

use crate::core::config::PhysicsTuning;
use crate::core::constants::{PLAYER_HEIGHT, PLAYER_WIDTH};
use crate::core::geometry::Rect;

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Left edge. Pinned to a fraction of the viewport width every frame.
    pub x: f64,
    /// Top edge. Grows downward.
    pub y: f64,
    /// Vertical velocity in units/s, positive = falling.
    pub vy: f64,
    pub on_ground: bool,
    /// Jumps used since the last landing.
    pub jump_count: u32,
}

impl Player {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            vy: 0.0,
            on_ground: false,
            jump_count: 0,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, PLAYER_WIDTH, PLAYER_HEIGHT)
    }

    /// Horizontal centre of the feet.
    pub fn feet_x(&self) -> f64 {
        self.x + PLAYER_WIDTH * 0.5
    }

    pub fn bottom(&self) -> f64 {
        self.y + PLAYER_HEIGHT
    }

    /// Apply one step of gravity and move. Gliding uses the reduced gravity
    /// and caps the fall speed.
    pub fn integrate(&mut self, dt: f64, gliding: bool, tuning: &PhysicsTuning) {
        let gravity = if gliding {
            tuning.glide_gravity
        } else {
            tuning.gravity
        };
        self.vy += gravity * dt;
        if gliding {
            self.vy = self.vy.min(tuning.max_glide_fall_speed);
        }
        self.y += self.vy * dt;
    }

    pub fn can_jump(&self, tuning: &PhysicsTuning) -> bool {
        self.jump_count < tuning.max_jumps
    }

    /// Launch upward with an impulse scaled by `strength` (clamped to [0, 1]).
    ///
    /// Returns false and leaves the body untouched when the jump budget is spent.
    pub fn jump(&mut self, strength: f64, tuning: &PhysicsTuning) -> bool {
        if !self.can_jump(tuning) {
            return false;
        }
        let t = if strength.is_nan() {
            0.0
        } else {
            strength.clamp(0.0, 1.0)
        };
        let impulse =
            tuning.min_jump_impulse + (tuning.max_jump_impulse - tuning.min_jump_impulse) * t;
        self.vy = -impulse;
        self.on_ground = false;
        self.jump_count += 1;
        true
    }

    /// Rest the feet exactly on `surface_y`.
    pub fn land_on(&mut self, surface_y: f64) {
        self.y = surface_y - PLAYER_HEIGHT;
        self.vy = 0.0;
        self.on_ground = true;
        self.jump_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuning() -> PhysicsTuning {
        PhysicsTuning::default()
    }

    #[test]
    fn test_gravity_accumulates() {
        let mut p = Player::new(0.0, 100.0);
        p.integrate(0.1, false, &tuning());
        assert!((p.vy - 160.0).abs() < 1e-9);
        assert!((p.y - 116.0).abs() < 1e-9);
    }

    #[test]
    fn test_glide_uses_reduced_gravity() {
        let mut normal = Player::new(0.0, 0.0);
        let mut glide = Player::new(0.0, 0.0);
        normal.integrate(0.05, false, &tuning());
        glide.integrate(0.05, true, &tuning());
        assert!(glide.vy < normal.vy);
        assert!((glide.vy - 26.0).abs() < 1e-9);
    }

    #[test]
    fn test_glide_caps_fall_speed() {
        let mut p = Player::new(0.0, 0.0);
        p.vy = 900.0;
        p.integrate(0.05, true, &tuning());
        assert!((p.vy - crate::core::constants::MAX_GLIDE_FALL_SPEED).abs() < 1e-9);
    }

    #[test]
    fn test_no_cap_without_glide() {
        let mut p = Player::new(0.0, 0.0);
        p.vy = 900.0;
        p.integrate(0.05, false, &tuning());
        assert!(p.vy > 900.0);
    }

    #[test]
    fn test_jump_impulse_range() {
        let mut p = Player::new(0.0, 0.0);
        assert!(p.jump(0.0, &tuning()));
        assert!((p.vy + 460.0).abs() < 1e-9);

        let mut p = Player::new(0.0, 0.0);
        assert!(p.jump(1.0, &tuning()));
        assert!((p.vy + 760.0).abs() < 1e-9);

        let mut p = Player::new(0.0, 0.0);
        assert!(p.jump(0.5, &tuning()));
        assert!((p.vy + 610.0).abs() < 1e-9);
    }

    #[test]
    fn test_jump_strength_is_clamped() {
        let mut p = Player::new(0.0, 0.0);
        p.jump(-4.0, &tuning());
        assert!((p.vy + 460.0).abs() < 1e-9);

        let mut p = Player::new(0.0, 0.0);
        p.jump(7.0, &tuning());
        assert!((p.vy + 760.0).abs() < 1e-9);

        let mut p = Player::new(0.0, 0.0);
        p.jump(f64::NAN, &tuning());
        assert!((p.vy + 460.0).abs() < 1e-9);
    }

    #[test]
    fn test_third_jump_is_rejected() {
        let mut p = Player::new(0.0, 0.0);
        p.on_ground = true;
        assert!(p.jump(1.0, &tuning()));
        assert!(!p.on_ground);
        assert!(p.jump(1.0, &tuning()));
        assert_eq!(p.jump_count, 2);

        p.vy = 123.0;
        assert!(!p.jump(1.0, &tuning()));
        assert_eq!(p.jump_count, 2);
        assert!((p.vy - 123.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_land_on_resets_jumps() {
        let mut p = Player::new(0.0, 0.0);
        p.jump_count = 2;
        p.vy = 300.0;
        p.land_on(500.0);
        assert!((p.y - (500.0 - PLAYER_HEIGHT)).abs() < f64::EPSILON);
        assert_eq!(p.vy, 0.0);
        assert!(p.on_ground);
        assert_eq!(p.jump_count, 0);
    }
}
