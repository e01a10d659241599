//! Score and multiplier economy.
//!
//! Score accrues passively with time and in bursts from shard pickups. Each
//! shard fills the multiplier meter; a full meter bumps the integer
//! multiplier. The meter drains every frame, faster while gliding, and an
//! empty meter costs one multiplier level.

use crate::core::config::{EconomyTuning, WorldTuning};

/// What a frame did to the multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiplierChange {
    Increased { multiplier: u32 },
    Decreased { multiplier: u32 },
}

/// Result of collecting shards in one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickupOutcome {
    pub count: u32,
    pub bonus: f64,
    /// Multiplier levels gained from meter overflow this frame.
    pub levels_gained: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Economy {
    pub score: f64,
    pub shards: u32,
    pub multiplier: u32,
    /// Fractional progress toward the next multiplier level.
    pub meter: f64,
    /// Current scroll speed in units/s.
    pub world_speed: f64,
    pub tuning: EconomyTuning,
}

impl Economy {
    /// Fresh run totals, scrolling at the base speed of `world`.
    pub fn new(tuning: EconomyTuning, world: &WorldTuning) -> Self {
        Self {
            score: 0.0,
            shards: 0,
            multiplier: 1,
            meter: tuning.meter_start,
            world_speed: world.base_speed,
            tuning,
        }
    }

    /// Reset per-run totals, keeping the tuning.
    pub fn reset(&mut self, world: &WorldTuning) {
        *self = Self::new(self.tuning, world);
    }

    /// Final integer score shown to the player and submitted.
    pub fn final_score(&self) -> u64 {
        if self.score.is_finite() && self.score > 0.0 {
            self.score.floor() as u64
        } else {
            0
        }
    }

    /// Ramp scroll speed linearly over the ramp window, then hold.
    pub fn ramp_speed(&mut self, elapsed: f64, world: &WorldTuning) {
        let ramp = if world.speed_ramp_seconds > 0.0 {
            (elapsed / world.speed_ramp_seconds).clamp(0.0, 1.0)
        } else {
            1.0
        };
        self.world_speed = world.base_speed + world.speed_ramp_bonus * ramp;
    }

    /// Time-based score for a step of `dt` seconds.
    pub fn accrue_passive(&mut self, dt: f64) {
        self.score += dt * self.tuning.passive_rate * self.multiplier as f64;
    }

    /// Drain the meter. An emptied meter above x1 drops one level and
    /// restarts partially filled.
    pub fn decay_meter(&mut self, dt: f64, gliding: bool) -> Option<MultiplierChange> {
        let rate = if gliding {
            self.tuning.meter_glide_decay_rate
        } else {
            self.tuning.meter_decay_rate
        };
        self.meter = (self.meter - dt * rate).max(0.0);
        if self.meter <= self.tuning.meter_floor_epsilon && self.multiplier > 1 {
            self.multiplier -= 1;
            self.meter = self.tuning.meter_restart_value;
            return Some(MultiplierChange::Decreased {
                multiplier: self.multiplier,
            });
        }
        None
    }

    /// Credit `count` shards collected in one frame.
    ///
    /// The meter is filled first and every whole overflow raises the
    /// multiplier; the score bonus then uses the updated multiplier.
    pub fn collect(&mut self, count: u32) -> Option<PickupOutcome> {
        if count == 0 {
            return None;
        }
        self.shards += count;
        self.meter += count as f64 * self.tuning.meter_per_shard;
        let mut levels_gained = 0;
        while self.meter >= 1.0 {
            self.multiplier += 1;
            self.meter -= 1.0;
            levels_gained += 1;
        }
        let bonus = count as f64 * self.tuning.score_per_shard * self.multiplier as f64;
        self.score += bonus;
        Some(PickupOutcome {
            count,
            bonus,
            levels_gained,
        })
    }
}

impl Default for Economy {
    fn default() -> Self {
        Self::new(EconomyTuning::default(), &WorldTuning::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_economy_defaults() {
        let e = Economy::default();
        assert_eq!(e.score, 0.0);
        assert_eq!(e.multiplier, 1);
        assert!((e.meter - 0.2).abs() < f64::EPSILON);
        assert!((e.world_speed - WorldTuning::default().base_speed).abs() < f64::EPSILON);
    }

    #[test]
    fn test_passive_score_scales_with_multiplier() {
        let mut e = Economy::default();
        e.accrue_passive(1.0);
        assert!((e.score - 18.0).abs() < 1e-9);
        e.multiplier = 3;
        e.accrue_passive(0.5);
        assert!((e.score - 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_speed_ramp() {
        let mut e = Economy::default();
        let world = WorldTuning::default();
        e.ramp_speed(0.0, &world);
        assert!((e.world_speed - 260.0).abs() < 1e-9);
        e.ramp_speed(17.5, &world);
        assert!((e.world_speed - 330.0).abs() < 1e-9);
        e.ramp_speed(35.0, &world);
        assert!((e.world_speed - 400.0).abs() < 1e-9);
        e.ramp_speed(1000.0, &world);
        assert!((e.world_speed - 400.0).abs() < 1e-9);
    }

    #[test]
    fn test_collect_without_overflow() {
        let mut e = Economy::default();
        e.meter = 0.0;
        e.multiplier = 2;
        let outcome = e.collect(3).unwrap();
        assert_eq!(outcome.count, 3);
        assert_eq!(outcome.levels_gained, 0);
        assert!((outcome.bonus - 3.0 * 12.0 * 2.0).abs() < 1e-9);
        assert!((e.score - 72.0).abs() < 1e-9);
        assert!((e.meter - 0.66).abs() < 1e-9);
        assert_eq!(e.shards, 3);
    }

    #[test]
    fn test_collect_with_multiple_overflows() {
        let mut e = Economy::default();
        e.meter = 0.95;
        // 0.95 + 5 * 0.22 = 2.05 -> two overflows
        let outcome = e.collect(5).unwrap();
        assert_eq!(outcome.levels_gained, 2);
        assert_eq!(e.multiplier, 3);
        assert!(e.meter >= 0.0 && e.meter < 1.0);
        assert!((outcome.bonus - 5.0 * 12.0 * 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_collect_zero_is_noop() {
        let mut e = Economy::default();
        let before = e.clone();
        assert!(e.collect(0).is_none());
        assert_eq!(e, before);
    }

    #[test]
    fn test_meter_decay_rates() {
        let mut e = Economy::default();
        e.meter = 0.5;
        e.decay_meter(1.0, false);
        assert!((e.meter - 0.46).abs() < 1e-9);
        e.decay_meter(1.0, true);
        assert!((e.meter - 0.34).abs() < 1e-9);
    }

    #[test]
    fn test_meter_never_negative_and_multiplier_floor() {
        let mut e = Economy::default();
        for _ in 0..1000 {
            assert!(e.decay_meter(0.05, true).is_none());
            assert!(e.meter >= 0.0);
            assert_eq!(e.multiplier, 1);
        }
        assert_eq!(e.meter, 0.0);
    }

    #[test]
    fn test_empty_meter_drops_one_level() {
        let mut e = Economy::default();
        e.multiplier = 3;
        e.meter = 0.011;
        let change = e.decay_meter(0.05, false);
        assert_eq!(change, Some(MultiplierChange::Decreased { multiplier: 2 }));
        assert!((e.meter - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_final_score_floors() {
        let mut e = Economy::default();
        e.score = 599.99;
        assert_eq!(e.final_score(), 599);
        e.score = f64::NAN;
        assert_eq!(e.final_score(), 0);
    }

    #[test]
    fn test_reset_uses_base_speed() {
        let mut e = Economy::default();
        e.score = 1000.0;
        e.multiplier = 4;
        e.shards = 9;
        e.reset(&WorldTuning::default());
        assert_eq!(e.score, 0.0);
        assert_eq!(e.multiplier, 1);
        assert_eq!(e.shards, 0);
        assert!((e.meter - 0.2).abs() < f64::EPSILON);
        assert!((e.world_speed - 260.0).abs() < f64::EPSILON);
    }
}
