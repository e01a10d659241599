//! Celebration confetti. Purely cosmetic.

use crate::core::constants::{
    BEST_CONFETTI_COUNT, CONFETTI_GRAVITY, FALL_OUT_MARGIN, SUBMIT_CONFETTI_COUNT,
};
use crate::core::geometry::Viewport;
use rand::Rng;

/// RGB colour of a confetti square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfettiColor(pub u8, pub u8, pub u8);

const BEST_PALETTE: [ConfettiColor; 6] = [
    ConfettiColor(0xff, 0xff, 0xff),
    ConfettiColor(0xff, 0xdd, 0x55),
    ConfettiColor(0x6d, 0xe0, 0xff),
    ConfettiColor(0x8c, 0xff, 0x7a),
    ConfettiColor(0xff, 0x9a, 0x4d),
    ConfettiColor(0xff, 0x7a, 0xd9),
];

const SUBMIT_PALETTE: [ConfettiColor; 3] = [
    ConfettiColor(0xff, 0xdd, 0x55),
    ConfettiColor(0x6d, 0xe0, 0xff),
    ConfettiColor(0x4c, 0x6f, 0xff),
];

#[derive(Debug, Clone, PartialEq)]
pub struct ConfettiParticle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub size: f64,
    /// Seconds left before the particle disappears.
    pub life: f64,
    pub color: ConfettiColor,
}

fn between<R: Rng>(rng: &mut R, min: f64, max: f64) -> f64 {
    min + rng.gen::<f64>() * (max - min)
}

/// Burst for a new personal best: thrown upward across the screen.
pub fn burst_best<R: Rng>(viewport: &Viewport, rng: &mut R) -> Vec<ConfettiParticle> {
    let right = (viewport.width - 30.0).max(60.0);
    (0..BEST_CONFETTI_COUNT)
        .map(|_| ConfettiParticle {
            x: between(rng, 30.0, right),
            y: between(rng, -80.0, 20.0),
            vx: between(rng, -160.0, 160.0),
            vy: between(rng, -380.0, -40.0),
            size: between(rng, 5.0, 10.0),
            life: between(rng, 1.2, 2.4),
            color: BEST_PALETTE[rng.gen_range(0..BEST_PALETTE.len())],
        })
        .collect()
}

/// Burst after a leaderboard submission: falls from the top edge.
pub fn burst_submission<R: Rng>(viewport: &Viewport, rng: &mut R) -> Vec<ConfettiParticle> {
    (0..SUBMIT_CONFETTI_COUNT)
        .map(|_| ConfettiParticle {
            x: between(rng, 0.0, viewport.width),
            y: between(rng, -100.0, 40.0),
            vx: between(rng, -120.0, 120.0),
            vy: between(rng, -200.0, 80.0),
            size: between(rng, 6.0, 12.0),
            life: between(rng, 2.0, 3.0),
            color: SUBMIT_PALETTE[rng.gen_range(0..SUBMIT_PALETTE.len())],
        })
        .collect()
}

/// Advance particles and drop expired or off-screen ones.
pub fn update(particles: &mut Vec<ConfettiParticle>, dt: f64, viewport: &Viewport) {
    if particles.is_empty() {
        return;
    }
    for c in particles.iter_mut() {
        c.vy += CONFETTI_GRAVITY * dt;
        c.x += c.vx * dt;
        c.y += c.vy * dt;
        c.life -= dt;
    }
    let floor = viewport.height + FALL_OUT_MARGIN;
    particles.retain(|c| c.y <= floor && c.life > 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_burst_sizes() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let v = Viewport::default();
        assert_eq!(burst_best(&v, &mut rng).len(), BEST_CONFETTI_COUNT);
        assert_eq!(burst_submission(&v, &mut rng).len(), SUBMIT_CONFETTI_COUNT);
    }

    #[test]
    fn test_confetti_expires() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let v = Viewport::default();
        let mut particles = burst_best(&v, &mut rng);
        for _ in 0..200 {
            update(&mut particles, 0.05, &v);
        }
        assert!(particles.is_empty());
    }
}
