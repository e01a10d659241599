//! Procedural chunk generation.
//!
//! Content is generated one chunk (platform + pickups + hazards) at a time,
//! always starting at the current right edge of the world, until the world
//! reaches the lookahead distance past the visible right edge.

use super::types::{BoltStyle, Chunk, Hazard, LedgeStyle, Platform, Shard, World};
use crate::core::config::WorldTuning;
use crate::core::constants::*;
use crate::core::geometry::Viewport;
use rand::Rng;

/// Uniform sample in `[min, max)`. Degenerate ranges return `min`.
fn between<R: Rng>(rng: &mut R, min: f64, max: f64) -> f64 {
    min + rng.gen::<f64>() * (max - min)
}

/// Inputs that shape a chunk besides the RNG.
#[derive(Debug, Clone, Copy)]
pub struct GenContext {
    pub viewport: Viewport,
    /// Seconds into the current run.
    pub elapsed: f64,
    pub tuning: WorldTuning,
}

impl GenContext {
    /// 0 at the start of a run, 1 once the ramp window has passed.
    pub fn difficulty(&self) -> f64 {
        if self.tuning.difficulty_ramp_seconds <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.tuning.difficulty_ramp_seconds).clamp(0.0, 1.0)
    }
}

/// Generate one chunk whose gap begins at `start_x`.
pub fn generate_chunk<R: Rng>(start_x: f64, ctx: &GenContext, rng: &mut R) -> Chunk {
    let difficulty = ctx.difficulty();
    let height = ctx.viewport.height;

    let gap_min = GAP_MIN_BASE + GAP_MIN_RAMP * difficulty;
    let gap_max = GAP_MAX_BASE + GAP_MAX_RAMP * difficulty;

    let pattern = rng.gen_range(0..PATTERN_COUNT);
    let width = between(rng, PLATFORM_MIN_WIDTH, PLATFORM_MAX_WIDTH);
    let gap = between(rng, gap_min, gap_max);

    let base_line = height * PLATFORM_BASE_Y_RATIO;
    let mut y = base_line + between(rng, -PLATFORM_Y_VARIANCE, PLATFORM_Y_VARIANCE);
    y = y.min(height - PLATFORM_BOTTOM_MARGIN).max(PLATFORM_MIN_Y);
    match pattern {
        3 => y += PATTERN_RAISED_OFFSET,
        0 => y += PATTERN_LOWERED_OFFSET,
        _ => {}
    }

    let moving_chance = MOVING_CHANCE_BASE + MOVING_CHANCE_RAMP * difficulty;
    let is_moving = rng.gen::<f64>() < moving_chance;

    let ledge = LedgeStyle::random(rng);
    let double = ledge == LedgeStyle::Ledge4 && rng.gen::<f64>() < DOUBLE_LEDGE_CHANCE;
    let mut platform = Platform::fixed(start_x + gap, y, width, ledge, double);
    if is_moving {
        platform.amplitude = between(rng, MOVING_AMPLITUDE_MIN, MOVING_AMPLITUDE_MAX);
        platform.speed = between(rng, MOVING_SPEED_MIN, MOVING_SPEED_MAX);
        platform.phase = between(rng, 0.0, std::f64::consts::TAU);
    }

    let mut shards = Vec::new();
    if rng.gen::<f64>() < SHARD_CHANCE {
        let count = rng.gen_range(1..=SHARD_MAX_PER_PLATFORM);
        for i in 0..count {
            shards.push(Shard {
                x: platform.x
                    + platform.width * (SHARD_SPACING_START + SHARD_SPACING_STEP * i as f64),
                y: platform.y - SHARD_LIFT,
                size: SHARD_SIZE,
                bolt: BoltStyle::random(rng),
            });
        }
    }

    let mut hazards = Vec::new();
    let hazard_chance = HAZARD_CHANCE_BASE + HAZARD_CHANCE_RAMP * difficulty;
    if rng.gen::<f64>() < hazard_chance {
        let x = if rng.gen::<bool>() {
            platform.x + GROUND_HAZARD_INSET
        } else {
            platform.right() - GROUND_HAZARD_SIZE - GROUND_HAZARD_INSET
        };
        hazards.push(Hazard {
            x,
            y: platform.y - GROUND_HAZARD_SIZE,
            size: GROUND_HAZARD_SIZE,
        });
    }

    if pattern == CEILING_HAZARD_PATTERN && difficulty > CEILING_HAZARD_MIN_DIFFICULTY {
        if let Some(hazard) = ceiling_hazard(&platform) {
            hazards.push(hazard);
        }
    }

    let next_x = platform.right();
    Chunk {
        platform,
        hazards,
        shards,
        next_x,
    }
}

/// Overhead hazard for a platform, or `None` when it would sit too high.
pub fn ceiling_hazard(platform: &Platform) -> Option<Hazard> {
    let y = platform.y - CEILING_HAZARD_LIFT;
    if y <= CEILING_HAZARD_MIN_Y {
        return None;
    }
    Some(Hazard {
        x: platform.x + platform.width * CEILING_HAZARD_X_RATIO - CEILING_HAZARD_SIZE / 2.0,
        y,
        size: CEILING_HAZARD_SIZE,
    })
}

/// Right edge the world must reach for the current scroll speed.
pub fn target_edge(viewport: &Viewport, world_speed: f64, lookahead_seconds: f64) -> f64 {
    viewport.width + world_speed * lookahead_seconds
}

/// Append chunks until the world extends past the lookahead target.
///
/// Returns the number of chunks generated. Existing entities are never touched.
pub fn ensure_content<R: Rng>(
    world: &mut World,
    ctx: &GenContext,
    world_speed: f64,
    rng: &mut R,
) -> usize {
    let target = target_edge(&ctx.viewport, world_speed, ctx.tuning.lookahead_seconds);
    let mut cursor = world.right_edge();
    let mut generated = 0;
    while cursor < target {
        let chunk = generate_chunk(cursor, ctx, rng);
        cursor = chunk.next_x;
        world.push_chunk(chunk);
        generated += 1;
    }
    if generated > 0 {
        log::debug!(
            "generated {} chunk(s), right edge now {:.0} (target {:.0})",
            generated,
            cursor,
            target
        );
    }
    generated
}

/// The platform a fresh run starts on, placed under the player.
pub fn start_platform<R: Rng>(player_x: f64, viewport: &Viewport, rng: &mut R) -> Platform {
    let ledge = LedgeStyle::random(rng);
    let double = ledge == LedgeStyle::Ledge4 && rng.gen::<f64>() < DOUBLE_LEDGE_CHANCE;
    Platform::fixed(
        player_x - START_PLATFORM_LEAD,
        viewport.height * START_PLATFORM_Y_RATIO,
        START_PLATFORM_WIDTH,
        ledge,
        double,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn create_test_rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(12345)
    }

    fn ctx(elapsed: f64) -> GenContext {
        GenContext {
            viewport: Viewport::new(960.0, 540.0),
            elapsed,
            tuning: WorldTuning::default(),
        }
    }

    #[test]
    fn test_difficulty_ramps_and_caps() {
        assert_eq!(ctx(0.0).difficulty(), 0.0);
        assert!((ctx(27.5).difficulty() - 0.5).abs() < 1e-9);
        assert_eq!(ctx(55.0).difficulty(), 1.0);
        assert_eq!(ctx(500.0).difficulty(), 1.0);
    }

    #[test]
    fn test_chunk_dimensions_within_bounds() {
        let mut rng = create_test_rng();
        for elapsed in [0.0, 20.0, 60.0] {
            let c = ctx(elapsed);
            let d = c.difficulty();
            for _ in 0..200 {
                let chunk = generate_chunk(1000.0, &c, &mut rng);
                let p = &chunk.platform;
                assert!(p.width >= PLATFORM_MIN_WIDTH && p.width <= PLATFORM_MAX_WIDTH);
                let gap = p.x - 1000.0;
                assert!(gap >= GAP_MIN_BASE + GAP_MIN_RAMP * d - 1e-9);
                assert!(gap <= GAP_MAX_BASE + GAP_MAX_RAMP * d + 1e-9);
                assert!((chunk.next_x - p.right()).abs() < 1e-9);
                assert!(chunk.next_x > 1000.0);
                assert!(p.y >= PLATFORM_MIN_Y + PATTERN_RAISED_OFFSET - 1e-9);
                assert!(p.y <= 540.0 - PLATFORM_BOTTOM_MARGIN + PATTERN_LOWERED_OFFSET + 1e-9);
                assert!(chunk.shards.len() <= 3);
                assert!(chunk.hazards.len() <= 2);
            }
        }
    }

    #[test]
    fn test_shards_sit_above_platform() {
        let mut rng = create_test_rng();
        let c = ctx(0.0);
        for _ in 0..200 {
            let chunk = generate_chunk(0.0, &c, &mut rng);
            for (i, s) in chunk.shards.iter().enumerate() {
                let expected_x =
                    chunk.platform.x + chunk.platform.width * (0.25 + 0.22 * i as f64);
                assert!((s.x - expected_x).abs() < 1e-9);
                assert!((s.y - (chunk.platform.y - SHARD_LIFT)).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_ground_hazard_rests_on_surface_at_an_edge() {
        let mut rng = create_test_rng();
        let c = ctx(60.0);
        let mut seen = 0;
        for _ in 0..300 {
            let chunk = generate_chunk(0.0, &c, &mut rng);
            let p = &chunk.platform;
            for h in chunk.hazards.iter().filter(|h| h.size == GROUND_HAZARD_SIZE) {
                seen += 1;
                assert!((h.y + h.size - p.y).abs() < 1e-9);
                let left = (h.x - (p.x + GROUND_HAZARD_INSET)).abs() < 1e-9;
                let right_x = p.right() - GROUND_HAZARD_SIZE - GROUND_HAZARD_INSET;
                let right = (h.x - right_x).abs() < 1e-9;
                assert!(left || right);
            }
        }
        assert!(seen > 0, "hazards should appear at full difficulty");
    }

    #[test]
    fn test_no_ceiling_hazards_early() {
        let mut rng = create_test_rng();
        let c = ctx(0.0);
        for _ in 0..300 {
            let chunk = generate_chunk(0.0, &c, &mut rng);
            assert!(chunk.hazards.iter().all(|h| h.size != CEILING_HAZARD_SIZE));
        }
    }

    #[test]
    fn test_ceiling_hazard_omitted_when_too_high() {
        let high = Platform::fixed(0.0, 200.0, 200.0, LedgeStyle::Ledge3, false);
        assert!(ceiling_hazard(&high).is_none());

        let low = Platform::fixed(0.0, 400.0, 200.0, LedgeStyle::Ledge3, false);
        let hazard = ceiling_hazard(&low).unwrap();
        assert!((hazard.y - 260.0).abs() < 1e-9);
        assert!((hazard.x - (90.0 - 16.0)).abs() < 1e-9);
    }

    #[test]
    fn test_ceiling_hazards_appear_past_threshold() {
        let mut rng = create_test_rng();
        let c = ctx(60.0);
        let mut seen = 0;
        for _ in 0..400 {
            let chunk = generate_chunk(0.0, &c, &mut rng);
            let p = &chunk.platform;
            for h in chunk.hazards.iter().filter(|h| h.size == CEILING_HAZARD_SIZE) {
                seen += 1;
                assert!((h.y - (p.y - CEILING_HAZARD_LIFT)).abs() < 1e-9);
                let centre = h.x + h.size / 2.0;
                assert!((centre - (p.x + p.width * CEILING_HAZARD_X_RATIO)).abs() < 1e-9);
                assert!(h.y > CEILING_HAZARD_MIN_Y);
            }
        }
        assert!(seen > 0, "ceiling hazards should appear past the difficulty threshold");
    }

    #[test]
    fn test_moving_platform_parameters() {
        let mut rng = create_test_rng();
        let c = ctx(60.0);
        let mut moving = 0;
        for _ in 0..300 {
            let p = generate_chunk(0.0, &c, &mut rng).platform;
            if p.is_moving() {
                moving += 1;
                assert!(p.amplitude >= MOVING_AMPLITUDE_MIN && p.amplitude <= MOVING_AMPLITUDE_MAX);
                assert!(p.speed >= MOVING_SPEED_MIN && p.speed <= MOVING_SPEED_MAX);
                assert!(p.phase >= 0.0 && p.phase <= std::f64::consts::TAU);
            } else {
                assert_eq!(p.amplitude, 0.0);
            }
            assert!((p.base_y - p.y).abs() < 1e-9);
        }
        assert!(moving > 0);
    }

    #[test]
    fn test_ensure_content_reaches_target() {
        let mut rng = create_test_rng();
        let mut world = World::default();
        let c = ctx(0.0);
        let generated = ensure_content(&mut world, &c, 260.0, &mut rng);
        assert!(generated > 0);
        assert!(world.right_edge() >= target_edge(&c.viewport, 260.0, 2.2));
    }

    #[test]
    fn test_ensure_content_is_incremental() {
        let mut rng = create_test_rng();
        let mut world = World::default();
        let c = ctx(0.0);
        ensure_content(&mut world, &c, 260.0, &mut rng);
        let before = world.platforms.clone();

        // Already satisfied: nothing new.
        assert_eq!(ensure_content(&mut world, &c, 260.0, &mut rng), 0);
        assert_eq!(world.platforms, before);

        // Faster scroll needs more content; the existing prefix is untouched.
        ensure_content(&mut world, &c, 400.0, &mut rng);
        assert!(world.platforms.len() > before.len());
        assert_eq!(&world.platforms[..before.len()], &before[..]);
    }

    #[test]
    fn test_generation_is_deterministic_for_seed() {
        let c = ctx(30.0);
        let mut a = World::default();
        let mut b = World::default();
        ensure_content(&mut a, &c, 300.0, &mut ChaCha8Rng::seed_from_u64(7));
        ensure_content(&mut b, &c, 300.0, &mut ChaCha8Rng::seed_from_u64(7));
        assert_eq!(a.platforms, b.platforms);
        assert_eq!(a.hazards, b.hazards);
        assert_eq!(a.shards, b.shards);
    }

    #[test]
    fn test_start_platform_under_player() {
        let mut rng = create_test_rng();
        let viewport = Viewport::new(960.0, 540.0);
        let p = start_platform(240.0, &viewport, &mut rng);
        assert!((p.x - 160.0).abs() < 1e-9);
        assert!((p.y - 351.0).abs() < 1e-9);
        assert!(p.surface().spans_x(240.0 + PLAYER_WIDTH / 2.0));
        assert!(!p.is_moving());
    }
}
