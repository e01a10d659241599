//! The run state machine and the per-frame tick.
//!
//! [`RunState`] owns the player, the world and the economy. Nothing else
//! mutates them; the frame driver calls [`RunState::tick`] once per frame
//! with the raw frame delta and an RNG.

use super::confetti::{self, ConfettiParticle};
use super::types::{EndCause, RunPhase, TickEvent};
use crate::core::clock::clamp_dt;
use crate::core::config::Tuning;
use crate::core::constants::{FALL_OUT_MARGIN, PLAYER_SPAWN_Y_RATIO, PLAYER_X_RATIO};
use crate::core::geometry::Viewport;
use crate::physics::{self, Player};
use crate::scoring::{Economy, MultiplierChange};
use crate::world::{self, GenContext, World};
use rand::Rng;

#[derive(Debug, Clone)]
pub struct RunState {
    pub phase: RunPhase,
    /// Increments on every reset. Async replies tagged with an older id are stale.
    pub run_id: u64,
    pub viewport: Viewport,
    pub tuning: Tuning,
    pub player: Player,
    pub world: World,
    pub economy: Economy,
    /// Seconds of simulated play in this run.
    pub elapsed: f64,
    /// Drives the run-cycle sprite.
    pub animation_time: f64,
    /// True while the single input is held.
    pub gliding: bool,
    /// Best final score across runs.
    pub best_local: u64,
    /// Set when the run ends.
    pub final_score: Option<u64>,
    pub confetti: Vec<ConfettiParticle>,
}

impl RunState {
    /// Create an idle run with a seeded world.
    pub fn new<R: Rng>(viewport: Viewport, tuning: Tuning, best_local: u64, rng: &mut R) -> Self {
        let mut state = Self {
            phase: RunPhase::Idle,
            run_id: 0,
            viewport,
            tuning,
            player: Player::new(viewport.width * PLAYER_X_RATIO, 0.0),
            world: World::default(),
            economy: Economy::new(tuning.economy, &tuning.world),
            elapsed: 0.0,
            animation_time: 0.0,
            gliding: false,
            best_local,
            final_score: None,
            confetti: Vec::new(),
        };
        state.reset(rng);
        state
    }

    pub fn is_running(&self) -> bool {
        self.phase == RunPhase::Running
    }

    fn gen_context(&self) -> GenContext {
        GenContext {
            viewport: self.viewport,
            elapsed: self.elapsed,
            tuning: self.tuning.world,
        }
    }

    /// Clear all per-run state and reseed the world with a single start
    /// platform under the player. Leaves the phase at `Idle`.
    pub fn reset<R: Rng>(&mut self, rng: &mut R) {
        self.run_id += 1;
        self.phase = RunPhase::Idle;
        self.economy.reset(&self.tuning.world);
        self.elapsed = 0.0;
        self.animation_time = 0.0;
        self.gliding = false;
        self.final_score = None;
        self.confetti.clear();
        self.reset_world(rng);
    }

    fn reset_world<R: Rng>(&mut self, rng: &mut R) {
        let x = self.viewport.width * PLAYER_X_RATIO;
        self.player = Player::new(x, self.viewport.height * PLAYER_SPAWN_Y_RATIO);

        self.world.clear();
        let start = world::start_platform(x, &self.viewport, rng);
        self.world.platforms.push(start);
        let ctx = self.gen_context();
        world::ensure_content(&mut self.world, &ctx, self.economy.world_speed, rng);
    }

    /// Idle -> Running. Returns false from any other phase.
    pub fn start(&mut self) -> bool {
        if self.phase != RunPhase::Idle {
            return false;
        }
        self.phase = RunPhase::Running;
        log::info!("run {} started", self.run_id);
        true
    }

    /// Fully reset and start a new run, from any phase.
    pub fn restart<R: Rng>(&mut self, rng: &mut R) {
        self.reset(rng);
        self.start();
    }

    /// Change the visible area. Takes effect for the player pin and
    /// generation from the next frame.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn set_gliding(&mut self, gliding: bool) {
        self.gliding = gliding;
    }

    /// Jump with `strength` in [0, 1]. No-op unless running with jump budget left.
    pub fn jump(&mut self, strength: f64) -> bool {
        if !self.is_running() {
            return false;
        }
        self.player.jump(strength, &self.tuning.physics)
    }

    /// Advance one frame. `raw_dt` is clamped to `[0, 1/20]` s.
    pub fn tick<R: Rng>(&mut self, raw_dt: f64, rng: &mut R) -> Vec<TickEvent> {
        let mut events = Vec::new();
        if !self.is_running() {
            return events;
        }
        let dt = clamp_dt(raw_dt);

        self.elapsed += dt;
        self.animation_time += dt;

        // Economy
        self.economy.ramp_speed(self.elapsed, &self.tuning.world);
        self.economy.accrue_passive(dt);
        if let Some(change) = self.economy.decay_meter(dt, self.gliding) {
            events.push(TickEvent::Multiplier(change));
        }

        // Player motion
        self.player.integrate(dt, self.gliding, &self.tuning.physics);

        // World scroll and generation
        physics::scroll_world(&mut self.world, self.economy.world_speed * dt);
        let ctx = self.gen_context();
        world::ensure_content(&mut self.world, &ctx, self.economy.world_speed, rng);
        self.player.x = self.viewport.width * PLAYER_X_RATIO;
        physics::update_moving_platforms(&mut self.world.platforms, self.elapsed);

        // Collisions
        physics::resolve_landing(&mut self.player, &self.world.platforms);

        let collected = physics::collect_shards(&self.player, &mut self.world.shards);
        if let Some(outcome) = self.economy.collect(collected) {
            events.push(TickEvent::ShardsCollected {
                count: outcome.count,
                bonus: outcome.bonus,
            });
            if outcome.levels_gained > 0 {
                events.push(TickEvent::Multiplier(MultiplierChange::Increased {
                    multiplier: self.economy.multiplier,
                }));
            }
        }

        if physics::hits_hazard(&self.player, &self.world.hazards) {
            events.push(self.end_run(EndCause::Hazard, rng));
            return events;
        }

        if self.player.y > self.viewport.height + FALL_OUT_MARGIN {
            events.push(self.end_run(EndCause::Fell, rng));
        }

        events
    }

    /// Running -> GameOver. Records the final score and updates the local best.
    fn end_run<R: Rng>(&mut self, cause: EndCause, rng: &mut R) -> TickEvent {
        self.phase = RunPhase::GameOver;
        self.gliding = false;
        let final_score = self.economy.final_score();
        self.final_score = Some(final_score);

        let new_best = final_score > self.best_local;
        if new_best {
            self.best_local = final_score;
            self.confetti = confetti::burst_best(&self.viewport, rng);
        }
        log::info!(
            "run {} ended ({:?}) with score {} (best {})",
            self.run_id,
            cause,
            final_score,
            self.best_local
        );
        TickEvent::RunEnded {
            cause,
            final_score,
            new_best,
        }
    }

    /// Advance confetti. Runs in every phase so the game-over burst animates.
    pub fn update_cosmetics(&mut self, raw_dt: f64) {
        confetti::update(&mut self.confetti, clamp_dt(raw_dt), &self.viewport);
    }

    /// Launch the post-submission confetti burst.
    pub fn celebrate_submission<R: Rng>(&mut self, rng: &mut R) {
        self.confetti = confetti::burst_submission(&self.viewport, rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::{PLAYER_HEIGHT, PLAYER_WIDTH};
    use crate::world::{Hazard, LedgeStyle, Platform};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const DT: f64 = 1.0 / 60.0;

    fn create_test_rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    fn started_run(rng: &mut ChaCha8Rng) -> RunState {
        let mut run = RunState::new(Viewport::new(960.0, 540.0), Tuning::default(), 0, rng);
        assert!(run.start());
        run
    }

    /// A running state with no content except what the test adds. The
    /// lookahead is zeroed and a far platform pushes the right edge past the
    /// target so generation never fires.
    fn empty_world_run(rng: &mut ChaCha8Rng) -> RunState {
        let mut run = started_run(rng);
        run.world.clear();
        run.tuning.world.lookahead_seconds = 0.0;
        run.world
            .platforms
            .push(Platform::fixed(5000.0, 2000.0, 200.0, LedgeStyle::Ledge3, false));
        run
    }

    #[test]
    fn test_new_run_is_idle_and_seeded() {
        let mut rng = create_test_rng();
        let run = RunState::new(Viewport::new(960.0, 540.0), Tuning::default(), 0, &mut rng);
        assert_eq!(run.phase, RunPhase::Idle);
        assert_eq!(run.run_id, 1);
        assert!(run.world.platforms.len() > 1);
        let start = &run.world.platforms[0];
        assert!(start.surface().spans_x(run.player.feet_x()));
        assert!(run.world.right_edge() >= 960.0 + 260.0 * 2.2);
    }

    #[test]
    fn test_tick_ignored_when_idle() {
        let mut rng = create_test_rng();
        let mut run = RunState::new(Viewport::default(), Tuning::default(), 0, &mut rng);
        let y = run.player.y;
        assert!(run.tick(DT, &mut rng).is_empty());
        assert_eq!(run.player.y, y);
        assert_eq!(run.elapsed, 0.0);
    }

    #[test]
    fn test_start_only_from_idle() {
        let mut rng = create_test_rng();
        let mut run = started_run(&mut rng);
        assert!(!run.start());
        run.phase = RunPhase::GameOver;
        assert!(!run.start());
    }

    #[test]
    fn test_falls_under_gravity_in_empty_world() {
        let mut rng = create_test_rng();
        let mut run = empty_world_run(&mut rng);
        let mut last_y = run.player.y;
        for _ in 0..10 {
            run.tick(DT, &mut rng);
            assert!(run.player.y > last_y);
            assert!(!run.player.on_ground);
            last_y = run.player.y;
        }
        assert_eq!(run.phase, RunPhase::Running);
    }

    #[test]
    fn test_player_lands_on_start_platform() {
        let mut rng = create_test_rng();
        let mut run = started_run(&mut rng);
        for _ in 0..120 {
            run.tick(DT, &mut rng);
            if run.player.on_ground {
                break;
            }
        }
        assert!(run.player.on_ground);
        assert_eq!(run.player.jump_count, 0);
        assert!((run.player.bottom() - 540.0 * 0.65).abs() < 1e-6);
    }

    #[test]
    fn test_resting_player_is_stable() {
        let mut rng = create_test_rng();
        let mut run = empty_world_run(&mut rng);
        run.world
            .platforms
            .insert(0, Platform::fixed(180.0, 500.0, 300.0, LedgeStyle::Ledge2, false));
        run.player.y = 500.0 - PLAYER_HEIGHT;
        run.player.vy = 0.0;
        for _ in 0..30 {
            run.tick(DT, &mut rng);
            assert!((run.player.y - (500.0 - PLAYER_HEIGHT)).abs() < 1e-9);
            assert_eq!(run.player.vy, 0.0);
            assert!(run.player.on_ground);
        }
    }

    #[test]
    fn test_hazard_overlap_ends_run() {
        let mut rng = create_test_rng();
        let mut run = empty_world_run(&mut rng);
        // Slightly more than one frame of scroll, so it overlaps afterwards.
        let speed_guess = 300.0 * DT;
        run.world.hazards.push(Hazard {
            x: run.player.x + PLAYER_WIDTH - 1.0 + speed_guess,
            y: run.player.y + 10.0,
            size: 26.0,
        });
        let events = run.tick(DT, &mut rng);
        assert_eq!(run.phase, RunPhase::GameOver);
        assert!(matches!(
            events.last(),
            Some(TickEvent::RunEnded { cause: EndCause::Hazard, .. })
        ));
        // Frozen afterwards.
        let y = run.player.y;
        assert!(run.tick(DT, &mut rng).is_empty());
        assert_eq!(run.player.y, y);
    }

    #[test]
    fn test_falling_out_ends_run() {
        let mut rng = create_test_rng();
        let mut run = empty_world_run(&mut rng);
        run.player.y = 540.0 + 79.0;
        run.player.vy = 100.0;
        let events = run.tick(DT, &mut rng);
        assert!(matches!(
            events.as_slice(),
            [TickEvent::RunEnded { cause: EndCause::Fell, .. }]
        ));
    }

    #[test]
    fn test_new_best_recorded() {
        let mut rng = create_test_rng();
        let mut run = empty_world_run(&mut rng);
        run.best_local = 100;
        run.economy.score = 250.7;
        run.player.y = 2000.0;
        let events = run.tick(DT, &mut rng);
        match &events[..] {
            [TickEvent::RunEnded { final_score, new_best, .. }] => {
                assert!(*new_best);
                assert!(*final_score >= 250);
            }
            other => panic!("unexpected events {other:?}"),
        }
        assert_eq!(Some(run.best_local), run.final_score);
        assert!(!run.confetti.is_empty());
    }

    #[test]
    fn test_jump_rejected_when_not_running() {
        let mut rng = create_test_rng();
        let mut run = RunState::new(Viewport::default(), Tuning::default(), 0, &mut rng);
        assert!(!run.jump(1.0));
        assert_eq!(run.player.jump_count, 0);
        assert_eq!(run.player.vy, 0.0);
    }

    #[test]
    fn test_jump_budget_in_run() {
        let mut rng = create_test_rng();
        let mut run = empty_world_run(&mut rng);
        assert!(run.jump(0.5));
        assert!(run.jump(0.5));
        let vy = run.player.vy;
        assert!(!run.jump(1.0));
        assert_eq!(run.player.vy, vy);
        assert_eq!(run.player.jump_count, 2);
    }

    #[test]
    fn test_shard_pickup_scores_and_emits_event() {
        let mut rng = create_test_rng();
        let mut run = empty_world_run(&mut rng);
        run.economy.meter = 0.0;
        run.world.shards.push(crate::world::Shard {
            x: run.player.x + 30.0,
            y: run.player.y + 20.0,
            size: 18.0,
            bolt: crate::world::BoltStyle::Bolt2,
        });
        let events = run.tick(DT, &mut rng);
        assert!(events.contains(&TickEvent::ShardsCollected { count: 1, bonus: 12.0 }));
        assert_eq!(run.economy.shards, 1);
        assert!(run.world.shards.is_empty());
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut rng = create_test_rng();
        let mut run = started_run(&mut rng);
        for _ in 0..30 {
            run.tick(DT, &mut rng);
        }
        run.economy.multiplier = 5;
        run.player.jump_count = 2;
        run.phase = RunPhase::GameOver;
        let old_id = run.run_id;

        run.restart(&mut rng);

        assert_eq!(run.phase, RunPhase::Running);
        assert_eq!(run.run_id, old_id + 1);
        assert_eq!(run.economy.score, 0.0);
        assert_eq!(run.economy.multiplier, 1);
        assert_eq!(run.economy.shards, 0);
        assert_eq!(run.elapsed, 0.0);
        assert_eq!(run.player.jump_count, 0);
        assert!(run.final_score.is_none());
        assert!(run.world.platforms[0].surface().spans_x(run.player.feet_x()));
    }

    #[test]
    fn test_large_dt_is_clamped() {
        let mut rng = create_test_rng();
        let mut run = empty_world_run(&mut rng);
        run.tick(10.0, &mut rng);
        assert!((run.elapsed - 0.05).abs() < 1e-12);
        run.tick(-1.0, &mut rng);
        assert!((run.elapsed - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_multiplier_never_below_one() {
        let mut rng = create_test_rng();
        let mut run = empty_world_run(&mut rng);
        run.gliding = true;
        for _ in 0..200 {
            run.player.y = 0.0;
            run.player.vy = 0.0;
            run.tick(DT, &mut rng);
            assert!(run.economy.multiplier >= 1);
            assert!(run.economy.meter >= 0.0);
        }
    }
}
