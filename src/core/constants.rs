// Frame timing
/// Largest step a single tick may integrate (seconds).
pub const MAX_FRAME_DT: f64 = 1.0 / 20.0;

// Player body
pub const PLAYER_WIDTH: f64 = 60.0;
pub const PLAYER_HEIGHT: f64 = 60.0;
pub const PLAYER_X_RATIO: f64 = 0.25;
pub const PLAYER_SPAWN_Y_RATIO: f64 = 0.45;

// Physics
pub const GRAVITY: f64 = 1600.0;
pub const GLIDE_GRAVITY: f64 = 520.0;
pub const MAX_GLIDE_FALL_SPEED: f64 = 260.0;
pub const MAX_JUMPS: u32 = 2;
pub const MIN_JUMP_IMPULSE: f64 = 460.0;
pub const MAX_JUMP_IMPULSE: f64 = 760.0;
/// Hold duration that yields a full-strength jump (seconds).
pub const FULL_JUMP_HOLD_SECONDS: f64 = 0.55;
/// Height of the landing strip along a ledge's visible top edge.
pub const SURFACE_COLLISION_HEIGHT: f64 = 1.0;
/// Distance below the viewport bottom at which a falling player is lost.
pub const FALL_OUT_MARGIN: f64 = 80.0;

// World scroll
pub const BASE_WORLD_SPEED: f64 = 260.0;
pub const WORLD_SPEED_RAMP_BONUS: f64 = 140.0;
pub const WORLD_SPEED_RAMP_SECONDS: f64 = 35.0;
pub const LOOKAHEAD_SECONDS: f64 = 2.2;
/// Entities whose right edge is left of this x are discarded.
pub const CULL_X: f64 = -120.0;

// Generation
pub const DIFFICULTY_RAMP_SECONDS: f64 = 55.0;
pub const PLATFORM_MIN_WIDTH: f64 = 150.0;
pub const PLATFORM_MAX_WIDTH: f64 = 320.0;
pub const GAP_MIN_BASE: f64 = 70.0;
pub const GAP_MIN_RAMP: f64 = 60.0;
pub const GAP_MAX_BASE: f64 = 150.0;
pub const GAP_MAX_RAMP: f64 = 110.0;
pub const PLATFORM_BASE_Y_RATIO: f64 = 0.68;
pub const PLATFORM_Y_VARIANCE: f64 = 110.0;
pub const PLATFORM_MIN_Y: f64 = 90.0;
pub const PLATFORM_BOTTOM_MARGIN: f64 = 70.0;
pub const PATTERN_COUNT: u8 = 4;
pub const PATTERN_RAISED_OFFSET: f64 = -70.0;
pub const PATTERN_LOWERED_OFFSET: f64 = 10.0;
pub const MOVING_CHANCE_BASE: f64 = 0.22;
pub const MOVING_CHANCE_RAMP: f64 = 0.18;
pub const MOVING_AMPLITUDE_MIN: f64 = 18.0;
pub const MOVING_AMPLITUDE_MAX: f64 = 44.0;
pub const MOVING_SPEED_MIN: f64 = 1.2;
pub const MOVING_SPEED_MAX: f64 = 2.2;
pub const DOUBLE_LEDGE_CHANCE: f64 = 0.5;

pub const SHARD_CHANCE: f64 = 0.70;
pub const SHARD_MAX_PER_PLATFORM: u32 = 3;
pub const SHARD_SIZE: f64 = 18.0;
pub const SHARD_LIFT: f64 = 42.0;
pub const SHARD_SPACING_START: f64 = 0.25;
pub const SHARD_SPACING_STEP: f64 = 0.22;

pub const HAZARD_CHANCE_BASE: f64 = 0.18;
pub const HAZARD_CHANCE_RAMP: f64 = 0.22;
pub const GROUND_HAZARD_SIZE: f64 = 26.0;
pub const GROUND_HAZARD_INSET: f64 = 10.0;
pub const CEILING_HAZARD_SIZE: f64 = 32.0;
pub const CEILING_HAZARD_PATTERN: u8 = 2;
pub const CEILING_HAZARD_MIN_DIFFICULTY: f64 = 0.2;
pub const CEILING_HAZARD_LIFT: f64 = 140.0;
/// Ceiling hazards whose top would sit at or above this y are not placed.
pub const CEILING_HAZARD_MIN_Y: f64 = 70.0;
pub const CEILING_HAZARD_X_RATIO: f64 = 0.45;

// Start platform
pub const START_PLATFORM_Y_RATIO: f64 = 0.65;
pub const START_PLATFORM_LEAD: f64 = 80.0;
pub const START_PLATFORM_WIDTH: f64 = 340.0;

// Ledge sprites
pub const LEDGE_FIT_HEIGHT: f64 = 22.0;
pub const TALL_LEDGE_FIT_MULTIPLIER: f64 = 3.0;

// Economy
pub const PASSIVE_SCORE_RATE: f64 = 18.0;
pub const SCORE_PER_SHARD: f64 = 12.0;
pub const METER_START: f64 = 0.2;
pub const METER_PER_SHARD: f64 = 0.22;
pub const METER_DECAY_RATE: f64 = 0.04;
pub const METER_GLIDE_DECAY_RATE: f64 = 0.12;
pub const METER_FLOOR_EPSILON: f64 = 0.01;
pub const METER_RESTART_VALUE: f64 = 0.25;

// Confetti
pub const CONFETTI_GRAVITY: f64 = 900.0;
pub const BEST_CONFETTI_COUNT: usize = 110;
pub const SUBMIT_CONFETTI_COUNT: usize = 90;

// Leaderboard
pub const LEADERBOARD_SIZE: usize = 10;
pub const MIN_LEADERBOARD_SCORE: u64 = 500;
pub const SUBMIT_COOLDOWN_MS: u64 = 3000;
pub const MAX_NAME_LEN: usize = 15;
pub const DEFAULT_PLAYER_NAME: &str = "Player";

// Default viewport (world units) for frontends without a pixel canvas
pub const DEFAULT_VIEWPORT_WIDTH: f64 = 960.0;
pub const DEFAULT_VIEWPORT_HEIGHT: f64 = 540.0;
