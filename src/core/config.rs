//! Game configuration loaded from `~/.onebutton/config.json`.
//!
//! Every field has a default so a missing or partial file still yields a
//! playable configuration. Leaderboard credentials may also come from the
//! environment, which takes precedence over the file.

use super::constants::*;
use crate::utils::persistence;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "config.json";
pub const ENV_FIRESTORE_PROJECT: &str = "ONEBUTTON_FIRESTORE_PROJECT";
pub const ENV_FIRESTORE_API_KEY: &str = "ONEBUTTON_FIRESTORE_API_KEY";

/// Player motion parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    pub gravity: f64,
    pub glide_gravity: f64,
    pub max_glide_fall_speed: f64,
    pub max_jumps: u32,
    pub min_jump_impulse: f64,
    pub max_jump_impulse: f64,
    pub full_jump_hold_seconds: f64,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            glide_gravity: GLIDE_GRAVITY,
            max_glide_fall_speed: MAX_GLIDE_FALL_SPEED,
            max_jumps: MAX_JUMPS,
            min_jump_impulse: MIN_JUMP_IMPULSE,
            max_jump_impulse: MAX_JUMP_IMPULSE,
            full_jump_hold_seconds: FULL_JUMP_HOLD_SECONDS,
        }
    }
}

/// World scroll and generation pacing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldTuning {
    pub base_speed: f64,
    pub speed_ramp_bonus: f64,
    pub speed_ramp_seconds: f64,
    pub lookahead_seconds: f64,
    pub difficulty_ramp_seconds: f64,
}

impl Default for WorldTuning {
    fn default() -> Self {
        Self {
            base_speed: BASE_WORLD_SPEED,
            speed_ramp_bonus: WORLD_SPEED_RAMP_BONUS,
            speed_ramp_seconds: WORLD_SPEED_RAMP_SECONDS,
            lookahead_seconds: LOOKAHEAD_SECONDS,
            difficulty_ramp_seconds: DIFFICULTY_RAMP_SECONDS,
        }
    }
}

/// Score and multiplier economy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyTuning {
    pub passive_rate: f64,
    pub score_per_shard: f64,
    pub meter_start: f64,
    pub meter_per_shard: f64,
    pub meter_decay_rate: f64,
    pub meter_glide_decay_rate: f64,
    pub meter_floor_epsilon: f64,
    pub meter_restart_value: f64,
}

impl Default for EconomyTuning {
    fn default() -> Self {
        Self {
            passive_rate: PASSIVE_SCORE_RATE,
            score_per_shard: SCORE_PER_SHARD,
            meter_start: METER_START,
            meter_per_shard: METER_PER_SHARD,
            meter_decay_rate: METER_DECAY_RATE,
            meter_glide_decay_rate: METER_GLIDE_DECAY_RATE,
            meter_floor_epsilon: METER_FLOOR_EPSILON,
            meter_restart_value: METER_RESTART_VALUE,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub physics: PhysicsTuning,
    pub world: WorldTuning,
    pub economy: EconomyTuning,
}

/// Credentials for the hosted Firestore score collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirestoreConfig {
    pub project_id: String,
    pub api_key: String,
    #[serde(default = "default_collection")]
    pub collection: String,
}

fn default_collection() -> String {
    "scores".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub tuning: Tuning,
    pub firestore: Option<FirestoreConfig>,
}

impl GameConfig {
    /// Load `config.json` from the save directory, then apply env overrides.
    pub fn load() -> Self {
        let config: GameConfig = persistence::load_json_or_default(CONFIG_FILE);
        config.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Replace Firestore credentials with values from `lookup` when both are present.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let project = lookup(ENV_FIRESTORE_PROJECT).filter(|s| !s.trim().is_empty());
        let key = lookup(ENV_FIRESTORE_API_KEY).filter(|s| !s.trim().is_empty());
        if let (Some(project_id), Some(api_key)) = (project, key) {
            let collection = self
                .firestore
                .as_ref()
                .map(|f| f.collection.clone())
                .unwrap_or_else(default_collection);
            self.firestore = Some(FirestoreConfig {
                project_id,
                api_key,
                collection,
            });
        }
        self
    }
}
