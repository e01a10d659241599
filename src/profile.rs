//! Local player profile: best score, display name and the last submission
//! time, persisted to ~/.onebutton/profile.json.

use crate::core::constants::DEFAULT_PLAYER_NAME;
use crate::leaderboard::normalize_name;
use crate::utils::persistence;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;

pub const PROFILE_FILE: &str = "profile.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub best_score: u64,
    /// Empty until the player has entered a name once.
    pub player_name: String,
    /// Unix millis of the last leaderboard write; drives the cooldown across sessions.
    pub last_submit_ms: Option<u64>,
}

impl Profile {
    pub fn load() -> Self {
        persistence::load_json_or_default(PROFILE_FILE)
    }

    pub fn load_from(path: &Path) -> Self {
        persistence::load_json_from(path)
    }

    pub fn save(&self) -> io::Result<()> {
        persistence::save_json(PROFILE_FILE, self)
    }

    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        persistence::save_json_to(path, self)
    }

    pub fn has_name(&self) -> bool {
        !self.player_name.is_empty()
    }

    /// Name to prefill or submit with.
    pub fn display_name(&self) -> &str {
        if self.has_name() {
            &self.player_name
        } else {
            DEFAULT_PLAYER_NAME
        }
    }

    /// Store a normalised name. Blank input keeps the previous one.
    pub fn set_name(&mut self, name: &str) -> bool {
        let name = normalize_name(name);
        if name.is_empty() {
            return false;
        }
        self.player_name = name;
        true
    }

    /// Raise the best score. Returns true when it changed.
    pub fn record_score(&mut self, score: u64) -> bool {
        if score > self.best_score {
            self.best_score = score;
            true
        } else {
            false
        }
    }
}
