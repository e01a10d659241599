//! Leaderboard client: qualification, name normalisation, submission cooldown
//! and the per-run submission lock.

use super::error::LeaderboardError;
use super::store::{ScoreRecord, ScoreStore};
use crate::core::constants::{
    LEADERBOARD_SIZE, MAX_NAME_LEN, MIN_LEADERBOARD_SCORE, SUBMIT_COOLDOWN_MS,
};
use chrono::Utc;

/// Result of a qualification check against the current top list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Qualification {
    pub qualifies: bool,
    /// 1-based rank the score would take, when it qualifies.
    pub rank: Option<usize>,
}

impl Qualification {
    pub fn rejected() -> Self {
        Self::default()
    }
}

/// What a successful submission did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created,
    /// The name's existing record was raised to the new score.
    Updated,
    /// The name already held an equal or better score; nothing written.
    Unchanged,
}

/// Trim and cut to the maximum display length.
pub fn normalize_name(name: &str) -> String {
    name.trim().chars().take(MAX_NAME_LEN).collect()
}

/// Qualification rule: room left in the top list, or strictly above its minimum.
pub fn qualify(top: &[ScoreRecord], score: u64, size: usize) -> Qualification {
    let lowest = top.iter().map(|r| r.score).min().unwrap_or(0);
    if top.len() < size || score > lowest {
        let rank = 1 + top.iter().filter(|r| r.score > score).count();
        Qualification {
            qualifies: true,
            rank: Some(rank),
        }
    } else {
        Qualification::rejected()
    }
}

pub struct LeaderboardClient {
    store: Box<dyn ScoreStore>,
    last_submit_ms: Option<u64>,
    submitted_run: Option<u64>,
}

impl LeaderboardClient {
    pub fn new(store: impl ScoreStore + 'static) -> Self {
        Self {
            store: Box::new(store),
            last_submit_ms: None,
            submitted_run: None,
        }
    }

    /// Resume the cooldown from a previous session.
    pub fn with_last_submit(mut self, last_submit_ms: Option<u64>) -> Self {
        self.last_submit_ms = last_submit_ms;
        self
    }

    pub fn last_submit_ms(&self) -> Option<u64> {
        self.last_submit_ms
    }

    /// Top `n` entries, highest first. Store failures degrade to an empty list.
    pub fn fetch_top(&self, n: usize) -> Vec<ScoreRecord> {
        match self.store.top(n) {
            Ok(records) => records,
            Err(e) => {
                log::warn!("leaderboard fetch failed: {}", e);
                Vec::new()
            }
        }
    }

    /// Whether `score` would enter the top list. A failing store never qualifies.
    pub fn qualifies(&self, score: u64) -> Qualification {
        match self.store.top(LEADERBOARD_SIZE) {
            Ok(top) => qualify(&top, score, LEADERBOARD_SIZE),
            Err(e) => {
                log::warn!("leaderboard qualification check failed: {}", e);
                Qualification::rejected()
            }
        }
    }

    /// Record `score` under `name` for run `run_id`.
    ///
    /// Only the best score per name is kept. The cooldown starts on any
    /// write; the run lock is taken on any success.
    pub fn submit(
        &mut self,
        name: &str,
        score: f64,
        run_id: u64,
        now_ms: u64,
    ) -> Result<SubmitOutcome, LeaderboardError> {
        let name = normalize_name(name);
        let score = if score.is_finite() && score > 0.0 {
            score.floor() as u64
        } else {
            0
        };

        if name.is_empty() {
            return Err(LeaderboardError::validation("Name required"));
        }
        if score < MIN_LEADERBOARD_SCORE {
            return Err(LeaderboardError::validation(format!(
                "Score {}+ required",
                MIN_LEADERBOARD_SCORE
            )));
        }
        if let Some(last) = self.last_submit_ms {
            if now_ms.saturating_sub(last) < SUBMIT_COOLDOWN_MS {
                return Err(LeaderboardError::RateLimit);
            }
        }
        if self.submitted_run == Some(run_id) {
            return Err(LeaderboardError::DuplicateSubmission);
        }

        let outcome = self.write_best(&name, score).map_err(|e| {
            log::warn!("leaderboard submit failed: {}", e);
            e
        })?;

        if outcome != SubmitOutcome::Unchanged {
            self.last_submit_ms = Some(now_ms);
        }
        self.submitted_run = Some(run_id);
        log::info!("submitted {} for {} ({:?})", score, name, outcome);
        Ok(outcome)
    }

    fn write_best(&mut self, name: &str, score: u64) -> Result<SubmitOutcome, LeaderboardError> {
        let now = Utc::now();
        match self.store.find_by_name(name)? {
            Some(existing) if score <= existing.score => Ok(SubmitOutcome::Unchanged),
            Some(existing) => {
                self.store.update(&existing.id, name, score, now)?;
                Ok(SubmitOutcome::Updated)
            }
            None => {
                self.store.insert(name, score, now)?;
                Ok(SubmitOutcome::Created)
            }
        }
    }
}
