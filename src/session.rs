//! Game session: one run at a time, the local profile, the single-button
//! input and the end-of-run leaderboard flow.
//!
//! The session never talks to the leaderboard directly. It queues
//! [`LeaderboardRequest`]s for the frame driver to forward to the worker and
//! applies [`LeaderboardReply`]s as they come back. Replies tagged with an
//! older run id are dropped so a slow response can't touch a new run.

use crate::core::config::Tuning;
use crate::core::constants::{LEADERBOARD_SIZE, MAX_NAME_LEN, MIN_LEADERBOARD_SCORE};
use crate::core::geometry::Viewport;
use crate::leaderboard::{
    LeaderboardError, LeaderboardReply, LeaderboardRequest, ScoreRecord, SubmitOutcome,
};
use crate::profile::Profile;
use crate::run::{InputTracker, RunPhase, RunState, TickEvent};
use crate::scoring::MultiplierChange;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

pub const MSG_BELOW_MINIMUM: &str = "Score 500+ to enter the Global Leaderboard!";
pub const MSG_MISSED: &str = "So close! Keep climbing!";
pub const MSG_CHECKING: &str = "Checking leaderboard...";
pub const MSG_SUBMITTING: &str = "Submitting...";
pub const MSG_ALREADY_SUBMITTED: &str = "This run is already on the board";
pub const MSG_UNAVAILABLE: &str = "Leaderboard unavailable";

/// How long HUD cues stay lit, in seconds.
const PICKUP_POP_SECONDS: f64 = 0.18;
const MULTIPLIER_FLASH_SECONDS: f64 = 0.35;

/// Where the end-of-run leaderboard flow stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EndOfRunStatus {
    #[default]
    Hidden,
    /// Final score under the submission minimum.
    BelowMinimum,
    Checking,
    /// Qualified; waiting for the player to confirm a name.
    Prompt { rank: usize },
    Missed,
    Submitting,
    Submitted(SubmitOutcome),
    /// The store refused a second submission for this run.
    AlreadySubmitted,
    Failed(String),
}

impl EndOfRunStatus {
    pub fn message(&self) -> String {
        match self {
            Self::Hidden => String::new(),
            Self::BelowMinimum => MSG_BELOW_MINIMUM.to_string(),
            Self::Checking => MSG_CHECKING.to_string(),
            Self::Prompt { rank } => format!("You made the Top 10! Rank #{}", rank),
            Self::Missed => MSG_MISSED.to_string(),
            Self::Submitting => MSG_SUBMITTING.to_string(),
            Self::Submitted(SubmitOutcome::Unchanged) => {
                "Your best on the board is already higher".to_string()
            }
            Self::Submitted(_) => "Score submitted!".to_string(),
            Self::AlreadySubmitted => MSG_ALREADY_SUBMITTED.to_string(),
            Self::Failed(msg) => msg.clone(),
        }
    }

    /// True while the name entry accepts edits and a submit.
    pub fn accepts_submit(&self) -> bool {
        matches!(self, Self::Prompt { .. } | Self::Failed(_))
    }
}

/// Leaderboard panel contents.
#[derive(Debug, Clone, Default)]
pub struct LeaderboardPanel {
    pub visible: bool,
    pub status: EndOfRunStatus,
    pub entries: Vec<ScoreRecord>,
    pub name_input: String,
    /// Rank from the last qualification, kept so a failed submit can retry.
    pub rank: Option<usize>,
}

/// Short-lived HUD highlights driven by tick events.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HudCues {
    pub pickup_pop: f64,
    pub multiplier_flash: f64,
    pub multiplier_up: bool,
}

impl HudCues {
    fn apply(&mut self, event: &TickEvent) {
        match event {
            TickEvent::ShardsCollected { .. } => self.pickup_pop = PICKUP_POP_SECONDS,
            TickEvent::Multiplier(change) => {
                self.multiplier_flash = MULTIPLIER_FLASH_SECONDS;
                self.multiplier_up = matches!(change, MultiplierChange::Increased { .. });
            }
            TickEvent::RunEnded { .. } => {}
        }
    }

    fn decay(&mut self, dt: f64) {
        self.pickup_pop = (self.pickup_pop - dt).max(0.0);
        self.multiplier_flash = (self.multiplier_flash - dt).max(0.0);
    }
}

pub struct Session {
    pub run: RunState,
    pub profile: Profile,
    pub panel: LeaderboardPanel,
    pub cues: HudCues,
    input: InputTracker,
    rng: StdRng,
    outbox: Vec<LeaderboardRequest>,
    /// Where to persist the profile; `None` uses ~/.onebutton/.
    profile_path: Option<PathBuf>,
    persist: bool,
}

impl Session {
    pub fn new(viewport: Viewport, tuning: Tuning, profile: Profile, seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let run = RunState::new(viewport, tuning, profile.best_score, &mut rng);
        let panel = LeaderboardPanel {
            name_input: profile.player_name.clone(),
            ..LeaderboardPanel::default()
        };
        Self {
            run,
            profile,
            panel,
            cues: HudCues::default(),
            input: InputTracker::new(),
            rng,
            outbox: Vec::new(),
            profile_path: None,
            persist: true,
        }
    }

    /// Persist the profile to `path` instead of the home directory.
    pub fn with_profile_path(mut self, path: PathBuf) -> Self {
        self.profile_path = Some(path);
        self
    }

    /// Never write the profile. Used by the simulator.
    pub fn without_persistence(mut self) -> Self {
        self.persist = false;
        self
    }

    pub fn phase(&self) -> RunPhase {
        self.run.phase
    }

    pub fn is_holding(&self) -> bool {
        self.input.is_held()
    }

    /// Requests queued since the last call, oldest first.
    pub fn take_requests(&mut self) -> Vec<LeaderboardRequest> {
        std::mem::take(&mut self.outbox)
    }

    // ── input ──────────────────────────────────────────────────────────

    /// Leave the menu and start the run without touching the button state.
    pub fn start(&mut self) -> bool {
        if self.run.phase != RunPhase::Idle {
            return false;
        }
        self.panel.visible = false;
        self.run.start()
    }

    /// Button down. From the menu this starts the run, and in both cases the
    /// press begins a glide whose release jumps.
    pub fn press_start(&mut self, now_ms: u64) {
        match self.run.phase {
            RunPhase::Idle => {
                self.start();
                self.begin_hold(now_ms);
            }
            RunPhase::Running => self.begin_hold(now_ms),
            RunPhase::GameOver => {}
        }
    }

    fn begin_hold(&mut self, now_ms: u64) {
        self.input.press_start(now_ms);
        self.run.set_gliding(true);
    }

    /// Button up. Ends the glide and jumps with the hold strength.
    pub fn press_end(&mut self, now_ms: u64) {
        let strength = self.input.press_end(now_ms);
        self.run.set_gliding(false);
        if let Some(strength) = strength {
            self.run.jump(strength);
        }
    }

    /// A press and release in one event, for terminals without key-release
    /// reporting.
    pub fn tap(&mut self, strength: f64) {
        match self.run.phase {
            RunPhase::Idle => {
                self.start();
            }
            RunPhase::Running => {
                self.run.jump(strength);
            }
            RunPhase::GameOver => {}
        }
    }

    /// Full reset into a new run.
    pub fn restart(&mut self) {
        self.input.cancel();
        self.cues = HudCues::default();
        self.panel.visible = false;
        self.panel.status = EndOfRunStatus::Hidden;
        self.panel.rank = None;
        self.run.restart(&mut self.rng);
    }

    /// Back to the idle menu with a fresh world.
    pub fn return_to_menu(&mut self) {
        self.input.cancel();
        self.cues = HudCues::default();
        self.panel.visible = false;
        self.panel.status = EndOfRunStatus::Hidden;
        self.run.reset(&mut self.rng);
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.run.resize(viewport);
    }

    // ── frame ──────────────────────────────────────────────────────────

    /// Advance one frame. Confetti and HUD cues animate in every phase.
    pub fn tick(&mut self, raw_dt: f64) -> Vec<TickEvent> {
        let events = self.run.tick(raw_dt, &mut self.rng);
        for event in &events {
            self.cues.apply(event);
            if let TickEvent::RunEnded { final_score, .. } = event {
                self.on_run_ended(*final_score);
            }
        }
        self.run.update_cosmetics(raw_dt);
        self.cues.decay(crate::core::clock::clamp_dt(raw_dt));
        events
    }

    fn on_run_ended(&mut self, final_score: u64) {
        self.input.cancel();
        if self.profile.record_score(final_score) {
            self.save_profile();
        }

        self.panel.visible = true;
        self.panel.rank = None;
        self.panel.entries.clear();
        if self.panel.name_input.is_empty() {
            self.panel.name_input = self.profile.display_name().to_string();
        }
        let run_id = self.run.run_id;
        self.outbox.push(LeaderboardRequest::FetchTop {
            run_id,
            limit: LEADERBOARD_SIZE,
        });
        if final_score < MIN_LEADERBOARD_SCORE {
            self.panel.status = EndOfRunStatus::BelowMinimum;
        } else {
            self.panel.status = EndOfRunStatus::Checking;
            self.outbox.push(LeaderboardRequest::Qualify {
                run_id,
                score: final_score,
            });
        }
    }

    // ── leaderboard flow ───────────────────────────────────────────────

    /// Show the board from the menu.
    pub fn open_leaderboard(&mut self) {
        self.panel.visible = true;
        self.outbox.push(LeaderboardRequest::FetchTop {
            run_id: self.run.run_id,
            limit: LEADERBOARD_SIZE,
        });
    }

    pub fn close_leaderboard(&mut self) {
        self.panel.visible = false;
    }

    pub fn push_name_char(&mut self, c: char) {
        if !c.is_control() && self.panel.name_input.chars().count() < MAX_NAME_LEN {
            self.panel.name_input.push(c);
        }
    }

    pub fn pop_name_char(&mut self) {
        self.panel.name_input.pop();
    }

    /// Submit the finished run's score under the entered name.
    ///
    /// Returns false when there is nothing to submit right now.
    pub fn submit(&mut self, now_ms: u64) -> bool {
        if self.run.phase != RunPhase::GameOver || !self.panel.status.accepts_submit() {
            return false;
        }
        let Some(score) = self.run.final_score else {
            return false;
        };
        if self.profile.set_name(&self.panel.name_input) {
            self.save_profile();
        }
        self.panel.status = EndOfRunStatus::Submitting;
        self.outbox.push(LeaderboardRequest::Submit {
            run_id: self.run.run_id,
            name: self.panel.name_input.clone(),
            score,
            now_ms,
        });
        true
    }

    /// Apply a finished leaderboard call. Returns false for stale replies.
    ///
    /// The cooldown start in a `Submitted` reply is kept even when stale; it
    /// belongs to the player, not the run.
    pub fn apply_reply(&mut self, reply: LeaderboardReply) -> bool {
        if let LeaderboardReply::Submitted { last_submit_ms, .. } = &reply {
            self.record_submit_time(*last_submit_ms);
        }
        if reply.run_id() != self.run.run_id {
            log::debug!(
                "dropping leaderboard reply for run {} (current {})",
                reply.run_id(),
                self.run.run_id
            );
            return false;
        }
        match reply {
            LeaderboardReply::Top { entries, .. } => {
                self.panel.entries = entries;
            }
            LeaderboardReply::Qualification { result, .. } => {
                if self.panel.status != EndOfRunStatus::Checking {
                    return true;
                }
                self.panel.status = match result.rank {
                    Some(rank) if result.qualifies => {
                        self.panel.rank = Some(rank);
                        EndOfRunStatus::Prompt { rank }
                    }
                    _ => EndOfRunStatus::Missed,
                };
            }
            LeaderboardReply::Submitted { result, .. } => {
                match result {
                    Ok(outcome) => {
                        self.panel.status = EndOfRunStatus::Submitted(outcome);
                        self.run.celebrate_submission(&mut self.rng);
                        self.outbox.push(LeaderboardRequest::FetchTop {
                            run_id: self.run.run_id,
                            limit: LEADERBOARD_SIZE,
                        });
                    }
                    Err(LeaderboardError::DuplicateSubmission) => {
                        self.panel.status = EndOfRunStatus::AlreadySubmitted;
                    }
                    Err(e) => {
                        self.panel.status = EndOfRunStatus::Failed(e.to_string());
                    }
                }
            }
        }
        true
    }

    /// The worker is gone. Anything waiting on it fails instead of hanging.
    pub fn leaderboard_unavailable(&mut self) {
        if matches!(
            self.panel.status,
            EndOfRunStatus::Checking | EndOfRunStatus::Submitting
        ) {
            self.panel.status = EndOfRunStatus::Failed(MSG_UNAVAILABLE.to_string());
        }
    }

    fn record_submit_time(&mut self, last_submit_ms: Option<u64>) {
        if last_submit_ms.is_some() && last_submit_ms != self.profile.last_submit_ms {
            self.profile.last_submit_ms = last_submit_ms;
            self.save_profile();
        }
    }

    fn save_profile(&self) {
        if !self.persist {
            return;
        }
        let result = match &self.profile_path {
            Some(path) => self.profile.save_to(path),
            None => self.profile.save(),
        };
        if let Err(e) = result {
            log::warn!("could not save profile: {}", e);
        }
    }
}
