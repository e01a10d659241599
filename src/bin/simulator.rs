//! One Button Hero headless simulator
//!
//! Plays seeded runs with a simple autopilot through the same session and
//! tick code as the terminal game, submits qualifying scores to an in-memory
//! leaderboard and prints a summary.
//!
//! Usage:
//!   cargo run --bin simulator -- [OPTIONS]
//!
//! Options:
//!   --runs N        Number of runs (default: 20)
//!   --seed N        RNG seed (default: 42)
//!   --seconds N     Cap on simulated seconds per run (default: 180)
//!   --verbose       Per-run logging to stderr
//!   --quiet         Only the final summary line

use onebutton::core::constants::PLAYER_HEIGHT;
use onebutton::core::{Tuning, Viewport};
use onebutton::leaderboard::{handle_request, LeaderboardClient, MemoryStore};
use onebutton::profile::Profile;
use onebutton::run::{EndCause, RunPhase, RunState, TickEvent};
use onebutton::scoring::MultiplierChange;
use onebutton::session::{EndOfRunStatus, Session};
use onebutton::utils::logging;

const SIM_DT: f64 = 1.0 / 60.0;

// ── CLI Configuration ────────────────────────────────────────────────

struct SimConfig {
    runs: u32,
    seed: u64,
    max_seconds: f64,
    verbose: bool,
    quiet: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            runs: 20,
            seed: 42,
            max_seconds: 180.0,
            verbose: false,
            quiet: false,
        }
    }
}

fn parse_number<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> T {
    match args.get(i).and_then(|s| s.parse().ok()) {
        Some(n) => n,
        None => {
            eprintln!("{} requires a number", flag);
            std::process::exit(1);
        }
    }
}

fn parse_args() -> SimConfig {
    let args: Vec<String> = std::env::args().collect();
    let mut config = SimConfig::default();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--runs" => {
                i += 1;
                config.runs = parse_number(&args, i, "--runs");
            }
            "--seed" => {
                i += 1;
                config.seed = parse_number(&args, i, "--seed");
            }
            "--seconds" => {
                i += 1;
                config.max_seconds = parse_number(&args, i, "--seconds");
            }
            "--verbose" => config.verbose = true,
            "--quiet" => config.quiet = true,
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {other}");
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }
    config
}

fn print_usage() {
    eprintln!(
        "One Button Hero Headless Simulator\n\
         \n\
         Usage: simulator [OPTIONS]\n\
         \n\
         Options:\n\
         \x20 --runs N        Number of runs (default: 20)\n\
         \x20 --seed N        RNG seed (default: 42)\n\
         \x20 --seconds N     Cap on simulated seconds per run (default: 180)\n\
         \x20 --verbose       Per-run logging to stderr\n\
         \x20 --quiet         Only the final summary line\n\
         \x20 --help, -h      Show this help"
    );
}

// ── Autopilot ────────────────────────────────────────────────────────

/// How far ahead of a ledge's end (in seconds of scroll) to take off.
const TAKEOFF_LEAD_SECONDS: f64 = 0.1;

enum Action {
    Jump(f64),
    Glide(bool),
}

/// Pick an action from the visible state. Jumps near the end of the current
/// ledge, glides while falling with nothing below, double-jumps when low.
fn autopilot(run: &RunState) -> Action {
    let player = &run.player;
    let feet_x = player.feet_x();
    let speed = run.economy.world_speed;

    if player.on_ground {
        let support = run
            .world
            .platforms
            .iter()
            .map(|p| p.surface())
            .find(|s| s.spans_x(feet_x) && (s.y - player.bottom()).abs() < 1.0);
        if let Some(surface) = support {
            if surface.right() - feet_x < speed * TAKEOFF_LEAD_SECONDS {
                return Action::Jump(1.0);
            }
        }
        return Action::Glide(false);
    }

    let ground_below = run.world.platforms.iter().any(|p| {
        let s = p.surface();
        s.spans_x(feet_x) && s.y >= player.bottom()
    });
    let low = player.y > run.viewport.height - PLAYER_HEIGHT * 2.5;
    if player.vy > 0.0 && low && !ground_below && player.can_jump(&run.tuning.physics) {
        return Action::Jump(1.0);
    }
    Action::Glide(player.vy > 0.0 && !ground_below)
}

// ── Simulation Statistics ────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
struct RunStats {
    score: u64,
    seconds: f64,
    shards: u32,
    peak_multiplier: u32,
    jumps: u32,
    cause: Option<EndCause>,
    submission: Option<String>,
}

fn simulate_run(
    session: &mut Session,
    client: &mut LeaderboardClient,
    config: &SimConfig,
    clock_ms: &mut u64,
) -> RunStats {
    let mut stats = RunStats {
        peak_multiplier: 1,
        ..RunStats::default()
    };
    match session.phase() {
        RunPhase::Idle => {
            session.start();
        }
        _ => session.restart(),
    }

    while session.phase() == RunPhase::Running && session.run.elapsed < config.max_seconds {
        match autopilot(&session.run) {
            Action::Jump(strength) => {
                if session.run.jump(strength) {
                    stats.jumps += 1;
                }
                session.run.set_gliding(false);
            }
            Action::Glide(on) => session.run.set_gliding(on),
        }

        for event in session.tick(SIM_DT) {
            match event {
                TickEvent::Multiplier(MultiplierChange::Increased { multiplier }) => {
                    stats.peak_multiplier = stats.peak_multiplier.max(multiplier);
                }
                TickEvent::RunEnded { cause, .. } => stats.cause = Some(cause),
                _ => {}
            }
        }
        *clock_ms += (SIM_DT * 1000.0) as u64;
    }

    stats.seconds = session.run.elapsed;
    stats.shards = session.run.economy.shards;
    stats.score = session.run.final_score.unwrap_or_else(|| session.run.economy.final_score());

    // Leaderboard flow, answered synchronously.
    for _ in 0..3 {
        let requests = session.take_requests();
        if requests.is_empty() {
            break;
        }
        for request in requests {
            session.apply_reply(handle_request(client, request));
        }
        if matches!(session.panel.status, EndOfRunStatus::Prompt { .. }) {
            session.submit(*clock_ms);
        }
    }
    if session.panel.status != EndOfRunStatus::Hidden {
        stats.submission = Some(session.panel.status.message());
    }
    stats
}

fn main() {
    let config = parse_args();
    logging::init_stderr(config.verbose);

    let mut profile = Profile::default();
    profile.set_name("Autopilot");
    let mut session = Session::new(
        Viewport::default(),
        Tuning::default(),
        profile,
        Some(config.seed),
    )
    .without_persistence();
    let mut client = LeaderboardClient::new(MemoryStore::new());
    let mut clock_ms: u64 = 0;

    let mut all = Vec::with_capacity(config.runs as usize);
    for run_index in 0..config.runs {
        let stats = simulate_run(&mut session, &mut client, &config, &mut clock_ms);
        if !config.quiet {
            println!(
                "run {:>3}: score {:>6}  {:>6.1}s  shards {:>3}  peak x{:<2} jumps {:>4}  {:?}  {}",
                run_index + 1,
                stats.score,
                stats.seconds,
                stats.shards,
                stats.peak_multiplier,
                stats.jumps,
                stats.cause,
                stats.submission.as_deref().unwrap_or("")
            );
        }
        log::debug!("run {} finished: {:?}", run_index + 1, stats);
        all.push(stats);
        // Leave the submission cooldown behind between runs.
        clock_ms += 5_000;
    }

    if all.is_empty() {
        return;
    }
    let n = all.len() as f64;
    let mean_score = all.iter().map(|s| s.score as f64).sum::<f64>() / n;
    let best = all.iter().map(|s| s.score).max().unwrap_or(0);
    let mean_seconds = all.iter().map(|s| s.seconds).sum::<f64>() / n;
    let hazard_deaths = all.iter().filter(|s| s.cause == Some(EndCause::Hazard)).count();
    let falls = all.iter().filter(|s| s.cause == Some(EndCause::Fell)).count();
    let board = client.fetch_top(10);

    println!(
        "runs {}  mean score {:.0}  best {}  mean {:.1}s  hazards {}  falls {}  board {}",
        all.len(),
        mean_score,
        best,
        mean_seconds,
        hazard_deaths,
        falls,
        board.len()
    );
}
