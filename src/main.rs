mod ui;

use chrono::Utc;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use onebutton::core::{FrameClock, GameConfig};
use onebutton::leaderboard::{client_from_config, LeaderboardWorker};
use onebutton::profile::Profile;
use onebutton::run::RunPhase;
use onebutton::session::Session;
use onebutton::utils::{logging, persistence, version_line};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::{Duration, Instant};
use ui::UiContext;

/// Target frame time (~60 fps).
const FRAME_BUDGET: Duration = Duration::from_millis(16);

/// Jump strength for a tap when the terminal can't report key releases.
const TAP_JUMP_STRENGTH: f64 = 0.6;

#[derive(Debug, Default)]
struct CliArgs {
    offline: bool,
    seed: Option<u64>,
    verbose: bool,
}

fn print_help() {
    println!("One Button Hero - terminal runner with a global Top 10\n");
    println!("Usage: onebutton [options]\n");
    println!("Options:");
    println!("  --offline   Use an in-memory leaderboard");
    println!("  --seed N    Seed the level generator");
    println!("  --verbose   Debug logging to ~/.onebutton/onebutton.log");
    println!("  --version   Show version information");
    println!("  --help      Show this help message");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs::default();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--offline" => cli.offline = true,
            "--verbose" => cli.verbose = true,
            "--seed" => {
                i += 1;
                match args.get(i).and_then(|s| s.parse().ok()) {
                    Some(seed) => cli.seed = Some(seed),
                    None => {
                        eprintln!("--seed requires a number");
                        std::process::exit(1);
                    }
                }
            }
            "--version" | "-v" => {
                println!("{}", version_line());
                std::process::exit(0);
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown option: {}", other);
                eprintln!("Run 'onebutton --help' for usage.");
                std::process::exit(1);
            }
        }
        i += 1;
    }
    cli
}

fn now_ms() -> u64 {
    Utc::now().timestamp_millis().max(0) as u64
}

fn main() -> io::Result<()> {
    let cli = parse_args();

    let log_path = persistence::save_path(logging::LOG_FILE)?;
    if let Err(e) = logging::init_file(&log_path, cli.verbose) {
        eprintln!("Could not open log file {}: {}", log_path.display(), e);
    }
    log::info!("{} starting", version_line());

    let config = GameConfig::load();
    let profile = Profile::load();
    let offline = cli.offline || config.firestore.is_none();
    let client = client_from_config(&config, cli.offline).with_last_submit(profile.last_submit_ms);
    let worker = LeaderboardWorker::spawn(client);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let hold_supported = supports_keyboard_enhancement().unwrap_or(false);
    if hold_supported {
        stdout.execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))?;
    } else {
        log::info!("terminal does not report key releases; using tap jumps");
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let size = terminal.size()?;
    let viewport = ui::viewport_for_terminal(size.width, size.height);
    let mut session = Session::new(viewport, config.tuning, profile, cli.seed);
    let ctx = UiContext {
        offline,
        title: format!(" One Button Hero {} ", env!("CARGO_PKG_VERSION")),
        hold_supported,
    };

    let result = run_loop(&mut terminal, &mut session, &worker, &ctx);

    if hold_supported {
        terminal.backend_mut().execute(PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        log::warn!("exiting after error: {}", e);
    }
    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    session: &mut Session,
    worker: &LeaderboardWorker,
    ctx: &UiContext,
) -> io::Result<()> {
    let start = Instant::now();
    let mut clock = FrameClock::new();

    loop {
        let frame_start = Instant::now();
        terminal.draw(|frame| ui::draw(frame, session, ctx))?;

        // Input: wait out the rest of the frame, then drain.
        let mut timeout = FRAME_BUDGET.saturating_sub(frame_start.elapsed());
        while event::poll(timeout)? {
            timeout = Duration::ZERO;
            match event::read()? {
                Event::Key(key) => {
                    if handle_key(session, key, ctx.hold_supported) {
                        return Ok(());
                    }
                }
                Event::Resize(width, height) => {
                    session.resize(ui::viewport_for_terminal(width, height));
                }
                _ => {}
            }
        }

        // Leaderboard traffic never blocks the frame.
        while let Some(reply) = worker.try_recv() {
            session.apply_reply(reply);
        }
        for request in session.take_requests() {
            if !worker.send(request) {
                log::warn!("leaderboard worker is gone");
                session.leaderboard_unavailable();
            }
        }

        let dt = clock.advance(start.elapsed().as_secs_f64());
        session.tick(dt);
    }
}

fn is_jump_key(code: KeyCode) -> bool {
    matches!(code, KeyCode::Char(' ') | KeyCode::Up)
}

/// Returns true when the player asked to quit.
fn handle_key(session: &mut Session, key: KeyEvent, hold_supported: bool) -> bool {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }
    if key.kind == KeyEventKind::Repeat {
        return false;
    }
    let pressed = key.kind == KeyEventKind::Press;

    match session.phase() {
        RunPhase::Idle => {
            if !pressed {
                return false;
            }
            match key.code {
                KeyCode::Char('q') | KeyCode::Char('Q') => return true,
                KeyCode::Char('l') | KeyCode::Char('L') => session.open_leaderboard(),
                KeyCode::Esc => session.close_leaderboard(),
                code if is_jump_key(code) => {
                    if hold_supported {
                        session.press_start(now_ms());
                    } else {
                        session.tap(TAP_JUMP_STRENGTH);
                    }
                }
                _ => {}
            }
        }
        RunPhase::Running => {
            if key.code == KeyCode::Esc && pressed {
                session.return_to_menu();
            } else if is_jump_key(key.code) {
                if !hold_supported {
                    if pressed {
                        session.tap(TAP_JUMP_STRENGTH);
                    }
                } else if pressed {
                    session.press_start(now_ms());
                } else {
                    session.press_end(now_ms());
                }
            }
        }
        RunPhase::GameOver => {
            if !pressed {
                return false;
            }
            let editing = session.panel.status.accepts_submit();
            match key.code {
                KeyCode::Esc => session.return_to_menu(),
                KeyCode::Enter if editing => {
                    session.submit(now_ms());
                }
                KeyCode::Enter | KeyCode::Tab => session.restart(),
                KeyCode::Backspace if editing => session.pop_name_char(),
                KeyCode::Char(c) if editing => session.push_name_char(c),
                _ => {}
            }
        }
    }
    false
}
