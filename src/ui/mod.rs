//! Terminal frontend.

pub mod game_common;
pub mod hud;
pub mod overlays;
pub mod play_scene;

use game_common::{create_game_layout, render_status_bar};
use onebutton::core::constants::DEFAULT_VIEWPORT_HEIGHT;
use onebutton::core::geometry::Viewport;
use onebutton::run::RunPhase;
use onebutton::session::Session;
use ratatui::{style::Color, Frame};

pub const INFO_PANEL_WIDTH: u16 = 22;

/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: f64 = 2.0;
const MIN_VIEWPORT_WIDTH: f64 = 640.0;
const MAX_VIEWPORT_WIDTH: f64 = 1600.0;

/// World viewport for a terminal of `width` x `height` cells. Height stays
/// fixed so jump arcs keep their feel; width follows the play field's shape.
pub fn viewport_for_terminal(width: u16, height: u16) -> Viewport {
    // Outer border, side panel and status bar.
    let cols = width.saturating_sub(2 + INFO_PANEL_WIDTH).max(1) as f64;
    let rows = height.saturating_sub(4).max(1) as f64;
    let w = DEFAULT_VIEWPORT_HEIGHT * cols / (rows * CELL_ASPECT);
    Viewport::new(
        w.clamp(MIN_VIEWPORT_WIDTH, MAX_VIEWPORT_WIDTH),
        DEFAULT_VIEWPORT_HEIGHT,
    )
}

pub struct UiContext {
    pub offline: bool,
    pub title: String,
    /// False when the terminal cannot report key releases.
    pub hold_supported: bool,
}

pub fn draw(frame: &mut Frame, session: &Session, ctx: &UiContext) {
    let area = frame.size();
    let layout = create_game_layout(frame, area, &ctx.title, Color::LightYellow, INFO_PANEL_WIDTH);

    play_scene::render_play_field(frame, layout.content, &session.run);
    hud::render_hud(frame, layout.info_panel, session);

    match session.phase() {
        RunPhase::Idle => {
            if session.panel.visible {
                overlays::render_leaderboard(frame, layout.content, &session.panel.entries);
            } else {
                overlays::render_title(frame, layout.content, session.run.best_local, ctx.offline);
            }
            render_status_bar(
                frame,
                layout.status_bar,
                "Ready",
                Color::LightYellow,
                &[("[Space]", "Start"), ("[L]", "Leaderboard"), ("[Q]", "Quit")],
            );
        }
        RunPhase::Running => {
            let (status, hint) = if !ctx.hold_supported {
                ("Run!", "Jump")
            } else if session.is_holding() {
                ("Gliding", "Release to jump")
            } else {
                ("Run!", "Hold to glide")
            };
            render_status_bar(
                frame,
                layout.status_bar,
                status,
                Color::LightYellow,
                &[("[Space]", hint), ("[Esc]", "Menu")],
            );
        }
        RunPhase::GameOver => {
            overlays::render_game_over(frame, layout.content, session);
            let controls: &[(&str, &str)] = if session.panel.status.accepts_submit() {
                &[("[Enter]", "Submit"), ("[Tab]", "Restart"), ("[Esc]", "Menu")]
            } else {
                &[("[Enter]", "Restart"), ("[Esc]", "Menu")]
            };
            render_status_bar(frame, layout.status_bar, "Game Over", Color::LightRed, controls);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_height_is_fixed() {
        let v = viewport_for_terminal(120, 40);
        assert_eq!(v.height, DEFAULT_VIEWPORT_HEIGHT);
        assert!(v.width >= MIN_VIEWPORT_WIDTH && v.width <= MAX_VIEWPORT_WIDTH);
    }

    #[test]
    fn test_tiny_terminal_is_clamped() {
        let v = viewport_for_terminal(10, 5);
        assert_eq!(v.width, MIN_VIEWPORT_WIDTH);
    }
}
