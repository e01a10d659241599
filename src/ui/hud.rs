//! Side-panel HUD: score, multiplier meter, shards and best.

use super::game_common::{format_score, render_info_panel_frame};
use onebutton::session::Session;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const METER_WIDTH: usize = 12;

/// `[████░░░░]` for a meter value in [0, 1).
pub fn meter_bar(meter: f64, width: usize) -> String {
    let filled = ((meter.clamp(0.0, 1.0)) * width as f64).round() as usize;
    let mut bar = String::with_capacity(width + 2);
    bar.push('[');
    for i in 0..width {
        bar.push(if i < filled { '█' } else { '░' });
    }
    bar.push(']');
    bar
}

pub fn render_hud(frame: &mut Frame, area: Rect, session: &Session) {
    let inner = render_info_panel_frame(frame, area, " Run ");
    let run = &session.run;
    let economy = &run.economy;
    let cues = &session.cues;

    let score_style = if cues.pickup_pop > 0.0 {
        Style::default()
            .fg(Color::LightYellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    };
    let multiplier_style = if cues.multiplier_flash > 0.0 {
        let color = if cues.multiplier_up {
            Color::LightGreen
        } else {
            Color::LightRed
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Cyan)
    };

    let label = Style::default().fg(Color::DarkGray);
    let shown_score = run.final_score.unwrap_or_else(|| economy.final_score());

    let lines: Vec<Line> = vec![
        Line::from(vec![Span::styled("Score", label)]),
        Line::from(Span::styled(format_score(shown_score), score_style)),
        Line::from(""),
        Line::from(vec![
            Span::styled("Multiplier ", label),
            Span::styled(format!("x{}", economy.multiplier), multiplier_style),
        ]),
        Line::from(Span::styled(
            meter_bar(economy.meter, METER_WIDTH),
            multiplier_style,
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Shards ", label),
            Span::styled(economy.shards.to_string(), Style::default().fg(Color::White)),
        ]),
        Line::from(vec![
            Span::styled("Speed  ", label),
            Span::styled(
                format!("{:.0}", economy.world_speed),
                Style::default().fg(Color::White),
            ),
        ]),
        Line::from(vec![
            Span::styled("Jumps  ", label),
            Span::styled(
                format!(
                    "{}/{}",
                    run.tuning.physics.max_jumps.saturating_sub(run.player.jump_count),
                    run.tuning.physics.max_jumps
                ),
                Style::default().fg(Color::White),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Best   ", label),
            Span::styled(
                format_score(run.best_local),
                Style::default().fg(Color::Yellow),
            ),
        ]),
        Line::from(vec![
            Span::styled("Player ", label),
            Span::styled(
                session.profile.display_name().to_string(),
                Style::default().fg(Color::White),
            ),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines), inner);
}
