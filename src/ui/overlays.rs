//! Title screen, game-over panel and the Top 10 list.

use super::game_common::{format_score, render_overlay_box};
use onebutton::core::constants::MAX_NAME_LEN;
use onebutton::leaderboard::ScoreRecord;
use onebutton::session::{EndOfRunStatus, Session};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const RANK_COLORS: [Color; 3] = [
    Color::Rgb(255, 215, 0),
    Color::Rgb(192, 192, 192),
    Color::Rgb(205, 127, 50),
];

fn rank_style(index: usize) -> Style {
    match RANK_COLORS.get(index) {
        Some(color) => Style::default().fg(*color).add_modifier(Modifier::BOLD),
        None => Style::default().fg(Color::White),
    }
}

/// One row per entry: `#1 ANN      1,200`. Names are upper-cased and cut
/// to the display length.
pub fn leaderboard_lines(entries: &[ScoreRecord]) -> Vec<Line<'static>> {
    if entries.is_empty() {
        return vec![Line::from(Span::styled(
            "No scores yet",
            Style::default().fg(Color::DarkGray),
        ))];
    }
    entries
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let name: String = record.name.chars().take(MAX_NAME_LEN).collect();
            let crown = if i == 0 { "♛ " } else { "  " };
            Line::from(vec![
                Span::styled(format!("#{:<3}", i + 1), rank_style(i)),
                Span::styled(crown, rank_style(i)),
                Span::styled(
                    format!("{:<width$}", name.to_uppercase(), width = MAX_NAME_LEN),
                    rank_style(i),
                ),
                Span::styled(
                    format!(" {:>9}", format_score(record.score)),
                    Style::default().fg(Color::White),
                ),
            ])
        })
        .collect()
}

pub fn render_title(frame: &mut Frame, area: Rect, best: u64, offline: bool) {
    let inner = render_overlay_box(frame, area, 44, 9, Color::LightYellow);
    let mut lines = vec![
        Line::from(Span::styled(
            "ONE BUTTON HERO",
            Style::default()
                .fg(Color::LightYellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Hold to glide, release to jump"),
        Line::from("Longer holds jump higher. Two jumps."),
        Line::from(""),
        Line::from(Span::styled(
            format!("Best: {}", format_score(best)),
            Style::default().fg(Color::Yellow),
        )),
    ];
    if offline {
        lines.push(Line::from(Span::styled(
            "offline leaderboard",
            Style::default().fg(Color::DarkGray),
        )));
    }
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

pub fn render_leaderboard(frame: &mut Frame, area: Rect, entries: &[ScoreRecord]) {
    let inner = render_overlay_box(frame, area, 36, 15, Color::Cyan);
    let mut lines = vec![
        Line::from(Span::styled(
            "GLOBAL TOP 10",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    lines.extend(leaderboard_lines(entries));
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

pub fn render_game_over(frame: &mut Frame, area: Rect, session: &Session) {
    let panel = &session.panel;
    let run = &session.run;
    let height = 10 + panel.entries.len().max(1) as u16;
    let inner = render_overlay_box(frame, area, 44, height, Color::LightRed);

    let final_score = run.final_score.unwrap_or(0);
    let mut lines = vec![
        Line::from(Span::styled(
            "GAME OVER",
            Style::default()
                .fg(Color::LightRed)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("Score ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format_score(final_score),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::styled("   Best ", Style::default().fg(Color::DarkGray)),
            Span::styled(format_score(run.best_local), Style::default().fg(Color::Yellow)),
        ]),
        Line::from(""),
    ];

    let status_color = match panel.status {
        EndOfRunStatus::Prompt { .. } | EndOfRunStatus::Submitted(_) => Color::LightGreen,
        EndOfRunStatus::Failed(_) => Color::LightRed,
        _ => Color::Gray,
    };
    lines.push(Line::from(Span::styled(
        panel.status.message(),
        Style::default().fg(status_color),
    )));
    if panel.status.accepts_submit() {
        lines.push(Line::from(vec![
            Span::styled("Name: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{}_", panel.name_input),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
        ]));
    } else {
        lines.push(Line::from(""));
    }
    lines.push(Line::from(""));
    lines.extend(leaderboard_lines(&panel.entries));

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, score: u64) -> ScoreRecord {
        ScoreRecord {
            id: name.to_string(),
            name: name.to_string(),
            score,
            created_at: None,
        }
    }

    #[test]
    fn test_empty_board_placeholder() {
        let lines = leaderboard_lines(&[]);
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn test_rows_are_ranked_and_uppercased() {
        let lines = leaderboard_lines(&[record("ann", 1200), record("bob", 900)]);
        assert_eq!(lines.len(), 2);
        let first: String = lines[0].spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(first.starts_with("#1"));
        assert!(first.contains("ANN"));
        assert!(first.contains("1,200"));
    }
}
