//! Play field rendering.
//!
//! Uses a cell buffer for per-character colour control. World entities are
//! projected from world units onto the terminal grid, drawn into a 2D buffer
//! and then stamped row-by-row as Paragraph widgets.

use onebutton::core::geometry::{Rect as WorldRect, Viewport};
use onebutton::run::RunState;
use onebutton::world::{BoltStyle, LedgeStyle};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const LEDGE_TOP: char = '▀';
const LEDGE_BODY: char = '▓';
const HAZARD_GROUND: char = '▲';
const HAZARD_CEILING: char = '▼';
const SHARD: char = '◆';
const CONFETTI: char = '▪';
const STAR: char = '·';

/// Ceiling hazards are larger than ground ones; size is all that tells them apart.
const CEILING_HAZARD_MIN_SIZE: f64 = 30.0;

#[derive(Clone, Copy)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::Reset,
            bg: Color::Reset,
        }
    }
}

/// Maps world units onto terminal cells.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    pub cols: u16,
    pub rows: u16,
    unit_x: f64,
    unit_y: f64,
}

impl Projection {
    pub fn new(viewport: &Viewport, cols: u16, rows: u16) -> Self {
        Self {
            cols,
            rows,
            unit_x: viewport.width / cols.max(1) as f64,
            unit_y: viewport.height / rows.max(1) as f64,
        }
    }

    pub fn col(&self, x: f64) -> i32 {
        (x / self.unit_x).floor() as i32
    }

    pub fn row(&self, y: f64) -> i32 {
        (y / self.unit_y).floor() as i32
    }

    /// Cells covered by `rect`, at least one in each direction. Column and
    /// row ranges are half-open and may extend off-grid.
    pub fn cells(&self, rect: &WorldRect) -> (std::ops::Range<i32>, std::ops::Range<i32>) {
        let c0 = self.col(rect.x);
        let c1 = ((rect.right() / self.unit_x).ceil() as i32).max(c0 + 1);
        let r0 = self.row(rect.y);
        let r1 = ((rect.bottom() / self.unit_y).ceil() as i32).max(r0 + 1);
        (c0..c1, r0..r1)
    }
}

struct Canvas {
    cells: Vec<Vec<Cell>>,
    cols: i32,
    rows: i32,
}

impl Canvas {
    fn new(cols: u16, rows: u16) -> Self {
        Self {
            cells: vec![vec![Cell::default(); cols as usize]; rows as usize],
            cols: cols as i32,
            rows: rows as i32,
        }
    }

    fn put(&mut self, col: i32, row: i32, ch: char, fg: Color) {
        if col >= 0 && col < self.cols && row >= 0 && row < self.rows {
            self.cells[row as usize][col as usize] = Cell {
                ch,
                fg,
                bg: Color::Reset,
            };
        }
    }

    fn put_if_empty(&mut self, col: i32, row: i32, ch: char, fg: Color) {
        if col >= 0
            && col < self.cols
            && row >= 0
            && row < self.rows
            && self.cells[row as usize][col as usize].ch == ' '
        {
            self.put(col, row, ch, fg);
        }
    }

    fn flush(&self, frame: &mut Frame, area: Rect) {
        for (row_idx, row_data) in self.cells.iter().enumerate() {
            let mut spans: Vec<Span> = Vec::new();
            let mut current_fg = Color::Reset;
            let mut current_bg = Color::Reset;
            let mut current_text = String::new();

            for &cell in row_data.iter() {
                if (cell.fg != current_fg || cell.bg != current_bg) && !current_text.is_empty() {
                    spans.push(Span::styled(
                        std::mem::take(&mut current_text),
                        Style::default().fg(current_fg).bg(current_bg),
                    ));
                }
                current_fg = cell.fg;
                current_bg = cell.bg;
                current_text.push(cell.ch);
            }
            if !current_text.is_empty() {
                spans.push(Span::styled(
                    current_text,
                    Style::default().fg(current_fg).bg(current_bg),
                ));
            }

            let row_area = Rect::new(area.x, area.y + row_idx as u16, area.width, 1);
            if row_area.y < area.y + area.height {
                frame.render_widget(Paragraph::new(Line::from(spans)), row_area);
            }
        }
    }
}

fn ledge_color(ledge: LedgeStyle, moving: bool) -> Color {
    if moving {
        return Color::Rgb(120, 170, 255);
    }
    match ledge {
        LedgeStyle::Ledge1 => Color::Rgb(150, 120, 90),
        LedgeStyle::Ledge2 => Color::Rgb(170, 170, 180),
        LedgeStyle::Ledge3 => Color::Rgb(200, 160, 70),
        LedgeStyle::Ledge4 => Color::Rgb(140, 100, 60),
    }
}

fn bolt_color(bolt: BoltStyle) -> Color {
    match bolt {
        BoltStyle::Bolt1 => Color::Rgb(255, 221, 85),
        BoltStyle::Bolt2 => Color::Rgb(109, 224, 255),
        BoltStyle::Bolt3 => Color::Rgb(140, 255, 122),
        BoltStyle::Bolt4 => Color::Rgb(255, 154, 77),
        BoltStyle::Bolt5 => Color::Rgb(255, 122, 217),
        BoltStyle::Bolt6 => Color::Rgb(255, 255, 255),
    }
}

/// Draw the world, the player and confetti into `area`.
pub fn render_play_field(frame: &mut Frame, area: Rect, run: &RunState) {
    if area.height < 2 || area.width < 10 {
        return;
    }
    let proj = Projection::new(&run.viewport, area.width, area.height);
    let mut canvas = Canvas::new(area.width, area.height);

    // ── Background: slow parallax dots ────────────────────────────────
    let drift = (run.elapsed * 6.0) % area.width as f64;
    const STARS: [(f64, i32); 6] =
        [(7.0, 1), (23.0, 3), (41.0, 2), (58.0, 5), (74.0, 1), (90.0, 4)];
    for &(base_x, row) in &STARS {
        let col = (base_x - drift).rem_euclid(area.width as f64) as i32;
        canvas.put_if_empty(col, row, STAR, Color::Rgb(55, 60, 80));
    }

    // ── Platforms ─────────────────────────────────────────────────────
    for platform in &run.world.platforms {
        let geo = platform.ledge_geometry();
        let body = WorldRect::new(geo.draw_x, platform.y, geo.total_width, geo.tile_height);
        let (cols, rows) = proj.cells(&body);
        let color = ledge_color(platform.ledge, platform.is_moving());
        let top_row = rows.start;
        for row in rows {
            let ch = if row == top_row { LEDGE_TOP } else { LEDGE_BODY };
            for col in cols.clone() {
                canvas.put(col, row, ch, color);
            }
        }
    }

    // ── Hazards ───────────────────────────────────────────────────────
    for hazard in &run.world.hazards {
        let (cols, rows) = proj.cells(&hazard.bounds());
        let ch = if hazard.size >= CEILING_HAZARD_MIN_SIZE {
            HAZARD_CEILING
        } else {
            HAZARD_GROUND
        };
        for row in rows {
            for col in cols.clone() {
                canvas.put(col, row, ch, Color::Rgb(255, 80, 80));
            }
        }
    }

    // ── Shards ────────────────────────────────────────────────────────
    for shard in &run.world.shards {
        let b = shard.bounds();
        let col = proj.col(b.x + b.w / 2.0);
        let row = proj.row(b.y + b.h / 2.0);
        canvas.put(col, row, SHARD, bolt_color(shard.bolt));
    }

    // ── Player ────────────────────────────────────────────────────────
    let (cols, rows) = proj.cells(&run.player.bounds());
    let frame_index = ((run.animation_time * 10.0) as i64).rem_euclid(2);
    let last_row = rows.end - 1;
    let first_col = cols.start;
    for row in rows {
        for col in cols.clone() {
            let ch = if row == last_row && run.player.on_ground {
                // Feet alternate while running.
                match (frame_index, col == first_col) {
                    (0, true) | (1, false) => '▘',
                    _ => ' ',
                }
            } else if run.gliding && row == last_row {
                '▔'
            } else {
                '█'
            };
            if ch != ' ' {
                canvas.put(col, row, ch, Color::LightYellow);
            }
        }
    }

    // ── Confetti ──────────────────────────────────────────────────────
    for particle in &run.confetti {
        let c = particle.color;
        canvas.put(
            proj.col(particle.x),
            proj.row(particle.y),
            CONFETTI,
            Color::Rgb(c.0, c.1, c.2),
        );
    }

    canvas.flush(frame, area);
}
