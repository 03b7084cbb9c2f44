//! Layout and drawing: board, side panel, start/pause/game-over overlays.

use crate::game::{RunState, Snapshot};
use crate::grid::Cell;
use crate::i18n::{Lang, Strings};
use crate::theme::Theme;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget, Wrap};
use std::time::Instant;
use tachyonfx::{Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx};

/// Terminal columns per board cell; two make cells look square.
const CELL_WIDTH: u16 = 2;
const SIDEBAR_WIDTH: u16 = 34;
/// Line-clear flash over the board.
const CLEAR_FLASH_MS: u32 = 250;
/// Fade-in of the game-over banner.
const GAME_OVER_FADE_MS: u32 = 600;

/// Presentation state that outlives a single frame.
pub struct View {
    pub theme: Theme,
    pub lang: Lang,
    /// Final score of the game that just ended; cleared on the next start.
    pub game_over: Option<u32>,
    /// Rows and points of the most recent clear.
    pub last_clear: Option<(usize, u32)>,
    clear_flash: Option<Effect>,
    clear_flash_pending: bool,
    banner_fade: Option<Effect>,
    last_effect_time: Option<Instant>,
}

impl View {
    pub fn new(theme: Theme, lang: Lang) -> Self {
        Self {
            theme,
            lang,
            game_over: None,
            last_clear: None,
            clear_flash: None,
            clear_flash_pending: false,
            banner_fade: None,
            last_effect_time: None,
        }
    }

    pub fn strings(&self) -> &'static Strings {
        self.lang.strings()
    }

    pub fn on_lines_cleared(&mut self, rows: usize, points: u32) {
        self.last_clear = Some((rows, points));
        self.clear_flash = None;
        self.clear_flash_pending = true;
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.game_over = Some(final_score);
        self.banner_fade = None;
    }

    pub fn on_start(&mut self) {
        self.game_over = None;
        self.last_clear = None;
        self.banner_fade = None;
    }
}

/// Board size in terminal cells including its border.
/// Saturates instead of wrapping for boards wider than a terminal.
fn board_outer_size(snapshot: &Snapshot<'_>) -> (u16, u16) {
    let cols = u16::try_from(snapshot.grid.width()).unwrap_or(u16::MAX);
    let rows = u16::try_from(snapshot.grid.height()).unwrap_or(u16::MAX);
    (
        cols.saturating_mul(CELL_WIDTH).saturating_add(2),
        rows.saturating_add(2),
    )
}

/// Draw one frame.
pub fn draw(frame: &mut Frame, snapshot: &Snapshot<'_>, view: &mut View, now: Instant) {
    let area = frame.area();
    let (bw, bh) = board_outer_size(snapshot);
    let total_w = bw + SIDEBAR_WIDTH;

    let horiz = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(total_w),
            Constraint::Fill(1),
        ])
        .split(area);
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(bh),
            Constraint::Fill(1),
        ])
        .split(horiz[1]);
    let inner = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(bw), Constraint::Length(SIDEBAR_WIDTH)])
        .split(vert[1]);
    let (board_area, sidebar_area) = (inner[0], inner[1]);

    let board_rect = draw_board(frame, snapshot, view, board_area);
    draw_sidebar(frame, snapshot, view, sidebar_area);

    let delta = view
        .last_effect_time
        .map(|t| now.saturating_duration_since(t))
        .unwrap_or_default();
    view.last_effect_time = Some(now);
    let tfx_delta = TfxDuration::from_millis(delta.as_millis().min(u32::MAX as u128) as u32);

    if view.clear_flash_pending {
        view.clear_flash_pending = false;
        view.clear_flash = Some(
            fx::fade_from(view.theme.title, view.theme.bg, (CLEAR_FLASH_MS, Interpolation::Linear))
                .with_area(board_rect),
        );
    }
    run_effect(frame, &mut view.clear_flash, board_rect, tfx_delta);

    match snapshot.run_state {
        RunState::Running => {}
        RunState::Paused => draw_paused(frame, view, board_area),
        RunState::Idle => draw_start_prompt(frame, view, board_area),
        RunState::GameOver => {
            let popup = draw_game_over(frame, view, board_area);
            if view.banner_fade.is_none() && view.game_over.is_some() {
                view.banner_fade = Some(
                    fx::fade_from(view.theme.bg, view.theme.bg, (GAME_OVER_FADE_MS, Interpolation::Linear))
                        .with_area(popup),
                );
            }
            run_effect(frame, &mut view.banner_fade, popup, tfx_delta);
        }
    }
}

/// Advance an effect until it is done. Finished effects stay in their slot so they are not
/// recreated on the next frame.
fn run_effect(frame: &mut Frame, slot: &mut Option<Effect>, area: Rect, delta: TfxDuration) {
    if let Some(effect) = slot.as_mut().filter(|e| !e.done()) {
        frame.render_effect(effect, area, delta);
    }
}

fn cell_color(theme: &Theme, cell: Cell) -> Option<Color> {
    match cell {
        Cell::Empty => None,
        Cell::Block(kind) => Some(theme.piece_color(kind)),
    }
}

/// Board with border; returns the inner rect the cells occupy.
fn draw_board(frame: &mut Frame, snapshot: &Snapshot<'_>, view: &View, area: Rect) -> Rect {
    let theme = &view.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
        .title(Span::styled(
            format!(" {} ", view.strings().title),
            Style::default().fg(theme.title),
        ));
    let inner = block.inner(area);
    block.render(area, frame.buffer_mut());

    let grid = snapshot.grid;
    let buf = frame.buffer_mut();
    for (y, row) in grid.rows().enumerate() {
        for (x, cell) in row.iter().enumerate() {
            let color = cell_color(theme, *cell);
            paint_cell(buf, inner, x as i32, y as i32, color, theme);
        }
    }
    if let Some(piece) = snapshot.piece {
        for (y, x, cell) in piece.shape.cells() {
            let (gy, gx) = (piece.pos.row + y as i32, piece.pos.col + x as i32);
            // Rows above the top are hidden until the piece falls into view.
            if gy >= 0 {
                paint_cell(buf, inner, gx, gy, cell_color(theme, cell), theme);
            }
        }
    }
    inner
}

fn paint_cell(
    buf: &mut ratatui::buffer::Buffer,
    inner: Rect,
    x: i32,
    y: i32,
    color: Option<Color>,
    theme: &Theme,
) {
    let (Ok(x), Ok(y)) = (u16::try_from(x), u16::try_from(y)) else {
        return;
    };
    if y >= inner.height || x.saturating_mul(CELL_WIDTH).saturating_add(CELL_WIDTH) > inner.width {
        return;
    }
    let rx = inner.x + x * CELL_WIDTH;
    let ry = inner.y + y;
    let (symbol, style) = match color {
        Some(c) => ("█", Style::default().fg(c).bg(theme.bg)),
        None => (" ", Style::default().bg(theme.bg)),
    };
    for dx in 0..CELL_WIDTH {
        buf[(rx + dx, ry)].set_symbol(symbol).set_style(style);
    }
    if color.is_none() {
        buf[(rx, ry)]
            .set_symbol("·")
            .set_style(Style::default().fg(theme.div_line).bg(theme.bg));
    }
}

fn draw_sidebar(frame: &mut Frame, snapshot: &Snapshot<'_>, view: &View, area: Rect) {
    let theme = &view.theme;
    let s = view.strings();
    let fg = Style::default().fg(theme.main_fg);
    let title_style = Style::default().fg(theme.title).add_modifier(Modifier::BOLD);
    let key_style = Style::default().fg(theme.pieces[1]);

    let paused = snapshot.run_state == RunState::Paused;
    let can_pause = matches!(snapshot.run_state, RunState::Running | RunState::Paused);
    let button = |label: &str, key: &str, enabled: bool| {
        let style = if enabled {
            Style::default().fg(Color::Black).bg(theme.title)
        } else {
            Style::default().fg(theme.inactive_fg)
        };
        Span::styled(format!(" [{key}] {label} "), style)
    };

    let mut lines = vec![
        Line::from(Span::styled(s.score_line(snapshot.score), title_style)),
        Line::from(Span::styled(format!("{}: {}", s.lines, snapshot.lines), fg)),
    ];
    if let Some((rows, points)) = view.last_clear {
        lines.push(Line::from(Span::styled(
            format!("+{points} ({rows}×)"),
            Style::default().fg(theme.pieces[5]),
        )));
    } else {
        lines.push(Line::from(""));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        button(s.start, "S", true),
        Span::from(" "),
        button(s.pause_label(paused), "P", can_pause),
    ]));
    lines.push(Line::from(""));
    for &(keys, meaning) in s.controls {
        lines.push(Line::from(vec![
            Span::styled(format!("{keys:>8} "), key_style),
            Span::styled(meaning, fg),
        ]));
    }
    lines.push(Line::from(""));
    for paragraph in s.instructions {
        lines.push(Line::from(Span::styled(*paragraph, fg)));
    }

    let p = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
            .title(Span::styled(format!(" {} ", view.lang.code()), Style::default().fg(theme.title))),
    );
    p.render(area, frame.buffer_mut());
}

/// Rect of `w x h` centred in `area`, clipped to it.
fn centered(area: Rect, w: u16, h: u16) -> Rect {
    Rect {
        x: area.x + area.width.saturating_sub(w) / 2,
        y: area.y + area.height.saturating_sub(h) / 2,
        width: w.min(area.width),
        height: h.min(area.height),
    }
}

fn popup(frame: &mut Frame, view: &View, area: Rect, lines: Vec<Line<'_>>) -> Rect {
    let h = lines.len() as u16 + 2;
    let rect = centered(area, area.width.saturating_sub(2), h);
    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(view.theme.div_line).bg(view.theme.bg)),
    );
    p.render(rect, frame.buffer_mut());
    rect
}

fn draw_paused(frame: &mut Frame, view: &View, area: Rect) {
    let s = view.strings();
    let lines = vec![
        Line::from(Span::styled(
            format!(" {} ", s.paused),
            Style::default().fg(Color::Black).bg(view.theme.title),
        )),
        Line::from(Span::styled(
            format!("[P] {}", s.resume),
            Style::default().fg(view.theme.main_fg),
        )),
    ];
    popup(frame, view, area, lines);
}

fn draw_start_prompt(frame: &mut Frame, view: &View, area: Rect) {
    let s = view.strings();
    let lines = vec![
        Line::from(Span::styled(
            s.title,
            Style::default().fg(view.theme.title).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("[S] {}", s.start),
            Style::default().fg(Color::Black).bg(view.theme.title),
        )),
    ];
    popup(frame, view, area, lines);
}

fn draw_game_over(frame: &mut Frame, view: &View, area: Rect) -> Rect {
    let s = view.strings();
    let mut lines = vec![Line::from(Span::styled(
        format!(" {} ", s.game_over),
        Style::default().fg(Color::White).bg(Color::Red),
    ))];
    if let Some(score) = view.game_over {
        lines.push(Line::from(Span::styled(
            s.score_line(score),
            Style::default().fg(view.theme.main_fg),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("[S] {}", s.start),
        Style::default().fg(Color::Black).bg(view.theme.title),
    )));
    popup(frame, view, area, lines)
}
