//! App: terminal init, frame loop, key and mouse handling.

use crate::game::{Game, GameEvent, Renderer, Snapshot};
use crate::gesture::{GestureConfig, SwipeTracker};
use crate::input::{Action, key_to_action};
use crate::theme::Theme;
use crate::ui::{self, View};
use crate::{Args, GameConfig};
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};

/// Draws each tick's snapshot to the terminal.
struct TerminalRenderer<'a> {
    terminal: &'a mut DefaultTerminal,
    view: &'a mut View,
    now: Instant,
}

impl Renderer for TerminalRenderer<'_> {
    type Error = std::io::Error;

    fn render(&mut self, snapshot: &Snapshot<'_>) -> Result<(), Self::Error> {
        let Self {
            terminal,
            view,
            now,
        } = self;
        terminal.draw(|f| ui::draw(f, snapshot, view, *now))?;
        Ok(())
    }
}

/// Raw mode, alternate screen and mouse capture.
fn enter_terminal() -> std::io::Result<DefaultTerminal> {
    use crossterm::{event::EnableMouseCapture, execute, terminal::{EnterAlternateScreen, enable_raw_mode}};

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))
}

fn restore_terminal() -> std::io::Result<()> {
    restore_terminal_on(std::io::stdout())
}

/// Raw mode is switched off even when writing the leave sequences fails.
fn restore_terminal_on<W: std::io::Write>(mut out: W) -> std::io::Result<()> {
    use crossterm::{event::DisableMouseCapture, execute, terminal::{LeaveAlternateScreen, disable_raw_mode}};

    let screen = execute!(out, DisableMouseCapture, LeaveAlternateScreen);
    disable_raw_mode()?;
    screen
}

/// Whether the loop keeps going after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub struct App {
    game: Game<StdRng>,
    view: View,
    swipe: SwipeTracker,
    frame_duration: Duration,
    last_tick: Instant,
}

impl App {
    pub fn new(args: Args, config: &GameConfig, theme: Theme) -> Result<Self> {
        let frame_duration = args.frame_duration()?;
        let rng = match args.seed {
            Some(seed) => {
                log::info!("piece sequence seeded with {seed}");
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_os_rng(),
        };
        let mut game = Game::new(config, rng);
        let mut view = View::new(theme, args.lang);
        if args.no_menu {
            game.start();
            view.on_start();
        }
        let mut app = Self {
            game,
            view,
            swipe: SwipeTracker::new(GestureConfig::default()),
            frame_duration,
            last_tick: Instant::now(),
        };
        app.absorb_events();
        Ok(app)
    }

    pub fn run(&mut self) -> Result<()> {
        let mut terminal = match enter_terminal() {
            Ok(terminal) => terminal,
            Err(e) => {
                // Half-initialised; undo whatever did get switched on.
                let _ = restore_terminal();
                return Err(e.into());
            }
        };

        let result = self.run_loop(&mut terminal);

        restore_terminal()?;
        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        self.last_tick = Instant::now();
        loop {
            let now = Instant::now();
            let elapsed = now.saturating_duration_since(self.last_tick);
            self.last_tick = now;

            let mut renderer = TerminalRenderer {
                terminal: &mut *terminal,
                view: &mut self.view,
                now,
            };
            self.game.tick(elapsed, &mut renderer)?;
            self.absorb_events();

            let timeout = self.frame_duration.saturating_sub(now.elapsed());
            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    let flow = match event::read()? {
                        Event::Key(key) if key.kind == KeyEventKind::Press => {
                            self.handle_action(key_to_action(key))
                        }
                        Event::Mouse(mouse) => {
                            self.handle_mouse(mouse, Instant::now());
                            Flow::Continue
                        }
                        _ => Flow::Continue,
                    };
                    self.absorb_events();
                    if flow == Flow::Quit {
                        log::info!(
                            "quit while {:?} with {} points and {} lines",
                            self.game.run_state(),
                            self.game.score(),
                            self.game.lines()
                        );
                        return Ok(());
                    }
                }
            }
        }
    }

    fn handle_action(&mut self, action: Action) -> Flow {
        match action {
            Action::Play(command) => {
                self.game.apply(command);
            }
            Action::Start => {
                self.game.start();
                self.view.on_start();
            }
            Action::Pause => {
                self.game.toggle_pause();
            }
            Action::ToggleLang => {
                self.view.lang = self.view.lang.toggled();
                log::debug!("language switched to {}", self.view.lang.code());
            }
            Action::Quit => return Flow::Quit,
            Action::None => {}
        }
        Flow::Continue
    }

    fn handle_mouse(&mut self, mouse: MouseEvent, now: Instant) {
        let (x, y) = (i32::from(mouse.column), i32::from(mouse.row));
        let command = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.swipe.press(x, y, now),
            MouseEventKind::Drag(MouseButton::Left) => self.swipe.drag(x, y),
            MouseEventKind::Up(MouseButton::Left) => {
                self.swipe.release();
                None
            }
            _ => None,
        };
        if let Some(command) = command {
            self.game.apply(command);
        }
    }

    /// Move game notifications into the view and the log.
    fn absorb_events(&mut self) {
        for event in self.game.drain_events() {
            match event {
                GameEvent::LinesCleared { rows, points } => self.view.on_lines_cleared(rows, points),
                GameEvent::GameOver { final_score } => self.view.on_game_over(final_score),
                GameEvent::RunStateChanged(state) => log::debug!("run state is now {state:?}"),
                GameEvent::ScoreChanged(score) => log::trace!("score {score}"),
            }
        }
    }
}
