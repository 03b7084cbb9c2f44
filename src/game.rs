//! Game session: grid, active piece, score, run state and the gravity clock.

use crate::GameConfig;
use crate::collision::merge;
use crate::grid::Grid;
use crate::piece::{ActivePiece, Direction};
use crate::pieces;
use crate::score::ScoreTracker;
use rand::Rng;
use std::time::Duration;

/// Top-level mode of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    /// Never started.
    #[default]
    Idle,
    Running,
    Paused,
    /// A spawn collided. Grid and score are already reset; only `start` leaves this state.
    GameOver,
}

/// Player commands routed to the active piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    SoftDrop,
    Rotate,
    /// Swap the falling piece for a fresh one at the top.
    Respawn,
}

/// Notifications for whoever presents the game. Drained with `Game::drain_events`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    RunStateChanged(RunState),
    ScoreChanged(u32),
    LinesCleared { rows: usize, points: u32 },
    GameOver { final_score: u32 },
}

/// Read-only view handed to the renderer once per tick.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub grid: &'a Grid,
    pub piece: Option<&'a ActivePiece>,
    pub score: u32,
    pub lines: u32,
    pub run_state: RunState,
}

/// Presentation hook called by `Game::tick`.
pub trait Renderer {
    type Error;

    fn render(&mut self, snapshot: &Snapshot<'_>) -> Result<(), Self::Error>;
}

/// One independent game. Sessions share no state.
#[derive(Debug)]
pub struct Game<R> {
    grid: Grid,
    piece: Option<ActivePiece>,
    score: ScoreTracker,
    run_state: RunState,
    /// Time accumulated towards the next gravity step.
    drop_counter: Duration,
    drop_interval: Duration,
    rng: R,
    events: Vec<GameEvent>,
}

impl<R: Rng> Game<R> {
    pub fn new(config: &GameConfig, rng: R) -> Self {
        Self {
            grid: Grid::new(config.width, config.height),
            piece: None,
            score: ScoreTracker::new(),
            run_state: RunState::Idle,
            drop_counter: Duration::ZERO,
            drop_interval: config.drop_interval,
            rng,
            events: Vec::new(),
        }
    }

    pub fn score(&self) -> u32 {
        self.score.score()
    }

    pub fn lines(&self) -> u32 {
        self.score.lines()
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            grid: &self.grid,
            piece: self.piece.as_ref(),
            score: self.score.score(),
            lines: self.score.lines(),
            run_state: self.run_state,
        }
    }

    /// Take all notifications raised since the last call, oldest first.
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    fn set_run_state(&mut self, state: RunState) {
        if self.run_state != state {
            self.run_state = state;
            self.events.push(GameEvent::RunStateChanged(state));
        }
    }

    /// Fresh board, zero score, new piece, running. Works from any state.
    pub fn start(&mut self) {
        self.grid.clear();
        self.score.reset();
        self.drop_counter = Duration::ZERO;
        self.events.push(GameEvent::ScoreChanged(0));
        self.set_run_state(RunState::Running);
        log::info!(
            "game started on a {}x{} board",
            self.grid.width(),
            self.grid.height()
        );
        self.hard_reset();
    }

    /// Running and Paused swap; other states ignore the toggle.
    pub fn toggle_pause(&mut self) -> RunState {
        match self.run_state {
            RunState::Running => self.set_run_state(RunState::Paused),
            RunState::Paused => self.set_run_state(RunState::Running),
            RunState::Idle | RunState::GameOver => {}
        }
        self.run_state
    }

    /// Advance the gravity clock by `elapsed`, then render.
    pub fn tick<V: Renderer>(&mut self, elapsed: Duration, renderer: &mut V) -> Result<(), V::Error> {
        if self.run_state == RunState::Running {
            self.drop_counter += elapsed;
            if self.drop_counter > self.drop_interval {
                self.soft_drop();
            }
        }
        renderer.render(&self.snapshot())
    }

    /// Apply a player command. Ignored unless running; returns whether anything changed.
    pub fn apply(&mut self, command: Command) -> bool {
        if self.run_state != RunState::Running {
            return false;
        }
        match command {
            Command::MoveLeft => self.move_horizontal(Direction::Left),
            Command::MoveRight => self.move_horizontal(Direction::Right),
            Command::Rotate => self
                .piece
                .as_mut()
                .is_some_and(|p| p.rotate(&self.grid)),
            Command::SoftDrop => {
                self.soft_drop();
                true
            }
            Command::Respawn => {
                self.hard_reset();
                true
            }
        }
    }

    fn move_horizontal(&mut self, dir: Direction) -> bool {
        self.piece
            .as_mut()
            .is_some_and(|p| p.move_horizontal(&self.grid, dir))
    }

    /// One row down; a blocked piece locks into the grid and the next one spawns.
    /// The gravity clock restarts either way.
    pub fn soft_drop(&mut self) {
        let landed = self
            .piece
            .as_mut()
            .is_some_and(|p| !p.step_down(&self.grid));
        if landed {
            self.lock_piece();
        }
        self.drop_counter = Duration::ZERO;
    }

    fn lock_piece(&mut self) {
        let piece = match self.piece.take() {
            Some(p) => p,
            None => return,
        };
        merge(&mut self.grid, &piece.shape, piece.pos);

        let rows = self.grid.sweep_completed_rows();
        if rows > 0 {
            let points = self.score.record_sweep(rows);
            log::debug!("cleared {rows} row(s) for {points} points");
            self.events.push(GameEvent::LinesCleared { rows, points });
            self.events.push(GameEvent::ScoreChanged(self.score.score()));
        }
        self.hard_reset();
    }

    /// Replace the active piece with a random one, centred on row 0.
    /// If it does not fit, the game is over.
    pub fn hard_reset(&mut self) {
        let (shape, kind) = pieces::spawn(&mut self.rng);
        let piece = ActivePiece::spawn_centered(kind, shape, &self.grid);
        self.drop_counter = Duration::ZERO;
        if piece.collides(&self.grid) {
            self.game_over();
        } else {
            self.piece = Some(piece);
        }
    }

    fn game_over(&mut self) {
        let final_score = self.score.score();
        log::info!("game over with {final_score} points");
        self.piece = None;
        self.grid.clear();
        self.score.reset();
        self.events.push(GameEvent::GameOver { final_score });
        self.events.push(GameEvent::ScoreChanged(0));
        self.set_run_state(RunState::GameOver);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::Position;
    use crate::grid::Cell;
    use crate::pieces::PieceKind;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::convert::Infallible;

    fn config() -> GameConfig {
        GameConfig {
            width: 12,
            height: 20,
            drop_interval: Duration::from_millis(1000),
        }
    }

    fn game() -> Game<StdRng> {
        Game::new(&config(), StdRng::seed_from_u64(42))
    }

    fn place(game: &mut Game<StdRng>, kind: PieceKind, row: i32, col: i32) {
        game.piece = Some(ActivePiece {
            kind,
            shape: kind.template(),
            pos: Position::new(row, col),
        });
    }

    #[derive(Default)]
    struct Frames {
        count: usize,
        last: Option<(RunState, u32)>,
    }

    impl Renderer for Frames {
        type Error = Infallible;

        fn render(&mut self, snapshot: &Snapshot<'_>) -> Result<(), Infallible> {
            self.count += 1;
            self.last = Some((snapshot.run_state, snapshot.score));
            Ok(())
        }
    }

    #[test]
    fn new_game_is_idle_and_empty() {
        let g = game();
        assert_eq!(g.run_state(), RunState::Idle);
        assert!(g.piece.is_none());
        assert!(g.grid.is_empty());
        assert_eq!(g.score(), 0);
    }

    #[test]
    fn start_spawns_and_runs() {
        let mut g = game();
        g.start();
        assert_eq!(g.run_state(), RunState::Running);
        let piece = g.piece.as_ref().expect("piece after start");
        assert_eq!(piece.pos.row, 0);
        let events: Vec<_> = g.drain_events().collect();
        assert!(events.contains(&GameEvent::RunStateChanged(RunState::Running)));
        assert!(events.contains(&GameEvent::ScoreChanged(0)));
        assert_eq!(g.drain_events().count(), 0);
    }

    #[test]
    fn commands_are_ignored_unless_running() {
        let mut g = game();
        assert!(!g.apply(Command::SoftDrop));
        g.start();
        g.toggle_pause();
        let before = g.piece.clone();
        assert!(!g.apply(Command::MoveLeft));
        assert!(!g.apply(Command::Respawn));
        assert_eq!(g.piece.clone(), before);
    }

    #[test]
    fn pause_toggles_only_between_running_and_paused() {
        let mut g = game();
        assert_eq!(g.toggle_pause(), RunState::Idle);
        g.start();
        assert_eq!(g.toggle_pause(), RunState::Paused);
        assert_eq!(g.toggle_pause(), RunState::Running);
    }

    #[test]
    fn gravity_waits_for_the_interval() {
        let mut g = game();
        let mut frames = Frames::default();
        g.start();
        place(&mut g, PieceKind::O, 0, 5);

        g.tick(Duration::from_millis(600), &mut frames).unwrap();
        assert_eq!(g.piece.as_ref().unwrap().pos.row, 0);
        g.tick(Duration::from_millis(400), &mut frames).unwrap();
        // Exactly at the interval is not past it.
        assert_eq!(g.piece.as_ref().unwrap().pos.row, 0);
        g.tick(Duration::from_millis(1), &mut frames).unwrap();
        assert_eq!(g.piece.as_ref().unwrap().pos.row, 1);
        assert_eq!(g.drop_counter, Duration::ZERO);
        assert_eq!(frames.count, 3);
    }

    #[test]
    fn paused_and_idle_ticks_render_without_gravity() {
        let mut g = game();
        let mut frames = Frames::default();
        g.tick(Duration::from_secs(5), &mut frames).unwrap();
        assert_eq!(frames.last, Some((RunState::Idle, 0)));

        g.start();
        place(&mut g, PieceKind::T, 3, 4);
        g.toggle_pause();
        g.tick(Duration::from_secs(5), &mut frames).unwrap();
        assert_eq!(g.piece.as_ref().unwrap().pos, Position::new(3, 4));
        assert_eq!(frames.last, Some((RunState::Paused, 0)));

        // Resuming does not dump the paused time into the clock.
        g.toggle_pause();
        g.tick(Duration::from_millis(10), &mut frames).unwrap();
        assert_eq!(g.piece.as_ref().unwrap().pos.row, 3);
        assert_eq!(frames.count, 3);
    }

    #[test]
    fn manual_soft_drop_restarts_the_clock() {
        let mut g = game();
        let mut frames = Frames::default();
        g.start();
        place(&mut g, PieceKind::O, 0, 5);
        g.tick(Duration::from_millis(900), &mut frames).unwrap();
        assert!(g.apply(Command::SoftDrop));
        g.tick(Duration::from_millis(900), &mut frames).unwrap();
        assert_eq!(g.piece.as_ref().unwrap().pos.row, 1);
    }

    #[test]
    fn o_piece_settles_on_the_floor_at_row_18() {
        let mut g = game();
        g.start();
        place(&mut g, PieceKind::O, 0, 5);
        for _ in 0..18 {
            g.soft_drop();
        }
        assert_eq!(g.piece.as_ref().unwrap().pos, Position::new(18, 5));
        g.soft_drop();
        for col in 5..7 {
            for row in 18..20 {
                assert_eq!(g.grid.cell_at(row, col).unwrap(), Cell::Block(PieceKind::O));
            }
        }
        assert_eq!(g.piece.as_ref().unwrap().pos.row, 0);
        assert_eq!(g.score(), 0);
    }

    #[test]
    fn i_piece_completes_the_bottom_row_for_ten_points() {
        let mut g = game();
        g.start();
        for col in 1..12 {
            g.grid.set_cell(19, col, Cell::Block(PieceKind::Z)).unwrap();
        }
        // Vertical I lives in local column 1: anchor -1 puts it in grid column 0.
        place(&mut g, PieceKind::I, 16, -1);
        g.drain_events().for_each(drop);

        g.soft_drop();

        assert_eq!(g.score(), 10);
        assert_eq!(g.lines(), 1);
        let events: Vec<_> = g.drain_events().collect();
        assert!(events.contains(&GameEvent::LinesCleared { rows: 1, points: 10 }));
        assert!(events.contains(&GameEvent::ScoreChanged(10)));
        // The three upper I blocks dropped by one row into column 0.
        for row in 17..20 {
            assert_eq!(g.grid.cell_at(row, 0).unwrap(), Cell::Block(PieceKind::I));
        }
        assert_eq!(g.grid.cell_at(16, 0).unwrap(), Cell::Empty);
        assert_eq!(g.grid.cell_at(19, 1).unwrap(), Cell::Empty);
    }

    #[test]
    fn four_rows_at_once_score_150() {
        let mut g = game();
        g.start();
        for row in 16..20 {
            for col in 1..12 {
                g.grid.set_cell(row, col, Cell::Block(PieceKind::L)).unwrap();
            }
        }
        place(&mut g, PieceKind::I, 16, -1);
        g.soft_drop();
        assert_eq!(g.score(), 150);
        assert!(g.grid.is_empty());
    }

    #[test]
    fn blocked_spawn_is_game_over() {
        let mut g = game();
        g.start();
        g.score.record_sweep(2);
        for col in 3..9 {
            g.grid.set_cell(0, col, Cell::Block(PieceKind::S)).unwrap();
            g.grid.set_cell(1, col, Cell::Block(PieceKind::S)).unwrap();
        }
        g.drain_events().for_each(drop);

        assert!(g.apply(Command::Respawn));

        assert_eq!(g.run_state(), RunState::GameOver);
        assert!(g.grid.is_empty());
        assert_eq!(g.score(), 0);
        assert!(g.piece.is_none());
        let events: Vec<_> = g.drain_events().collect();
        assert_eq!(
            events,
            vec![
                GameEvent::GameOver { final_score: 30 },
                GameEvent::ScoreChanged(0),
                GameEvent::RunStateChanged(RunState::GameOver),
            ]
        );

        // No gravity and no commands until restarted.
        assert!(!g.apply(Command::MoveLeft));
        assert_eq!(g.toggle_pause(), RunState::GameOver);
        g.start();
        assert_eq!(g.run_state(), RunState::Running);
        assert!(g.piece.is_some());
    }

    #[test]
    fn sessions_are_independent() {
        let mut a = game();
        let b = game();
        a.start();
        a.grid.set_cell(19, 0, Cell::Block(PieceKind::J)).unwrap();
        assert!(b.grid.is_empty());
        assert_eq!(b.run_state(), RunState::Idle);
    }
}
