//! Core game state and logic
//!
//! [`GameState`] is a plain value: every transition borrows the current state
//! and returns a [`Step`] holding the next state and the events it produced.
//! [`Game`] owns the current state, the piece source and the gravity clock.

use crate::board::{Board, Cell};
use crate::piece::ActivePiece;
use crate::randomizer::{PieceSource, UniformRandomizer};
use crate::score::Stats;
use crate::tetromino::TetrominoType;
use ratatui::style::Color;
use std::time::Duration;
use tracing::{debug, info, trace};

/// Color used to draw the landing preview
pub const GHOST_COLOR: Color = Color::Rgb(0x5f, 0xb0, 0xff);

/// Size of the next-piece preview box
pub const PREVIEW_SIZE: usize = 4;

/// Game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    #[default]
    Running,
    Paused,
    GameOver,
}

impl GamePhase {
    pub fn name(&self) -> &'static str {
        match self {
            GamePhase::Running => "Running",
            GamePhase::Paused => "Paused",
            GamePhase::GameOver => "Game Over",
        }
    }
}

/// Input commands the game can process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    Rotate,
    TogglePause,
    Reset,
}

/// Observable effects of a transition, for the front-end to react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Spawned(TetrominoType),
    Locked(TetrominoType),
    LinesCleared { lines: usize, points: u64 },
    LevelUp(u32),
    Paused,
    Resumed,
    GameOver,
    Reset,
}

/// The result of one transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub state: GameState,
    pub events: Vec<GameEvent>,
}

impl Step {
    fn unchanged(state: &GameState) -> Self {
        Self {
            state: state.clone(),
            events: Vec::new(),
        }
    }
}

/// A complete snapshot of one game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    /// Locked cells only; the active piece is never written here until it locks
    board: Board,
    /// Current falling piece, None once the game is over
    active: Option<ActivePiece>,
    /// Piece that spawns after the active one locks
    next: TetrominoType,
    stats: Stats,
    phase: GamePhase,
}

impl GameState {
    /// Start a fresh game on a standard empty board
    pub fn new(source: &mut dyn PieceSource) -> Self {
        Self::with_board(Board::new(), source)
    }

    /// Start a fresh game on an empty board of a custom size
    pub fn with_board(board: Board, source: &mut dyn PieceSource) -> Self {
        let active = ActivePiece::spawn(source.next_piece(), board.width());
        let next = source.next_piece();
        Self {
            board,
            active: Some(active),
            next,
            stats: Stats::new(),
            phase: GamePhase::Running,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> Option<&ActivePiece> {
        self.active.as_ref()
    }

    pub fn next(&self) -> TetrominoType {
        self.next
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Current gravity period
    pub fn gravity_interval(&self) -> Duration {
        self.stats.fall_interval()
    }

    /// Apply a command
    pub fn apply(&self, command: Command, source: &mut dyn PieceSource) -> Step {
        match command {
            Command::MoveLeft => self.try_move(-1, 0, source),
            Command::MoveRight => self.try_move(1, 0, source),
            Command::SoftDrop => self.try_move(0, 1, source),
            Command::HardDrop => self.hard_drop(source),
            Command::Rotate => self.rotate(),
            Command::TogglePause => self.toggle_pause(),
            Command::Reset => self.reset(source),
        }
    }

    /// One gravity step
    pub fn tick(&self, source: &mut dyn PieceSource) -> Step {
        self.try_move(0, 1, source)
    }

    /// Move the active piece by (dx, dy). A blocked downward move locks the piece;
    /// any other blocked move is dropped.
    pub fn try_move(&self, dx: i32, dy: i32, source: &mut dyn PieceSource) -> Step {
        let Some(piece) = self.playable_piece() else {
            return Step::unchanged(self);
        };

        let moved = piece.shifted(dx, dy);
        if moved.fits(&self.board) {
            trace!(piece = %moved.kind, x = moved.x, y = moved.y, "moved");
            return Step {
                state: Self {
                    active: Some(moved),
                    ..self.clone()
                },
                events: Vec::new(),
            };
        }

        if dy == 1 {
            self.lock(piece, source)
        } else {
            Step::unchanged(self)
        }
    }

    /// Drop the active piece to its resting row and lock it there
    pub fn hard_drop(&self, source: &mut dyn PieceSource) -> Step {
        let Some(piece) = self.playable_piece() else {
            return Step::unchanged(self);
        };
        let landed = piece.ghost(&self.board);
        trace!(piece = %landed.kind, distance = landed.y - piece.y, "hard drop");
        self.lock(&landed, source)
    }

    /// Rotate the active piece clockwise with wall kicks. Never locks.
    pub fn rotate(&self) -> Step {
        let Some(piece) = self.playable_piece() else {
            return Step::unchanged(self);
        };
        match piece.rotated(&self.board) {
            Some(rotated) => {
                trace!(piece = %rotated.kind, kick = rotated.x - piece.x, "rotated");
                Step {
                    state: Self {
                        active: Some(rotated),
                        ..self.clone()
                    },
                    events: Vec::new(),
                }
            }
            None => Step::unchanged(self),
        }
    }

    /// Pause a running game or resume a paused one. Does nothing after game over.
    pub fn toggle_pause(&self) -> Step {
        let (phase, event) = match self.phase {
            GamePhase::Running => (GamePhase::Paused, GameEvent::Paused),
            GamePhase::Paused => (GamePhase::Running, GameEvent::Resumed),
            GamePhase::GameOver => return Step::unchanged(self),
        };
        debug!(phase = phase.name(), "pause toggled");
        Step {
            state: Self {
                phase,
                ..self.clone()
            },
            events: vec![event],
        }
    }

    /// Throw everything away and start over, from any phase
    pub fn reset(&self, source: &mut dyn PieceSource) -> Step {
        let board = Board::with_size(self.board.height(), self.board.width());
        let state = Self::with_board(board, source);
        let events = state
            .active
            .as_ref()
            .map(|piece| vec![GameEvent::Reset, GameEvent::Spawned(piece.kind)])
            .unwrap_or_else(|| vec![GameEvent::Reset]);
        info!(next = %state.next, "game reset");
        Step { state, events }
    }

    /// Board with the ghost and the active piece drawn in, for rendering
    pub fn painted_board(&self, show_ghost: bool) -> Board {
        let mut grid = self.board.clone();
        let Some(piece) = &self.active else {
            return grid;
        };

        if show_ghost {
            let ghost = piece.ghost(&self.board);
            for (row, col) in ghost.block_positions() {
                if grid.get(row, col).is_some_and(|cell| cell.is_empty()) {
                    grid.set(row, col, Cell::Ghost(GHOST_COLOR));
                }
            }
        }

        let color = piece.kind.color();
        for (row, col) in piece.block_positions() {
            grid.set(row, col, Cell::Filled(color));
        }
        grid
    }

    /// The next piece drawn into a fixed 4x4 box, anchored top-left
    pub fn next_preview(&self) -> [[Option<Color>; PREVIEW_SIZE]; PREVIEW_SIZE] {
        let shape = self.next.shape();
        let color = self.next.color();
        let mut grid = [[None; PREVIEW_SIZE]; PREVIEW_SIZE];
        for (row, line) in grid.iter_mut().enumerate() {
            for (col, cell) in line.iter_mut().enumerate() {
                if shape.is_filled(row, col) {
                    *cell = Some(color);
                }
            }
        }
        grid
    }

    fn playable_piece(&self) -> Option<&ActivePiece> {
        match self.phase {
            GamePhase::Running => self.active.as_ref(),
            GamePhase::Paused | GamePhase::GameOver => None,
        }
    }

    /// Lock `piece`, clear lines, score, then spawn the next piece
    fn lock(&self, piece: &ActivePiece, source: &mut dyn PieceSource) -> Step {
        debug_assert!(piece.fits(&self.board), "locking at an illegal position");

        let mut events = vec![GameEvent::Locked(piece.kind)];
        let merged = self.board.place_piece(piece);
        let (board, cleared) = merged.clear_lines();
        let (stats, points) = self.stats.with_clear(cleared);

        debug!(piece = %piece.kind, x = piece.x, y = piece.y, cleared, "piece locked");
        if cleared > 0 {
            events.push(GameEvent::LinesCleared {
                lines: cleared,
                points,
            });
            info!(cleared, points, score = stats.score, lines = stats.lines, "lines cleared");
        }
        if stats.level > self.stats.level {
            events.push(GameEvent::LevelUp(stats.level));
            info!(level = stats.level, "level up");
        }

        let mut state = Self {
            board,
            active: None,
            next: self.next,
            stats,
            phase: self.phase,
        };
        state.spawn(source, &mut events);
        Step { state, events }
    }

    /// Bring in the pending piece, or end the game if its spawn spot is taken
    fn spawn(&mut self, source: &mut dyn PieceSource, events: &mut Vec<GameEvent>) {
        let piece = ActivePiece::spawn(self.next, self.board.width());
        if !piece.fits(&self.board) {
            info!(piece = %piece.kind, score = self.stats.score, lines = self.stats.lines, "game over");
            self.active = None;
            self.phase = GamePhase::GameOver;
            events.push(GameEvent::GameOver);
            return;
        }

        debug!(piece = %piece.kind, x = piece.x, "spawned");
        events.push(GameEvent::Spawned(piece.kind));
        self.active = Some(piece);
        self.next = source.next_piece();
    }
}

/// The main game struct: owns the current state and drives gravity
pub struct Game {
    state: GameState,
    source: Box<dyn PieceSource>,
    /// Time accumulated toward the next gravity tick
    fall_timer: Duration,
}

impl Game {
    /// Create a new game with a random seed
    pub fn new() -> Self {
        Self::with_source(UniformRandomizer::new())
    }

    /// Create a new game whose piece sequence is fixed by `seed`
    pub fn with_seed(seed: u64) -> Self {
        Self::with_source(UniformRandomizer::with_seed(seed))
    }

    /// Create a new game drawing pieces from `source`
    pub fn with_source(source: impl PieceSource + 'static) -> Self {
        let mut source: Box<dyn PieceSource> = Box::new(source);
        let state = GameState::new(&mut *source);
        Self {
            state,
            source,
            fall_timer: Duration::ZERO,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Process a command and return what happened
    pub fn apply(&mut self, command: Command) -> Vec<GameEvent> {
        let step = self.state.apply(command, &mut *self.source);
        self.commit(step)
    }

    /// Feed elapsed wall-clock time. Runs one gravity tick per elapsed period
    /// while the game is running. Moves and rotations do not delay gravity.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.state.phase != GamePhase::Running {
            return events;
        }

        self.fall_timer += elapsed;
        loop {
            let interval = self.state.gravity_interval();
            if self.fall_timer < interval {
                break;
            }
            self.fall_timer -= interval;
            let step = self.state.tick(&mut *self.source);
            events.extend(self.commit(step));
            if self.state.phase != GamePhase::Running {
                break;
            }
        }
        events
    }

    pub fn move_left(&mut self) -> Vec<GameEvent> {
        self.apply(Command::MoveLeft)
    }

    pub fn move_right(&mut self) -> Vec<GameEvent> {
        self.apply(Command::MoveRight)
    }

    pub fn soft_drop(&mut self) -> Vec<GameEvent> {
        self.apply(Command::SoftDrop)
    }

    pub fn hard_drop(&mut self) -> Vec<GameEvent> {
        self.apply(Command::HardDrop)
    }

    pub fn rotate(&mut self) -> Vec<GameEvent> {
        self.apply(Command::Rotate)
    }

    pub fn toggle_pause(&mut self) -> Vec<GameEvent> {
        self.apply(Command::TogglePause)
    }

    pub fn reset(&mut self) -> Vec<GameEvent> {
        self.apply(Command::Reset)
    }

    /// Time left until the next gravity tick, None when gravity is stopped
    pub fn until_next_tick(&self) -> Option<Duration> {
        match self.state.phase {
            GamePhase::Running => Some(self.state.gravity_interval().saturating_sub(self.fall_timer)),
            GamePhase::Paused | GamePhase::GameOver => None,
        }
    }

    fn commit(&mut self, step: Step) -> Vec<GameEvent> {
        // A new piece, a resume or a reset each start a full gravity period, and
        // pausing drops any partial one.
        let restart_clock = step.events.iter().any(|event| {
            matches!(
                event,
                GameEvent::Spawned(_) | GameEvent::Paused | GameEvent::Resumed | GameEvent::Reset
            )
        });
        if restart_clock {
            self.fall_timer = Duration::ZERO;
        }
        self.state = step.state;
        step.events
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
