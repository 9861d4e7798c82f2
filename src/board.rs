//! Game board representation and collision detection

use crate::piece::ActivePiece;
use crate::tetromino::Shape;
use ratatui::style::Color;

/// Standard board dimensions
pub const BOARD_WIDTH: usize = 10;
pub const BOARD_HEIGHT: usize = 20;

/// A cell on the board - either empty or filled with a color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled(Color),
    /// Landing preview. Only ever produced for rendering, never part of game state.
    Ghost(Color),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        !self.is_filled()
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, Cell::Filled(_))
    }

    pub fn is_ghost(&self) -> bool {
        matches!(self, Cell::Ghost(_))
    }
}

/// The game board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    /// Grid stored row-major, row 0 is the top (spawn) row
    cells: Vec<Cell>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create a new empty board of the standard size
    pub fn new() -> Self {
        Self::with_size(BOARD_HEIGHT, BOARD_WIDTH)
    }

    /// Create an empty board with the given dimensions
    pub fn with_size(height: usize, width: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::Empty; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Get the cell at a position (row, col)
    /// Returns None if out of bounds
    pub fn get(&self, row: i32, col: i32) -> Option<Cell> {
        self.index(row, col).map(|i| self.cells[i])
    }

    /// Set a cell at a position
    /// Returns false if out of bounds
    pub fn set(&mut self, row: i32, col: i32, cell: Cell) -> bool {
        match self.index(row, col) {
            Some(i) => {
                self.cells[i] = cell;
                true
            }
            None => false,
        }
    }

    fn index(&self, row: i32, col: i32) -> Option<usize> {
        if row < 0 || col < 0 {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        if row >= self.height || col >= self.width {
            return None;
        }
        Some(row * self.width + col)
    }

    /// Check whether `shape` with its top-left corner at (x, y) fits on the board.
    ///
    /// Cells left or right of the board and cells below the floor are illegal,
    /// as are cells overlapping a filled cell. Rows above the top (negative y)
    /// are always allowed, so a piece can spawn or rotate partly off-screen.
    pub fn can_place(&self, shape: &Shape, x: i32, y: i32) -> bool {
        shape.cells().all(|(dy, dx)| {
            let col = x + dx as i32;
            let row = y + dy as i32;
            if col < 0 || col >= self.width as i32 || row >= self.height as i32 {
                return false;
            }
            row < 0 || !self.cells[row as usize * self.width + col as usize].is_filled()
        })
    }

    /// Return a copy of the board with `piece` written into it.
    /// Cells above the visible board are dropped.
    pub fn place_piece(&self, piece: &ActivePiece) -> Board {
        let mut board = self.clone();
        let color = piece.kind.color();
        for (row, col) in piece.block_positions() {
            board.set(row, col, Cell::Filled(color));
        }
        board
    }

    /// Remove completed lines, returning the new board and the number cleared.
    /// The top is padded with empty rows so the height never changes.
    pub fn clear_lines(&self) -> (Board, usize) {
        let kept: Vec<&[Cell]> = self
            .rows()
            .filter(|row| !row.iter().all(Cell::is_filled))
            .collect();
        let cleared = self.height - kept.len();

        let mut cells = vec![Cell::Empty; cleared * self.width];
        for row in kept {
            cells.extend_from_slice(row);
        }

        let board = Board {
            width: self.width,
            height: self.height,
            cells,
        };
        (board, cleared)
    }

    /// Iterate over rows, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        (0..self.height).map(move |row| &self.cells[row * self.width..(row + 1) * self.width])
    }

    /// Check if the board is completely empty
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|cell| !cell.is_filled())
    }
}
