//! Active falling piece logic

use crate::board::Board;
use crate::tetromino::{Shape, TetrominoType};

/// Horizontal offsets tried, in order, when a rotation does not fit in place
pub const WALL_KICKS: [i32; 5] = [0, -1, 1, -2, 2];

/// An active falling piece
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivePiece {
    /// The type of tetromino
    pub kind: TetrominoType,
    /// Current occupancy matrix, after any rotations
    pub shape: Shape,
    /// Board column of the matrix's left edge
    pub x: i32,
    /// Board row of the matrix's top edge, row 0 is the top of the board
    pub y: i32,
}

impl ActivePiece {
    /// Create a piece in spawn orientation, centered horizontally on row 0
    pub fn spawn(kind: TetrominoType, board_width: usize) -> Self {
        let shape = kind.shape();
        let x = spawn_column(board_width, shape.width());
        Self {
            kind,
            shape,
            x,
            y: 0,
        }
    }

    /// Get the absolute (row, col) positions of all occupied cells
    pub fn block_positions(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .cells()
            .map(move |(dy, dx)| (self.y + dy as i32, self.x + dx as i32))
    }

    /// Whether this piece fits on `board` where it stands
    pub fn fits(&self, board: &Board) -> bool {
        board.can_place(&self.shape, self.x, self.y)
    }

    /// A copy of this piece shifted by (dx, dy)
    pub fn shifted(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self.clone()
        }
    }

    /// Try to rotate clockwise, kicking sideways through [`WALL_KICKS`].
    /// Returns None when no offset fits; the row never changes.
    pub fn rotated(&self, board: &Board) -> Option<Self> {
        let shape = self.shape.rotated();
        let x = WALL_KICKS
            .iter()
            .map(|dx| self.x + dx)
            .find(|&x| board.can_place(&shape, x, self.y))?;
        Some(Self {
            kind: self.kind,
            shape,
            x,
            y: self.y,
        })
    }

    /// Get the ghost piece (where the piece would land on a hard drop)
    pub fn ghost(&self, board: &Board) -> Self {
        let mut ghost_row = self.y;
        while board.can_place(&self.shape, self.x, ghost_row + 1) {
            ghost_row += 1;
        }
        Self {
            y: ghost_row,
            ..self.clone()
        }
    }
}

/// Spawn column for a shape: floor(board / 2) - ceil(shape / 2)
pub fn spawn_column(board_width: usize, shape_width: usize) -> i32 {
    (board_width / 2) as i32 - shape_width.div_ceil(2) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Cell, BOARD_WIDTH};
    use ratatui::style::Color;

    #[test]
    fn test_spawn_position() {
        let piece = ActivePiece::spawn(TetrominoType::I, BOARD_WIDTH);
        assert_eq!((piece.x, piece.y), (3, 0));
        let piece = ActivePiece::spawn(TetrominoType::T, BOARD_WIDTH);
        // floor(10 / 2) - ceil(3 / 2) = 3
        assert_eq!((piece.x, piece.y), (3, 0));
        let piece = ActivePiece::spawn(TetrominoType::O, BOARD_WIDTH);
        assert_eq!((piece.x, piece.y), (4, 0));
    }

    #[test]
    fn test_block_positions() {
        let piece = ActivePiece::spawn(TetrominoType::T, BOARD_WIDTH);
        let positions: Vec<_> = piece.block_positions().collect();
        assert_eq!(positions, vec![(0, 3), (0, 4), (0, 5), (1, 4)]);
    }

    #[test]
    fn test_shifted_leaves_original() {
        let piece = ActivePiece::spawn(TetrominoType::S, BOARD_WIDTH);
        let moved = piece.shifted(-1, 2);
        assert_eq!((moved.x, moved.y), (piece.x - 1, piece.y + 2));
        assert_eq!(moved.shape, piece.shape);
    }

    #[test]
    fn test_ghost_lands_on_floor() {
        let board = Board::new();
        let piece = ActivePiece::spawn(TetrominoType::I, BOARD_WIDTH);
        let ghost = piece.ghost(&board);
        assert_eq!(ghost.y, 19);
        assert_eq!(ghost.x, piece.x);
    }

    #[test]
    fn test_ghost_lands_on_stack() {
        let mut board = Board::new();
        board.set(15, 4, Cell::Filled(Color::Red));
        let piece = ActivePiece::spawn(TetrominoType::O, BOARD_WIDTH);
        assert_eq!(piece.ghost(&board).y, 13);
    }

    #[test]
    fn test_ghost_is_idempotent() {
        let mut board = Board::new();
        board.set(12, 5, Cell::Filled(Color::Red));
        for kind in TetrominoType::all() {
            let piece = ActivePiece::spawn(kind, BOARD_WIDTH);
            let ghost = piece.ghost(&board);
            assert_eq!(ghost.ghost(&board), ghost, "{}", kind);
        }
    }

    #[test]
    fn test_rotate_in_open_space_does_not_kick() {
        let board = Board::new();
        let piece = ActivePiece::spawn(TetrominoType::T, BOARD_WIDTH).shifted(0, 5);
        let rotated = piece.rotated(&board).unwrap();
        assert_eq!((rotated.x, rotated.y), (piece.x, piece.y));
        assert_eq!(rotated.shape, piece.shape.rotated());
    }

    #[test]
    fn test_rotate_kicks_off_right_wall() {
        let board = Board::new();
        // Vertical I at x = 8; lying flat only fits two columns to the left
        let mut piece = ActivePiece::spawn(TetrominoType::I, BOARD_WIDTH);
        piece.shape = piece.shape.rotated();
        piece.x = 8;
        piece.y = 5;
        let rotated = piece.rotated(&board).unwrap();
        assert_eq!(rotated.x, 6);
        assert_eq!(rotated.y, 5);
    }

    #[test]
    fn test_rotate_prefers_left_kick() {
        let mut board = Board::new();
        // Block the unkicked spot so both -1 and +1 would fit; -1 is tried first
        let piece = ActivePiece::spawn(TetrominoType::T, BOARD_WIDTH).shifted(0, 10);
        board.set(piece.y + 2, piece.x + 1, Cell::Filled(Color::Red));
        let rotated = piece.rotated(&board).unwrap();
        assert_eq!(rotated.x, piece.x - 1);
    }

    #[test]
    fn test_rotate_prefers_right_kick_over_double_left() {
        let mut board = Board::new();
        // Rotated T covers (y, x+1), (y+1, x..=x+1), (y+2, x+1). Filling (y+1, x)
        // rules out the 0 and -1 offsets while +1 and -2 both stay open.
        let piece = ActivePiece::spawn(TetrominoType::T, BOARD_WIDTH).shifted(0, 10);
        board.set(piece.y + 1, piece.x, Cell::Filled(Color::Red));
        assert!(piece.fits(&board));
        let rotated = piece.rotated(&board).unwrap();
        assert_eq!(rotated.x, piece.x + 1);
        assert_eq!(rotated.y, piece.y);
    }

    #[test]
    fn test_rotate_rejected_when_boxed_in() {
        let mut board = Board::new();
        for row in 0..board.height() as i32 {
            for col in 0..board.width() as i32 {
                if !(10..12).contains(&row) || !(3..7).contains(&col) {
                    board.set(row, col, Cell::Filled(Color::Red));
                }
            }
        }
        let piece = ActivePiece::spawn(TetrominoType::I, BOARD_WIDTH).shifted(0, 10);
        assert!(piece.fits(&board));
        assert_eq!(piece.rotated(&board), None);
    }
}
