//! Tetromino definitions and shapes
//!
//! The 7 pieces are stored as rectangular 0/1 occupancy matrices. Rotation is
//! a pure matrix transform that always produces a new shape.

use ratatui::style::Color;
use std::fmt;

/// The 7 tetromino types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TetrominoType {
    I, // long bar
    O, // square
    T,
    S,
    Z,
    J,
    L,
}

impl TetrominoType {
    /// Get the color for this tetromino
    pub fn color(&self) -> Color {
        match self {
            TetrominoType::I => Color::Rgb(0x00, 0xc8, 0xf8),
            TetrominoType::O => Color::Rgb(0xff, 0xd5, 0x00),
            TetrominoType::T => Color::Rgb(0xe4, 0x00, 0x7f),
            TetrominoType::S => Color::Rgb(0x2a, 0xb2, 0x00),
            TetrominoType::Z => Color::Rgb(0xe6, 0x00, 0x12),
            TetrominoType::J => Color::Rgb(0x0f, 0x4b, 0xa6),
            TetrominoType::L => Color::Rgb(0xd8, 0x5f, 0x00),
        }
    }

    /// All tetromino types, in catalog order
    pub fn all() -> [TetrominoType; 7] {
        [
            TetrominoType::I,
            TetrominoType::O,
            TetrominoType::T,
            TetrominoType::S,
            TetrominoType::Z,
            TetrominoType::J,
            TetrominoType::L,
        ]
    }

    /// Single-letter name used in logs and the UI
    pub fn name(&self) -> &'static str {
        match self {
            TetrominoType::I => "I",
            TetrominoType::O => "O",
            TetrominoType::T => "T",
            TetrominoType::S => "S",
            TetrominoType::Z => "Z",
            TetrominoType::J => "J",
            TetrominoType::L => "L",
        }
    }

    fn base_rows(&self) -> &'static [&'static [u8]] {
        match self {
            TetrominoType::I => &[&[1, 1, 1, 1]],
            TetrominoType::O => &[&[1, 1], &[1, 1]],
            TetrominoType::T => &[&[1, 1, 1], &[0, 1, 0]],
            TetrominoType::S => &[&[0, 1, 1], &[1, 1, 0]],
            TetrominoType::Z => &[&[1, 1, 0], &[0, 1, 1]],
            TetrominoType::J => &[&[1, 0, 0], &[1, 1, 1]],
            TetrominoType::L => &[&[0, 0, 1], &[1, 1, 1]],
        }
    }

    /// Get a fresh copy of the spawn-orientation shape
    pub fn shape(&self) -> Shape {
        let rows = self.base_rows();
        let width = rows[0].len();
        Shape {
            width,
            height: rows.len(),
            cells: rows.iter().flat_map(|row| row.iter().map(|&v| v != 0)).collect(),
        }
    }
}

impl fmt::Display for TetrominoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Reasons a matrix cannot be turned into a [`Shape`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    Empty,
    Ragged { row: usize, expected: usize, found: usize },
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeError::Empty => write!(f, "shape has no rows or columns"),
            ShapeError::Ragged { row, expected, found } => write!(
                f,
                "shape row {} has {} columns, expected {}",
                row, found, expected
            ),
        }
    }
}

impl std::error::Error for ShapeError {}

/// A rectangular occupancy matrix, stored row-major with row 0 on top
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl Shape {
    /// Build a shape from rows of 0/1 values. Every row must have the same length.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, ShapeError> {
        let width = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        if width == 0 {
            return Err(ShapeError::Empty);
        }

        let mut cells = Vec::with_capacity(width * rows.len());
        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != width {
                return Err(ShapeError::Ragged {
                    row,
                    expected: width,
                    found: values.len(),
                });
            }
            cells.extend(values.iter().map(|&v| v != 0));
        }

        Ok(Self {
            width,
            height: rows.len(),
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether the cell at (row, col) is occupied. Out of range is empty.
    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.width && self.cells[row * self.width + col]
    }

    /// Iterate over the (row, col) offsets of every occupied cell
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, filled)| **filled)
            .map(move |(i, _)| (i / width, i % width))
    }

    /// Rotate 90° clockwise. Source (y, x) lands on (x, height - 1 - y), so the
    /// result has the transposed dimensions.
    pub fn rotated(&self) -> Shape {
        let new_width = self.height;
        let new_height = self.width;
        let mut cells = vec![false; self.cells.len()];

        for (y, x) in self.cells() {
            cells[x * new_width + (self.height - 1 - y)] = true;
        }

        Shape {
            width: new_width,
            height: new_height,
            cells,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_piece_has_four_blocks() {
        for piece in TetrominoType::all() {
            assert_eq!(piece.shape().cells().count(), 4, "{}", piece);
        }
    }

    #[test]
    fn test_rotate_transposes_dimensions() {
        let shape = TetrominoType::I.shape();
        assert_eq!((shape.width(), shape.height()), (4, 1));
        let rotated = shape.rotated();
        assert_eq!((rotated.width(), rotated.height()), (1, 4));
    }

    #[test]
    fn test_rotate_is_clockwise() {
        // J:  100      rotated:  11
        //     111                10
        //                        10
        let rotated = TetrominoType::J.shape().rotated();
        let expected = Shape::from_rows(&[[1u8, 1], [1, 0], [1, 0]]).unwrap();
        assert_eq!(rotated, expected);
    }

    #[test]
    fn test_four_rotations_return_original() {
        for piece in TetrominoType::all() {
            let shape = piece.shape();
            let spun = shape.rotated().rotated().rotated().rotated();
            assert_eq!(spun, shape, "{}", piece);
        }

        let odd = Shape::from_rows(&[[1u8, 0, 0, 1, 1], [0, 1, 1, 0, 0], [1, 1, 0, 0, 1]]).unwrap();
        assert_eq!(odd.rotated().rotated().rotated().rotated(), odd);
    }

    #[test]
    fn test_is_filled() {
        let shape = TetrominoType::T.shape();
        assert!(shape.is_filled(0, 0));
        assert!(!shape.is_filled(1, 0));
        assert!(shape.is_filled(1, 1));
        assert!(!shape.is_filled(2, 1));
        assert!(!shape.is_filled(0, 3));
    }

    #[test]
    fn test_o_rotation_is_symmetric() {
        let shape = TetrominoType::O.shape();
        assert_eq!(shape.rotated(), shape);
    }

    #[test]
    fn test_rotation_leaves_source_untouched() {
        let shape = TetrominoType::T.shape();
        let before = shape.clone();
        let _ = shape.rotated();
        assert_eq!(shape, before);
        assert_eq!(TetrominoType::T.shape(), before);
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let rows: [&[u8]; 2] = [&[1, 1], &[1]];
        assert_eq!(
            Shape::from_rows(&rows),
            Err(ShapeError::Ragged {
                row: 1,
                expected: 2,
                found: 1
            })
        );
        let empty: [&[u8]; 0] = [];
        assert_eq!(Shape::from_rows(&empty), Err(ShapeError::Empty));
    }
}
