//! Falling-block puzzle engine
//!
//! Pure game rules: the board, the piece catalog, collision, line clears,
//! scoring and the state machine that ties them together. Rendering and
//! input live in the `blockfall` binary.

pub mod board;
pub mod game;
pub mod piece;
pub mod randomizer;
pub mod score;
pub mod tetromino;
