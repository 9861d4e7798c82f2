//! Uniform random piece generation
//!
//! Every piece is drawn independently with equal probability, so repeats and
//! droughts are possible. The source is injected into the game so tests can
//! script exact sequences.

use crate::tetromino::TetrominoType;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;

/// Something that can hand out the next piece type
pub trait PieceSource {
    fn next_piece(&mut self) -> TetrominoType;
}

/// Seedable uniform randomizer
#[derive(Debug, Clone)]
pub struct UniformRandomizer {
    rng: ChaCha8Rng,
}

impl UniformRandomizer {
    /// Create a randomizer with a random seed
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    /// Create a randomizer that always produces the same sequence for `seed`
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Default for UniformRandomizer {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceSource for UniformRandomizer {
    fn next_piece(&mut self) -> TetrominoType {
        let all = TetrominoType::all();
        all[self.rng.gen_range(0..all.len())]
    }
}

/// Replays a fixed list of pieces, cycling when it runs out
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    queue: VecDeque<TetrominoType>,
}

impl ScriptedSource {
    /// Panics if `pieces` is empty
    pub fn new(pieces: impl IntoIterator<Item = TetrominoType>) -> Self {
        let queue: VecDeque<_> = pieces.into_iter().collect();
        assert!(!queue.is_empty(), "scripted source needs at least one piece");
        Self { queue }
    }
}

impl PieceSource for ScriptedSource {
    fn next_piece(&mut self) -> TetrominoType {
        let piece = self.queue[0];
        self.queue.rotate_left(1);
        piece
    }
}
