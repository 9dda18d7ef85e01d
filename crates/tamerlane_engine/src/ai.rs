use std::time::Instant;

use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;

use tamerlane_core::{Game, Turn};

use crate::search::{self, SearchError};

const MIN_DEPTH: u8 = 1;
const MAX_DEPTH: u8 = 10;
const DEFAULT_DEPTH: u8 = 2;

/// The engine facade handed to the orchestration layer: a clamped search
/// depth plus an owned random generator for tie-breaking. Seed it for
/// reproducible games; a fresh engine otherwise draws entropy once.
#[derive(Debug, Clone)]
pub struct TamerlaneAI {
    depth: u8,
    rng: StdRng,
}

impl TamerlaneAI {
    pub fn new(depth: u8) -> Self {
        Self {
            depth: depth.clamp(MIN_DEPTH, MAX_DEPTH),
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic engine: the same seed, position, and depth always
    /// yield the same move.
    pub fn with_seed(depth: u8, seed: u64) -> Self {
        Self {
            depth: depth.clamp(MIN_DEPTH, MAX_DEPTH),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn set_depth(&mut self, depth: u8) {
        self.depth = depth.clamp(MIN_DEPTH, MAX_DEPTH);
    }

    /// Searches the game's current position for the side to move. The
    /// game itself is untouched; the search runs on a board copy and the
    /// chosen turn is returned for the caller to commit.
    pub fn choose_move(&mut self, game: &Game) -> Result<Turn, SearchError> {
        let mut board = *game.board();
        let start = Instant::now();
        let turn = search::minmax(
            &mut board,
            game.side_to_move(),
            game.turn_number(),
            game.alt(),
            self.depth,
            f32::NEG_INFINITY,
            f32::INFINITY,
            &mut self.rng,
        )?;
        debug!(
            "chose {} -> {} (score {:.2}) in {:?}",
            turn.from,
            turn.to,
            turn.score,
            start.elapsed()
        );
        Ok(turn)
    }
}

impl Default for TamerlaneAI {
    fn default() -> Self {
        Self::new(DEFAULT_DEPTH)
    }
}
