#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use analysis::*;
pub use board::*;
pub use cascade::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use matcher::*;
pub use source::*;
pub use token::*;
pub use types::*;

mod analysis;
mod board;
mod cascade;
mod engine;
mod error;
mod generator;
mod matcher;
mod source;
#[cfg(test)]
mod test_support;
mod token;
mod types;

/// Smallest board that can hold a run of three.
pub const MIN_BOARD_SIZE: Coord = 3;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub size: Coord,
    pub kinds: u8,
}

impl BoardConfig {
    pub const fn new_unchecked(size: Coord, kinds: u8) -> Self {
        Self { size, kinds }
    }

    pub fn new(size: Coord, kinds: u8) -> Self {
        let size = size.clamp(MIN_BOARD_SIZE, Coord::MAX);
        let kinds = kinds.clamp(1, u8::MAX);
        Self::new_unchecked(size, kinds)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size, self.size)
    }

    pub const fn bounds(&self) -> Coord2 {
        (self.size, self.size)
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::new_unchecked(8, 7)
    }
}

/// Rules for a single play session. Every field has a default so partial config files work.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub board: BoardConfig,
    pub initial_moves: u16,
    pub points_per_token: u32,
    pub win_score: u32,
    /// Draws per cell before the generator gives up avoiding a run and keeps the last draw.
    pub max_draw_attempts: u8,
    pub alphabet: Alphabet,
}

impl SessionConfig {
    /// Re-applies the clamping that deserialization skips. A session always gets at least one move, and a win
    /// always takes at least one point.
    pub fn normalized(mut self) -> Self {
        self.board = BoardConfig::new(self.board.size, self.board.kinds);
        self.initial_moves = self.initial_moves.max(1);
        self.win_score = self.win_score.max(1);
        self.max_draw_attempts = self.max_draw_attempts.max(1);
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            board: BoardConfig::default(),
            initial_moves: 30,
            points_per_token: 10,
            win_score: 500,
            max_draw_attempts: DEFAULT_DRAW_ATTEMPTS,
            alphabet: Alphabet::default(),
        }
    }
}
