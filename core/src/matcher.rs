use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// Shortest run that counts as a match.
pub const MIN_RUN: Coord = 3;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    Row,
    Column,
}

/// A maximal run of at least [`MIN_RUN`] identical tokens along one row or column.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchGroup {
    token: Token,
    axis: Axis,
    start: Coord2,
    size: Coord,
}

impl MatchGroup {
    pub const fn token(self) -> Token {
        self.token
    }

    pub const fn axis(self) -> Axis {
        self.axis
    }

    /// Leftmost (row groups) or topmost (column groups) position.
    pub const fn start(self) -> Coord2 {
        self.start
    }

    /// Number of tokens in the run.
    pub const fn size(self) -> Coord {
        self.size
    }

    /// Positions in scan order.
    pub fn positions(self) -> impl Iterator<Item = Coord2> {
        let (row, col) = self.start;
        (0..self.size).map(move |offset| match self.axis {
            Axis::Row => (row, col + offset),
            Axis::Column => (row + offset, col),
        })
    }

    pub fn contains(self, coords: Coord2) -> bool {
        self.positions().any(|pos| pos == coords)
    }
}

/// Finds every maximal run, rows top to bottom first, then columns left to right.
///
/// A cell may belong to both a row group and a column group.
pub fn find_matches(board: &Board) -> Vec<MatchGroup> {
    let mut groups = Vec::new();

    for (row, lane) in board.cells().rows().into_iter().enumerate() {
        let row = row as Coord;
        scan_lane(lane.iter().copied(), |token, start, size| {
            groups.push(MatchGroup {
                token,
                axis: Axis::Row,
                start: (row, start),
                size,
            })
        });
    }

    for (col, lane) in board.cells().columns().into_iter().enumerate() {
        let col = col as Coord;
        scan_lane(lane.iter().copied(), |token, start, size| {
            groups.push(MatchGroup {
                token,
                axis: Axis::Column,
                start: (start, col),
                size,
            })
        });
    }

    groups
}

/// Reports each run of identical filled cells that reaches [`MIN_RUN`], once, at full length.
fn scan_lane(lane: impl Iterator<Item = Cell>, mut emit: impl FnMut(Token, Coord, Coord)) {
    let mut run: Option<(Token, Coord, Coord)> = None;

    let mut flush = |run: Option<(Token, Coord, Coord)>| {
        if let Some((token, start, size)) = run
            && size >= MIN_RUN
        {
            emit(token, start, size);
        }
    };

    for (index, cell) in lane.enumerate() {
        let index = index as Coord;
        run = match (run, cell.token()) {
            (Some((token, start, size)), Some(next)) if token == next => Some((token, start, size + 1)),
            (previous, next) => {
                flush(previous);
                next.map(|token| (token, index, 1))
            }
        };
    }
    flush(run);
}
