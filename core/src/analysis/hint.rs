use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hint {
    /// A swap that makes at least one match.
    Swap(Swap),
    /// The board is deadlocked. Two random positions to highlight, with no match guarantee.
    Placeholder(Coord2, Coord2),
}

impl Hint {
    pub const fn is_playable(&self) -> bool {
        matches!(self, Self::Swap(_))
    }

    pub const fn positions(&self) -> [Coord2; 2] {
        match *self {
            Self::Swap(swap) => swap.positions(),
            Self::Placeholder(a, b) => [a, b],
        }
    }
}

/// Whether the token at `at` sits in a run of at least three along its row or column.
pub fn would_match(board: &Board, at: Coord2) -> bool {
    run_through(board.bounds(), at, &|coords: Coord2| board[coords])
}

/// First swap, scanning row-major and trying the right neighbor before the one below, that would make a match.
///
/// Only the two swapped cells are checked, against a virtual view of the board with the swap applied.
pub fn find_hint(board: &Board) -> Option<Swap> {
    let bounds = board.bounds();
    board
        .iter_coords()
        .flat_map(|at| {
            [Direction::Right, Direction::Down]
                .into_iter()
                .filter_map(move |direction| step(at, direction, bounds))
                .map(move |other| Swap::new_unchecked(at, other))
        })
        .find(|&swap| swap_would_match(board, swap))
}

/// No swap anywhere on the board makes a match.
pub fn is_deadlocked(board: &Board) -> bool {
    find_hint(board).is_none()
}

fn swap_would_match(board: &Board, swap: Swap) -> bool {
    let swapped = |coords: Coord2| board[swap.source_of(coords)];
    swap.positions()
        .into_iter()
        .any(|at| run_through(board.bounds(), at, &swapped))
}

fn run_through(bounds: Coord2, at: Coord2, cell_at: &impl Fn(Coord2) -> Cell) -> bool {
    let Some(token) = cell_at(at).token() else {
        return false;
    };

    let reach = |direction: Direction| {
        let mut count: Coord = 0;
        let mut cursor = at;
        while let Some(next) = step(cursor, direction, bounds) {
            if !cell_at(next).holds(token) {
                break;
            }
            count += 1;
            cursor = next;
        }
        count
    };

    let horizontal = 1 + reach(Direction::Left) + reach(Direction::Right);
    let vertical = 1 + reach(Direction::Up) + reach(Direction::Down);
    horizontal >= MIN_RUN || vertical >= MIN_RUN
}
