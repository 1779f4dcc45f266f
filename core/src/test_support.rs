use alloc::vec::Vec;
use ndarray::Array2;

use crate::*;

/// Board with no runs and no swap that makes one.
pub(crate) const BACKGROUND: [&str; 8] = [
    "02413024", //
    "13024130", //
    "24130241", //
    "30241302", //
    "41302413", //
    "02413024", //
    "13024130", //
    "24130241",
];

/// Row 2 holds five 6s at columns 1 to 5.
pub(crate) const RUN_OF_FIVE: [&str; 8] = [
    "02413024", //
    "13024130", //
    "26666641", //
    "30241302", //
    "41302413", //
    "02413024", //
    "13024130", //
    "24130241",
];

/// Only legal move: (4, 4) with (5, 4), completing 6s in row 4.
pub(crate) const SINGLE_HINT: [&str; 8] = [
    "02413024", //
    "13024130", //
    "24130241", //
    "30241302", //
    "41662413", //
    "02416024", //
    "13024130", //
    "24130241",
];

/// Swapping (3, 3) with (3, 4) lines up three 6s at row 3, columns 1 to 3.
pub(crate) const END_TO_END: [&str; 8] = [
    "02413024", //
    "13024130", //
    "24130241", //
    "36646302", //
    "41302413", //
    "02413024", //
    "13024130", //
    "24130241",
];

/// Three 6s sit at row 5; once they clear, the 5 above (5, 2) drops next to the 5s at (5, 3) and (5, 4).
pub(crate) const CHAIN: [&str; 8] = [
    "02413024", //
    "13024130", //
    "24130241", //
    "30241302", //
    "41502413", //
    "66655024", //
    "13024130", //
    "24130241",
];

/// Parses rows of kind digits, `.` for an empty cell.
pub(crate) fn board_from(kinds: u8, rows: &[&str]) -> Board {
    let size = rows.len();
    let cells: Vec<Cell> = rows
        .iter()
        .flat_map(|row| row.chars())
        .map(|ch| match ch.to_digit(10) {
            Some(kind) => Cell::Filled(Token::new(kind as u8)),
            None => Cell::Empty,
        })
        .collect();
    Board::from_cells(Array2::from_shape_vec((size, size), cells).unwrap(), kinds).unwrap()
}

/// Replays a fixed sequence of draws, wrapping around at the end.
pub(crate) struct ScriptedSource {
    values: Vec<u8>,
    cursor: usize,
}

impl ScriptedSource {
    pub(crate) fn new(values: &[u8]) -> Self {
        Self {
            values: values.to_vec(),
            cursor: 0,
        }
    }

    pub(crate) fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedSource {
    fn draw(&mut self, bound: u8) -> u8 {
        let value = self.values[self.cursor % self.values.len()] % bound;
        self.cursor += 1;
        value
    }
}
