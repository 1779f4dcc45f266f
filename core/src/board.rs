use alloc::vec::Vec;
use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// An unordered pair of orthogonally adjacent positions.
///
/// The positions are stored in row-major order, so `Swap::new(a, b) == Swap::new(b, a)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Swap {
    first: Coord2,
    second: Coord2,
}

impl Swap {
    pub fn new(a: Coord2, b: Coord2) -> Result<Self> {
        if manhattan(a, b) != 1 {
            return Err(GameError::NotAdjacent);
        }
        Ok(Self::new_unchecked(a, b))
    }

    pub(crate) fn new_unchecked(a: Coord2, b: Coord2) -> Self {
        if a <= b {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }

    pub const fn first(self) -> Coord2 {
        self.first
    }

    pub const fn second(self) -> Coord2 {
        self.second
    }

    pub const fn positions(self) -> [Coord2; 2] {
        [self.first, self.second]
    }

    /// Position whose token would sit at `coords` once the swap is applied.
    pub(crate) fn source_of(self, coords: Coord2) -> Coord2 {
        if coords == self.first {
            self.second
        } else if coords == self.second {
            self.first
        } else {
            coords
        }
    }
}

/// Result of trying a swap on the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapValidation {
    /// Nothing would match; the board was left untouched.
    Ineffective,
    /// The exchange is committed and produced these groups.
    Effective(Vec<MatchGroup>),
}

impl SwapValidation {
    pub const fn is_effective(&self) -> bool {
        matches!(self, Self::Effective(_))
    }
}

/// Square grid of tokens, indexed by `(row, col)`.
///
/// Deserialization goes through [`Board::from_cells`], so a decoded board is as checked as a hand-built one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BoardSnapshot")]
pub struct Board {
    cells: Array2<Cell>,
    kinds: u8,
}

#[derive(Deserialize)]
struct BoardSnapshot {
    cells: Array2<Cell>,
    kinds: u8,
}

impl TryFrom<BoardSnapshot> for Board {
    type Error = GameError;

    fn try_from(snapshot: BoardSnapshot) -> Result<Self> {
        Self::from_cells(snapshot.cells, snapshot.kinds)
    }
}

impl Board {
    pub fn empty(config: BoardConfig) -> Self {
        Self {
            cells: Array2::from_elem(config.bounds().to_nd_index(), Cell::Empty),
            kinds: config.kinds,
        }
    }

    pub fn from_cells(cells: Array2<Cell>, kinds: u8) -> Result<Self> {
        let (rows, cols) = cells.dim();
        let valid_size = rows == cols
            && rows >= usize::from(MIN_BOARD_SIZE)
            && rows <= usize::from(Coord::MAX);
        let valid_tokens = cells
            .iter()
            .filter_map(|cell| cell.token())
            .all(|token| token.kind() < kinds);

        if !valid_size || !valid_tokens || kinds == 0 {
            return Err(GameError::InvalidBoardShape);
        }
        Ok(Self { cells, kinds })
    }

    /// Builds a fully populated board from rows of token kinds.
    pub fn from_kinds(kinds: u8, rows: &[&[u8]]) -> Result<Self> {
        let size = rows.len();
        if rows.iter().any(|row| row.len() != size) {
            return Err(GameError::InvalidBoardShape);
        }

        let cells: Vec<Cell> = rows
            .iter()
            .flat_map(|row| row.iter().map(|&kind| Cell::Filled(Token::new(kind))))
            .collect();
        let cells =
            Array2::from_shape_vec((size, size), cells).map_err(|_| GameError::InvalidBoardShape)?;
        Self::from_cells(cells, kinds)
    }

    pub fn config(&self) -> BoardConfig {
        BoardConfig::new_unchecked(self.size(), self.kinds)
    }

    /// Side length of the board.
    pub fn size(&self) -> Coord {
        // from_cells caps the side at Coord::MAX
        self.cells.nrows() as Coord
    }

    pub fn bounds(&self) -> Coord2 {
        (self.size(), self.size())
    }

    pub fn kinds(&self) -> u8 {
        self.kinds
    }

    pub fn contains(&self, (row, col): Coord2) -> bool {
        row < self.size() && col < self.size()
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if self.contains(coords) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn empty_count(&self) -> CellCount {
        let count = self.cells.iter().filter(|cell| cell.is_empty()).count();
        // bounded by Coord::MAX squared
        count as CellCount
    }

    /// No empty cells and no runs of three or more.
    pub fn is_settled(&self) -> bool {
        self.empty_count() == 0 && find_matches(self).is_empty()
    }

    /// All positions in row-major order.
    pub fn iter_coords(&self) -> impl Iterator<Item = Coord2> + use<> {
        let size = self.size();
        (0..size).flat_map(move |row| (0..size).map(move |col| (row, col)))
    }

    pub fn row(&self, row: Coord) -> impl Iterator<Item = Cell> + '_ {
        self.cells.row(usize::from(row)).into_iter().copied()
    }

    /// Tentatively exchanges the two cells and keeps the exchange only when it produces a match.
    ///
    /// Positions outside the board are rejected as ineffective without touching any cell.
    pub fn validate_swap(&mut self, swap: Swap) -> SwapValidation {
        if !self.contains(swap.first()) || !self.contains(swap.second()) {
            log::warn!("Rejecting swap outside the board: {:?}", swap);
            return SwapValidation::Ineffective;
        }

        self.exchange(swap);
        let groups = find_matches(self);
        if groups.is_empty() {
            self.exchange(swap);
            log::debug!("Swap {:?} made no match, reverted", swap);
            SwapValidation::Ineffective
        } else {
            log::debug!("Swap {:?} made {} group(s)", swap, groups.len());
            SwapValidation::Effective(groups)
        }
    }

    /// Same side length on both axes, as every board built through [`Board::from_cells`] has.
    pub fn is_square(&self) -> bool {
        let (rows, cols) = self.cells.dim();
        rows == cols
    }

    pub(crate) fn cells(&self) -> &Array2<Cell> {
        &self.cells
    }

    pub(crate) fn set(&mut self, coords: Coord2, cell: Cell) {
        self.cells[coords.to_nd_index()] = cell;
    }

    fn exchange(&mut self, swap: Swap) {
        self.cells
            .swap(swap.first().to_nd_index(), swap.second().to_nd_index());
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, (row, col): Coord2) -> &Self::Output {
        &self.cells[(row as usize, col as usize)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    #[test]
    fn swap_requires_adjacency() {
        assert_eq!(Swap::new((3, 3), (4, 4)), Err(GameError::NotAdjacent));
        assert_eq!(Swap::new((3, 3), (3, 5)), Err(GameError::NotAdjacent));
        assert_eq!(Swap::new((3, 3), (3, 3)), Err(GameError::NotAdjacent));
        assert_eq!(Swap::new((3, 4), (3, 3)), Swap::new((3, 3), (3, 4)));
    }

    #[test]
    fn from_kinds_rejects_bad_shapes() {
        assert_eq!(
            Board::from_kinds(3, &[&[0, 1, 2], &[1, 2, 0]]),
            Err(GameError::InvalidBoardShape)
        );
        assert_eq!(
            Board::from_kinds(3, &[&[0, 1], &[1, 0]]),
            Err(GameError::InvalidBoardShape)
        );
        assert_eq!(
            Board::from_kinds(2, &[&[0, 1, 2], &[1, 2, 0], &[2, 0, 1]]),
            Err(GameError::InvalidBoardShape)
        );
        assert!(Board::from_kinds(3, &[&[0, 1, 2], &[1, 2, 0], &[2, 0, 1]]).is_ok());
    }

    #[test]
    fn ineffective_swap_leaves_board_unchanged() {
        let mut board = board_from(7, &BACKGROUND);
        let before = board.clone();

        let validation = board.validate_swap(Swap::new((3, 3), (3, 4)).unwrap());

        assert_eq!(validation, SwapValidation::Ineffective);
        assert_eq!(board, before);
    }

    #[test]
    fn effective_swap_changes_exactly_the_two_cells() {
        let mut board = board_from(7, &END_TO_END);
        let before = board.clone();
        let swap = Swap::new((3, 3), (3, 4)).unwrap();

        let validation = board.validate_swap(swap);

        assert!(validation.is_effective());
        let changed: Vec<_> = board
            .iter_coords()
            .filter(|&coords| board[coords] != before[coords])
            .collect();
        assert_eq!(changed, swap.positions());
        assert_eq!(board[(3, 3)], before[(3, 4)]);
        assert_eq!(board[(3, 4)], before[(3, 3)]);
    }

    #[test]
    fn out_of_bounds_swap_is_ineffective() {
        let mut board = board_from(7, &BACKGROUND);
        let before = board.clone();

        let validation = board.validate_swap(Swap::new((7, 7), (7, 8)).unwrap());

        assert_eq!(validation, SwapValidation::Ineffective);
        assert_eq!(board, before);
    }

    #[test]
    fn decoding_runs_the_shape_checks() {
        let board = board_from(7, &END_TO_END);
        let json = serde_json::to_value(&board).unwrap();
        assert_eq!(serde_json::from_value::<Board>(json).unwrap(), board);

        let narrow = serde_json::json!({
            "cells": Array2::from_elem((8, 4), Cell::Filled(Token::new(0))),
            "kinds": 7,
        });
        assert!(serde_json::from_value::<Board>(narrow).is_err());

        let foreign_kind = serde_json::json!({
            "cells": Array2::from_elem((3, 3), Cell::Filled(Token::new(9))),
            "kinds": 7,
        });
        assert!(serde_json::from_value::<Board>(foreign_kind).is_err());
    }

    #[test]
    fn validate_coords_rejects_positions_off_the_board() {
        let board = board_from(7, &BACKGROUND);

        assert_eq!(board.validate_coords((7, 7)), Ok((7, 7)));
        assert_eq!(board.validate_coords((8, 0)), Err(GameError::InvalidCoords));
        assert_eq!(board.validate_coords((0, 8)), Err(GameError::InvalidCoords));
        assert!(board.is_square());
    }

    #[test]
    fn iter_coords_is_row_major() {
        let board = Board::empty(BoardConfig::new(3, 3));
        let coords: Vec<_> = board.iter_coords().take(4).collect();

        assert_eq!(coords, [(0, 0), (0, 1), (0, 2), (1, 0)]);
        assert_eq!(board.empty_count(), 9);
        assert!(!board.is_settled());
    }
}
