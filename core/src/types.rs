use serde::{Deserialize, Serialize};

/// Single coordinate axis used for board size and positions.
pub type Coord = u8;

/// Count type used for total-cell and removed-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(row, col)`, row 0 at the top.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Manhattan distance between two positions.
pub const fn manhattan((r1, c1): Coord2, (r2, c2): Coord2) -> CellCount {
    (r1.abs_diff(r2) as CellCount) + (c1.abs_diff(c2) as CellCount)
}

/// Orthogonal step on the grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    const fn delta(self) -> (isize, isize) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }
}

/// Moves `coords` one cell towards `direction`, returning a value only when it remains in bounds.
pub fn step(coords: Coord2, direction: Direction, bounds: Coord2) -> Option<Coord2> {
    apply_delta(coords, direction.delta(), bounds)
}

fn apply_delta(coords: Coord2, delta: (isize, isize), bounds: Coord2) -> Option<Coord2> {
    let (row, col) = coords;
    let (d_row, d_col) = delta;
    let (max_row, max_col) = bounds;

    let next_row = row.checked_add_signed(d_row.try_into().ok()?)?;
    if next_row >= max_row {
        return None;
    }

    let next_col = col.checked_add_signed(d_col.try_into().ok()?)?;
    if next_col >= max_col {
        return None;
    }

    Some((next_row, next_col))
}
