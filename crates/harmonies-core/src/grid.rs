//! Hex grid topology using doubled offset coordinates.
//!
//! The board is 23 hexes laid out in 5 columns of heights 5, 4, 5, 4, 5.
//! Columns are flat-side-up and odd columns are shifted down half a cell:
//! - `Position`: linear index of a cell, numbered column by column, top to bottom
//! - `Offset`: doubled coordinate `(row, col)` of a cell or a delta between cells
//!
//! We use doubled coordinates because the shifted columns make plain offset
//! coordinates parity-dependent. With the row doubled, every neighbor is one of
//! six fixed deltas and rotation is a single linear map.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;
use std::sync::LazyLock;
use thiserror::Error;

/// Heights of the five board columns, left to right
pub const COLUMN_HEIGHTS: [u8; 5] = [5, 4, 5, 4, 5];

/// Number of cells on the board
pub const GRID_SIZE: usize = 23;

/// The six neighbor deltas in counter-clockwise order starting straight down
pub const ADJACENT_STEPS: [Offset; 6] = [
    Offset::new(2, 0),
    Offset::new(1, 1),
    Offset::new(-1, 1),
    Offset::new(-2, 0),
    Offset::new(-1, -1),
    Offset::new(1, -1),
];

/// Doubled coordinate of a cell, or the delta between two cells.
///
/// Valid coordinates always satisfy `row + col` even.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Offset {
    /// Doubled row (increases going down, two per cell)
    pub row: i8,
    /// Column (increases going right)
    pub col: i8,
}

impl Offset {
    /// Create a new offset
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    /// Rotate this offset 60° around the origin.
    ///
    /// Maps `(2,0) -> (1,1) -> (-1,1) -> (-2,0) -> (-1,-1) -> (1,-1)`.
    pub const fn rotate(self) -> Self {
        debug_assert!((self.row + self.col) % 2 == 0, "offset is not on the doubled lattice");
        Self {
            row: (self.row - 3 * self.col) / 2,
            col: (self.row + self.col) / 2,
        }
    }

    /// Rotate this offset by `steps` sixths of a turn
    pub const fn rotate_by(self, steps: u8) -> Self {
        let mut offset = self;
        let mut i = 0;
        while i < steps % 6 {
            offset = offset.rotate();
            i += 1;
        }
        offset
    }

    /// Whether this delta joins two touching hexes
    pub fn is_adjacent_step(&self) -> bool {
        ADJACENT_STEPS.contains(self)
    }
}

impl Add for Offset {
    type Output = Offset;

    fn add(self, other: Offset) -> Offset {
        Offset::new(self.row + other.row, self.col + other.col)
    }
}

/// Error returned when an index does not name a board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("position {0} is outside the 23-cell grid")]
pub struct InvalidPosition(pub u8);

/// A cell on the board, in `0..GRID_SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Position(u8);

impl Position {
    /// Create a position, or `None` if the index is off the grid
    pub const fn new(index: u8) -> Option<Self> {
        if (index as usize) < GRID_SIZE {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Linear index of this cell
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// All cells in index order
    pub fn all() -> impl Iterator<Item = Position> {
        (0..GRID_SIZE as u8).map(Position)
    }

    /// Doubled coordinate of this cell
    pub const fn doubled(self) -> Offset {
        DOUBLED_COORDS[self.0 as usize]
    }

    /// Find the cell at a doubled coordinate, if any
    pub fn from_offset(offset: Offset) -> Option<Position> {
        if offset.col < 0 || offset.col as usize >= COLUMN_HEIGHTS.len() {
            return None;
        }
        let col = offset.col as usize;
        let row = offset.row - (offset.col % 2);
        if row < 0 || row % 2 != 0 {
            return None;
        }
        let y = (row / 2) as u8;
        if y >= COLUMN_HEIGHTS[col] {
            return None;
        }
        let first: u8 = COLUMN_HEIGHTS[..col].iter().sum();
        Position::new(first + y)
    }

    /// Cells touching this one (between 2 and 6 of them)
    pub fn neighbors(self) -> &'static [Position] {
        &GRID_ADJACENT[self.index()]
    }

    /// Whether two cells share an edge
    pub fn is_adjacent(self, other: Position) -> bool {
        (other.doubled() + negate(self.doubled())).is_adjacent_step()
    }
}

const fn negate(offset: Offset) -> Offset {
    Offset::new(-offset.row, -offset.col)
}

impl TryFrom<u8> for Position {
    type Error = InvalidPosition;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Position::new(index).ok_or(InvalidPosition(index))
    }
}

impl From<Position> for u8 {
    fn from(pos: Position) -> u8 {
        pos.0
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Doubled coordinates of every cell, indexed by position
pub const DOUBLED_COORDS: [Offset; GRID_SIZE] = doubled_coords();

const fn doubled_coords() -> [Offset; GRID_SIZE] {
    let mut coords = [Offset::new(0, 0); GRID_SIZE];
    let mut index = 0;
    let mut x = 0;
    while x < COLUMN_HEIGHTS.len() {
        let mut y = 0;
        while y < COLUMN_HEIGHTS[x] {
            coords[index] = Offset::new((y * 2 + (x % 2) as u8) as i8, x as i8);
            index += 1;
            y += 1;
        }
        x += 1;
    }
    coords
}

/// Neighbor lists for every cell, indexed by position
static GRID_ADJACENT: LazyLock<Vec<Vec<Position>>> = LazyLock::new(|| {
    Position::all()
        .map(|pos| {
            ADJACENT_STEPS
                .iter()
                .filter_map(|&step| Position::from_offset(pos.doubled() + step))
                .collect::<Vec<_>>()
        })
        .map(|mut neighbors| {
            neighbors.sort();
            neighbors
        })
        .collect()
});

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn pos(index: u8) -> Position {
        Position::new(index).unwrap()
    }

    #[test]
    fn test_doubled_coords_layout() {
        assert_eq!(pos(0).doubled(), Offset::new(0, 0));
        assert_eq!(pos(4).doubled(), Offset::new(8, 0));
        assert_eq!(pos(5).doubled(), Offset::new(1, 1));
        assert_eq!(pos(8).doubled(), Offset::new(7, 1));
        assert_eq!(pos(9).doubled(), Offset::new(0, 2));
        assert_eq!(pos(22).doubled(), Offset::new(8, 4));
    }

    #[test]
    fn test_from_offset_inverts_doubled() {
        for p in Position::all() {
            assert_eq!(Position::from_offset(p.doubled()), Some(p));
        }
        assert_eq!(Position::from_offset(Offset::new(8, 1)), None);
        assert_eq!(Position::from_offset(Offset::new(-2, 0)), None);
        assert_eq!(Position::from_offset(Offset::new(0, 5)), None);
        assert_eq!(Position::from_offset(Offset::new(1, 0)), None);
    }

    #[test]
    fn test_position_bounds() {
        assert!(Position::new(22).is_some());
        assert!(Position::new(23).is_none());
        assert_eq!(Position::try_from(40), Err(InvalidPosition(40)));
        assert_eq!(Position::all().count(), GRID_SIZE);
    }

    #[test]
    fn test_corner_and_interior_neighbors() {
        assert_eq!(pos(0).neighbors(), &[pos(1), pos(5)]);
        assert_eq!(pos(1).neighbors(), &[pos(0), pos(2), pos(5), pos(6)]);
        assert_eq!(pos(6).neighbors().len(), 6);
        assert_eq!(pos(11).neighbors().len(), 6);
    }

    #[test]
    fn test_neighbor_counts_in_range() {
        for p in Position::all() {
            let n = p.neighbors().len();
            assert!((2..=6).contains(&n), "cell {p} has {n} neighbors");
            let unique: HashSet<_> = p.neighbors().iter().collect();
            assert_eq!(unique.len(), n);
        }
    }

    #[test]
    fn test_adjacency_symmetric() {
        for p in Position::all() {
            for q in Position::all() {
                assert_eq!(p.neighbors().contains(&q), q.neighbors().contains(&p));
                assert_eq!(p.is_adjacent(q), p.neighbors().contains(&q));
            }
        }
    }

    #[test]
    fn test_rotation_cycles_adjacent_steps() {
        for (i, step) in ADJACENT_STEPS.iter().enumerate() {
            assert_eq!(step.rotate(), ADJACENT_STEPS[(i + 1) % 6]);
        }
        assert_eq!(Offset::new(4, 0).rotate(), Offset::new(2, 2));
    }

    proptest! {
        #[test]
        fn prop_six_rotations_is_identity(a in 0usize..6, b in 0usize..6) {
            let offset = ADJACENT_STEPS[a] + ADJACENT_STEPS[b];
            prop_assert_eq!(offset.rotate_by(6), offset);
            prop_assert_eq!(offset.rotate_by(3), negate(offset));
        }
    }
}
