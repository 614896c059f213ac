use serde::{Deserialize, Serialize};

/// A cell on the square board, addressed by row `x` and column `y`.
///
/// Moves are exchanged as linear ids (`x * size + y`) everywhere outside the
/// board itself: in datasets, in the move history and as heuristic features.
///
/// ```
/// use voronoi::Cell;
/// let cell = Cell::from_id(57, 10);
/// assert_eq!(cell, Cell { x: 5, y: 7 });
/// assert_eq!(cell.to_id(10), 57);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
}

impl Cell {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Decodes a linear cell id for a board with `size` rows.
    ///
    /// The result may lie outside the board if `id >= size * size`.
    pub fn from_id(id: usize, size: usize) -> Self {
        Self {
            x: id / size,
            y: id % size,
        }
    }

    pub fn to_id(self, size: usize) -> usize {
        self.x * size + self.y
    }

    pub fn in_bounds(self, size: usize) -> bool {
        self.x < size && self.y < size
    }

    /// The squared Euclidean distance, which is exact in integers.
    pub fn squared_distance(self, other: Cell) -> u64 {
        let dx = self.x.abs_diff(other.x) as u64;
        let dy = self.y.abs_diff(other.y) as u64;
        dx * dx + dy * dy
    }

    pub fn distance(self, other: Cell) -> f64 {
        (self.squared_distance(other) as f64).sqrt()
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
