use serde::{Deserialize, Serialize};

use crate::Cell;

/// One of the two players.
///
/// Player one plays red and moves on even plies, player two plays blue and
/// moves on odd plies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub const BOTH: [Player; 2] = [Player::One, Player::Two];

    /// The player who moves at the given (0-based) ply.
    pub fn for_ply(ply: usize) -> Self {
        if ply % 2 == 0 {
            Player::One
        } else {
            Player::Two
        }
    }

    pub fn other(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }

    pub fn color_name(self) -> &'static str {
        match self {
            Player::One => "red",
            Player::Two => "blue",
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Player::One => write!(f, "player 1"),
            Player::Two => write!(f, "player 2"),
        }
    }
}

/// Cell occupancy of a square board, plus the markers of each player in
/// placement order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    /// One occupancy plane per player, indexed by [`Player::index()`].
    ///
    /// A cell is set in at most one plane.
    planes: [Vec<bool>; 2],
    /// Append-only for the duration of a game.
    markers: [Vec<Cell>; 2],
}

impl Grid {
    /// Creates an empty `size` x `size` board.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            planes: [vec![false; size * size], vec![false; size * size]],
            markers: [Vec::new(), Vec::new()],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn num_cells(&self) -> usize {
        self.size * self.size
    }

    /// The markers of this player, in the order they were placed.
    pub fn markers(&self, player: Player) -> &[Cell] {
        &self.markers[player.index()]
    }

    pub fn num_markers(&self) -> usize {
        self.markers[0].len() + self.markers[1].len()
    }

    pub fn owner(&self, cell: Cell) -> Option<Player> {
        if !cell.in_bounds(self.size) {
            return None;
        }
        let idx = cell.to_id(self.size);
        Player::BOTH
            .into_iter()
            .find(|player| self.planes[player.index()][idx])
    }

    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.owner(cell).is_some()
    }

    /// Whether a marker may be placed on `cell`.
    ///
    /// The cell must be on the board, empty, and strictly farther than
    /// `quarantine_distance` from every marker of either player.
    pub fn is_valid(&self, cell: Cell, quarantine_distance: f64) -> bool {
        if !cell.in_bounds(self.size) || self.is_occupied(cell) {
            return false;
        }
        self.markers
            .iter()
            .flatten()
            .all(|&marker| cell.distance(marker) > quarantine_distance)
    }

    /// Like [`Self::is_valid()`], but for a linear cell id.
    pub fn is_valid_id(&self, id: usize, quarantine_distance: f64) -> bool {
        id < self.num_cells() && self.is_valid(Cell::from_id(id, self.size), quarantine_distance)
    }

    /// Puts a marker for `player` on `cell`.
    ///
    /// This does no validation. The cell must be on the board and empty,
    /// which callers establish with [`Self::is_valid()`].
    pub fn place(&mut self, cell: Cell, player: Player) {
        debug_assert!(cell.in_bounds(self.size) && !self.is_occupied(cell));
        let idx = cell.to_id(self.size);
        self.planes[player.index()][idx] = true;
        self.markers[player.index()].push(cell);
    }

    /// All cells where a marker could currently be placed, in id order.
    pub fn legal_cells(&self, quarantine_distance: f64) -> impl Iterator<Item = Cell> + '_ {
        let size = self.size;
        (0..self.num_cells())
            .map(move |id| Cell::from_id(id, size))
            .filter(move |&cell| self.is_valid(cell, quarantine_distance))
    }
}
