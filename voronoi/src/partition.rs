use crate::{Cell, Grid, Player};

/// A boolean map over the board that marks the empty cells controlled by one
/// player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnershipMask {
    size: usize,
    cells: Vec<bool>,
}

impl OwnershipMask {
    /// A mask with no cells set.
    pub fn empty(size: usize) -> Self {
        Self {
            size,
            cells: vec![false; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Cells outside the board are never contained.
    pub fn contains(&self, cell: Cell) -> bool {
        cell.in_bounds(self.size) && self.cells[cell.to_id(self.size)]
    }

    /// Like [`Self::contains()`], but for a linear cell id.
    pub fn contains_id(&self, id: usize) -> bool {
        self.cells.get(id).copied().unwrap_or(false)
    }

    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&set| set).count()
    }

    pub fn is_disjoint(&self, other: &OwnershipMask) -> bool {
        self.cells
            .iter()
            .zip(&other.cells)
            .all(|(&a, &b)| !(a && b))
    }

    /// The cells in this mask, in id order.
    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &set)| set)
            .map(|(id, _)| Cell::from_id(id, self.size))
    }

    fn set(&mut self, cell: Cell) {
        self.cells[cell.to_id(self.size)] = true;
    }
}

/// The two ownership masks of a board. They are always disjoint, and
/// occupied cells are in neither.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Territory {
    pub red: OwnershipMask,
    pub blue: OwnershipMask,
}

impl Territory {
    pub fn empty(size: usize) -> Self {
        Self {
            red: OwnershipMask::empty(size),
            blue: OwnershipMask::empty(size),
        }
    }

    pub fn mask(&self, player: Player) -> &OwnershipMask {
        match player {
            Player::One => &self.red,
            Player::Two => &self.blue,
        }
    }

    /// Who controls this cell, if anyone.
    pub fn controller(&self, cell: Cell) -> Option<Player> {
        if self.red.contains(cell) {
            Some(Player::One)
        } else if self.blue.contains(cell) {
            Some(Player::Two)
        } else {
            None
        }
    }
}

/// Assigns every empty cell to the player with the strictly nearest marker.
///
/// Distances are compared as exact integer squared distances, so cells that
/// are equally far from both players end up in neither mask. A player without
/// markers controls nothing; if only one player has markers, that player
/// controls every empty cell.
pub fn partition(grid: &Grid) -> Territory {
    let size = grid.size();
    let red_markers = grid.markers(Player::One);
    let blue_markers = grid.markers(Player::Two);
    let mut territory = Territory::empty(size);

    let empty_cells = (0..grid.num_cells())
        .map(|id| Cell::from_id(id, size))
        .filter(|&cell| !grid.is_occupied(cell));

    match (red_markers.is_empty(), blue_markers.is_empty()) {
        (true, true) => {}
        (false, true) => empty_cells.for_each(|cell| territory.red.set(cell)),
        (true, false) => empty_cells.for_each(|cell| territory.blue.set(cell)),
        (false, false) => {
            for cell in empty_cells {
                let d_red = nearest_squared_distance(cell, red_markers);
                let d_blue = nearest_squared_distance(cell, blue_markers);
                if d_red < d_blue {
                    territory.red.set(cell);
                } else if d_blue < d_red {
                    territory.blue.set(cell);
                }
            }
        }
    }
    territory
}

// `u64::MAX` when there are no markers.
fn nearest_squared_distance(cell: Cell, markers: &[Cell]) -> u64 {
    markers
        .iter()
        .map(|&marker| cell.squared_distance(marker))
        .min()
        .unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;

    use super::*;
    use crate::arbitrary::BoardInput;

    quickcheck! {
        fn masks_are_disjoint_and_skip_occupied_cells(input: BoardInput) -> bool {
            let grid = input.to_grid();
            let territory = partition(&grid);
            territory.red.is_disjoint(&territory.blue)
                && (0..grid.num_cells())
                    .map(|id| Cell::from_id(id, grid.size()))
                    .filter(|&cell| grid.is_occupied(cell))
                    .all(|cell| !territory.red.contains(cell) && !territory.blue.contains(cell))
        }

        fn side_without_markers_controls_nothing(input: BoardInput) -> bool {
            let territory = partition(&input.to_grid());
            (!input.red.is_empty() || territory.red.count() == 0)
                && (!input.blue.is_empty() || territory.blue.count() == 0)
        }

        fn cells_go_to_the_strictly_nearest_side(input: BoardInput) -> bool {
            if input.red.is_empty() || input.blue.is_empty() {
                return true;
            }
            let grid = input.to_grid();
            let territory = partition(&grid);
            (0..grid.num_cells())
                .map(|id| Cell::from_id(id, grid.size()))
                .filter(|&cell| !grid.is_occupied(cell))
                .all(|cell| {
                    let d_red = nearest_squared_distance(cell, &input.red);
                    let d_blue = nearest_squared_distance(cell, &input.blue);
                    let expected = match d_red.cmp(&d_blue) {
                        std::cmp::Ordering::Less => Some(Player::One),
                        std::cmp::Ordering::Greater => Some(Player::Two),
                        std::cmp::Ordering::Equal => None,
                    };
                    territory.controller(cell) == expected
                })
        }
    }

    #[test]
    fn empty_board_has_no_territory() {
        let territory = partition(&Grid::new(5));
        assert_eq!(territory.red.count(), 0);
        assert_eq!(territory.blue.count(), 0);
    }

    #[test]
    fn lone_side_controls_every_empty_cell() {
        let mut grid = Grid::new(5);
        grid.place(Cell::new(0, 0), Player::Two);
        let territory = partition(&grid);
        assert_eq!(territory.red.count(), 0);
        assert_eq!(territory.blue.count(), 24);
        assert!(!territory.blue.contains(Cell::new(0, 0)));

        let mut grid = Grid::new(5);
        grid.place(Cell::new(4, 4), Player::One);
        grid.place(Cell::new(0, 0), Player::One);
        let territory = partition(&grid);
        assert_eq!(territory.red.count(), 23);
        assert_eq!(territory.blue.count(), 0);
    }

    #[test]
    fn opposite_corners_leave_the_antidiagonal_unclaimed() {
        let mut grid = Grid::new(10);
        grid.place(Cell::from_id(0, 10), Player::One);
        grid.place(Cell::from_id(99, 10), Player::Two);
        let territory = partition(&grid);

        // (5, 4) and (4, 5) are equally far from (0, 0) and (9, 9)
        for cell in [Cell::new(5, 4), Cell::new(4, 5), Cell::new(0, 9), Cell::new(9, 0)] {
            assert!(!territory.red.contains(cell));
            assert!(!territory.blue.contains(cell));
        }
        assert!(territory.red.contains(Cell::new(4, 4)));
        assert!(territory.blue.contains(Cell::new(5, 5)));
        assert!(territory.red.contains(Cell::new(0, 8)));
        assert!(territory.blue.contains(Cell::new(1, 9)));

        // 10 cells on the antidiagonal x + y = 9 are ties, 45 cells lie on each side,
        // minus one marker per side.
        assert_eq!(territory.red.count(), 44);
        assert_eq!(territory.blue.count(), 44);
    }

    #[test]
    fn contains_id_outside_the_board() {
        let mask = OwnershipMask::empty(3);
        assert!(!mask.contains_id(9));
        assert!(!mask.contains(Cell::new(3, 0)));
    }
}
