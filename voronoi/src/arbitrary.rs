use std::collections::BTreeSet;

use quickcheck::Arbitrary;

use crate::{Cell, Grid, Player};

/// A small board with a few markers for each player, no two on the same cell.
#[derive(Clone, Debug)]
pub struct BoardInput {
    pub size: usize,
    pub red: Vec<Cell>,
    pub blue: Vec<Cell>,
}

impl BoardInput {
    pub fn to_grid(&self) -> Grid {
        let mut grid = Grid::new(self.size);
        for &cell in &self.red {
            grid.place(cell, Player::One);
        }
        for &cell in &self.blue {
            grid.place(cell, Player::Two);
        }
        grid
    }
}

impl quickcheck::Arbitrary for BoardInput {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        let size = 1 + usize::arbitrary(g) % 12;
        let num_cells = size * size;

        // Either side may end up without markers
        let num_red = usize::arbitrary(g) % 6;
        let num_blue = usize::arbitrary(g) % 6;

        let mut taken = BTreeSet::new();
        let mut red = Vec::new();
        let mut blue = Vec::new();
        for idx in 0..num_red + num_blue {
            if taken.len() == num_cells {
                break;
            }
            let id = loop {
                let id = usize::arbitrary(g) % num_cells;
                if taken.insert(id) {
                    break id;
                }
            };
            let cell = Cell::from_id(id, size);
            if idx < num_red {
                red.push(cell);
            } else {
                blue.push(cell);
            }
        }
        BoardInput { size, red, blue }
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        let mut smaller = Vec::new();
        if !self.red.is_empty() {
            let mut input = self.clone();
            input.red.pop();
            smaller.push(input);
        }
        if !self.blue.is_empty() {
            let mut input = self.clone();
            input.blue.pop();
            smaller.push(input);
        }
        Box::new(smaller.into_iter())
    }
}

