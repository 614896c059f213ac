use crate::{Cell, Grid, Player, Territory};

/// Draws the board as text, one row of cells per line.
///
/// Markers are `R` (player one) and `B` (player two), controlled empty cells
/// are `r` and `b`, and cells that nobody controls are `.`.
pub fn visualize_territory(grid: &Grid, territory: &Territory) -> String {
    let size = grid.size();
    let mut result = String::with_capacity((size + 3) * (size + 2));
    result += "╭";
    result += &"─".repeat(size);
    result += "╮\n";
    for x in 0..size {
        result += "│";
        for y in 0..size {
            let cell = Cell::new(x, y);
            let symbol = match (grid.owner(cell), territory.controller(cell)) {
                (Some(Player::One), _) => 'R',
                (Some(Player::Two), _) => 'B',
                (None, Some(Player::One)) => 'r',
                (None, Some(Player::Two)) => 'b',
                (None, None) => '.',
            };
            result.push(symbol);
        }
        result += "│\n";
    }
    result += "╰";
    result += &"─".repeat(size);
    result += "╯";
    result
}
