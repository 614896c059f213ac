use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::{OwnershipMask, Player, Territory};

/// The share of the whole board covered by this mask, in percent.
///
/// The denominator includes occupied and unclaimed cells, so the two
/// players' percentages usually sum to less than 100.
pub fn area_percentage(mask: &OwnershipMask) -> f64 {
    let total = mask.size() * mask.size();
    if total == 0 {
        return 0.0;
    }
    mask.count() as f64 / total as f64 * 100.0
}

/// The live or final area percentages of both players.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Standings {
    /// Player one.
    pub red: f64,
    /// Player two.
    pub blue: f64,
}

impl Standings {
    pub fn from_territory(territory: &Territory) -> Self {
        Self {
            red: area_percentage(&territory.red),
            blue: area_percentage(&territory.blue),
        }
    }

    pub fn of(&self, player: Player) -> f64 {
        match player {
            Player::One => self.red,
            Player::Two => self.blue,
        }
    }

    /// The higher percentage wins. Equal percentages are a tie.
    pub fn outcome(&self) -> Outcome {
        match self.red.total_cmp(&self.blue) {
            Ordering::Greater => Outcome::Won(Player::One),
            Ordering::Less => Outcome::Won(Player::Two),
            Ordering::Equal => Outcome::Tie,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Won(Player),
    Tie,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Won(player) => write!(f, "{} ({}) wins", player, player.color_name()),
            Outcome::Tie => write!(f, "tie"),
        }
    }
}
