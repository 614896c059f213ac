use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    partition, Cell, ConfigError, GameError, GameRow, Grid, Outcome, Player, PlyView, Policy,
    Standings, Territory,
};

/// The rules of one game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// The board has `board_size` x `board_size` cells.
    pub board_size: usize,
    pub turns_per_player: usize,
    /// A new marker must be strictly farther than this from every marker on the board.
    pub quarantine_distance: f64,
    /// How many random cells to try when a policy proposes an illegal move,
    /// before falling back to a scan of the whole board.
    pub max_attempts: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: 100,
            turns_per_player: 5,
            quarantine_distance: 5.0,
            max_attempts: 1000,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_size == 0 {
            return Err(ConfigError::ZeroBoardSize);
        }
        if self.board_size.checked_mul(self.board_size).is_none() {
            return Err(ConfigError::BoardTooLarge {
                board_size: self.board_size,
            });
        }
        if self.turns_per_player == 0 {
            return Err(ConfigError::ZeroTurns);
        }
        if self.quarantine_distance.is_nan() || self.quarantine_distance < 0.0 {
            return Err(ConfigError::InvalidQuarantine(self.quarantine_distance));
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        Ok(())
    }

    /// The number of moves in a complete game.
    pub fn total_plies(&self) -> usize {
        2 * self.turns_per_player
    }
}

/// Where a game is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Setup,
    Playing,
    Finished(Outcome),
}

/// A single accepted move.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlyRecord {
    pub player: Player,
    /// What the policy asked for.
    pub proposed: usize,
    /// Where the marker was placed. Differs from `proposed` if the proposal
    /// was illegal.
    pub placed: usize,
    /// The standings right after this move.
    pub standings: Standings,
}

/// The result of a finished game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSummary {
    pub config: GameConfig,
    pub outcome: Outcome,
    pub history: Vec<usize>,
    pub standings: Standings,
    pub plies: Vec<PlyRecord>,
}

impl GameSummary {
    /// The dataset row for this game.
    pub fn to_row(&self) -> GameRow {
        GameRow {
            moves: self.history.clone(),
            areas: [self.standings.red, self.standings.blue],
        }
    }

    /// Replays the moves onto an empty board, for display.
    pub fn final_board(&self) -> (Grid, Territory) {
        let size = self.config.board_size;
        let mut grid = Grid::new(size);
        for (ply, &id) in self.history.iter().enumerate() {
            grid.place(Cell::from_id(id, size), Player::for_ply(ply));
        }
        let territory = partition(&grid);
        (grid, territory)
    }
}

/// The two policies of a game, player one first.
pub type Policies = [Box<dyn Policy>; 2];

/// A game in progress.
///
/// Each call to [`Game::step()`] plays exactly one move and refreshes the
/// territory, so the accessors always describe a consistent snapshot.
pub struct Game {
    config: GameConfig,
    grid: Grid,
    history: Vec<usize>,
    territory: Territory,
    standings: Standings,
    plies: Vec<PlyRecord>,
    phase: Phase,
}

impl Game {
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let size = config.board_size;
        Ok(Self {
            config,
            grid: Grid::new(size),
            history: Vec::new(),
            territory: Territory::empty(size),
            standings: Standings::default(),
            plies: Vec::new(),
            phase: Phase::Setup,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn history(&self) -> &[usize] {
        &self.history
    }

    pub fn territory(&self) -> &Territory {
        &self.territory
    }

    pub fn standings(&self) -> Standings {
        self.standings
    }

    /// The number of moves made so far.
    pub fn ply(&self) -> usize {
        self.history.len()
    }

    /// The player to move next.
    pub fn mover(&self) -> Player {
        Player::for_ply(self.ply())
    }

    /// Plays one move for the player whose turn it is and returns the new phase.
    ///
    /// An illegal proposal is replaced by a uniformly random legal cell. If
    /// there is none, the game cannot continue and
    /// [`GameError::BoardExhausted`] is returned.
    pub fn step(&mut self, policies: &mut Policies, rng: &mut StdRng) -> Result<Phase, GameError> {
        match self.phase {
            Phase::Finished(_) => return Err(GameError::GameFinished),
            Phase::Setup => self.phase = Phase::Playing,
            Phase::Playing => {}
        }

        let ply = self.ply();
        let mover = self.mover();
        let view = PlyView {
            ply,
            mover,
            config: &self.config,
            grid: &self.grid,
            history: &self.history,
            territory: &self.territory,
        };
        let proposed = policies[mover.index()].propose(&view, rng)?;
        let cell = self.legal_cell_for(ply, proposed, rng)?;
        let placed = cell.to_id(self.config.board_size);

        self.grid.place(cell, mover);
        self.history.push(placed);
        self.territory = partition(&self.grid);
        self.standings = Standings::from_territory(&self.territory);
        self.plies.push(PlyRecord {
            player: mover,
            proposed,
            placed,
            standings: self.standings,
        });
        debug!(
            ply,
            player = %mover,
            policy = policies[mover.index()].name(),
            %cell,
            red = self.standings.red,
            blue = self.standings.blue,
            "Placed marker"
        );

        if self.history.len() == self.config.total_plies() {
            self.phase = Phase::Finished(self.standings.outcome());
        }
        Ok(self.phase)
    }

    /// Consumes the game. For a game that has not finished, the outcome
    /// reflects the current standings.
    pub fn into_summary(self) -> GameSummary {
        let outcome = match self.phase {
            Phase::Finished(outcome) => outcome,
            _ => self.standings.outcome(),
        };
        GameSummary {
            config: self.config,
            outcome,
            history: self.history,
            standings: self.standings,
            plies: self.plies,
        }
    }

    fn legal_cell_for(
        &self,
        ply: usize,
        proposed: usize,
        rng: &mut StdRng,
    ) -> Result<Cell, GameError> {
        let size = self.config.board_size;
        let quarantine = self.config.quarantine_distance;
        if self.grid.is_valid_id(proposed, quarantine) {
            return Ok(Cell::from_id(proposed, size));
        }
        debug!(ply, proposed, "Illegal proposal, picking a random cell instead");

        for _ in 0..self.config.max_attempts {
            let cell = Cell::new(rng.gen_range(0..size), rng.gen_range(0..size));
            if self.grid.is_valid(cell, quarantine) {
                return Ok(cell);
            }
        }

        // Random sampling keeps missing, so the board is nearly full
        let legal: Vec<Cell> = self.grid.legal_cells(quarantine).collect();
        legal
            .choose(rng)
            .copied()
            .ok_or(GameError::BoardExhausted {
                ply,
                attempts: self.config.max_attempts,
            })
    }
}

/// Plays a complete game between two policies.
pub fn run_game(
    config: GameConfig,
    policies: &mut Policies,
    rng: &mut StdRng,
) -> Result<GameSummary, GameError> {
    let mut game = Game::new(config)?;
    while !matches!(game.step(policies, rng)?, Phase::Finished(_)) {}
    Ok(game.into_summary())
}
