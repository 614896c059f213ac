use std::sync::Arc;

use rand::rngs::StdRng;
use rand::Rng;

use crate::{
    next_move, GameConfig, GameError, Grid, HeuristicParams, HistoricalDataset, OwnershipMask,
    Player, Territory,
};

/// What a policy gets to see when it is asked for a move.
pub struct PlyView<'a> {
    /// The number of moves already made.
    pub ply: usize,
    pub mover: Player,
    pub config: &'a GameConfig,
    pub grid: &'a Grid,
    /// All moves made so far, as linear cell ids.
    pub history: &'a [usize],
    /// The territory after the previous move.
    pub territory: &'a Territory,
}

impl<'a> PlyView<'a> {
    pub fn opponent_mask(&self) -> &'a OwnershipMask {
        self.territory.mask(self.mover.other())
    }
}

/// A source of candidate moves for one player.
///
/// The engine validates every proposal and replaces illegal ones with a
/// random legal cell, so a policy does not need to check legality.
pub trait Policy {
    fn name(&self) -> &str;

    /// Proposes a linear cell id.
    fn propose(&mut self, view: &PlyView<'_>, rng: &mut StdRng) -> Result<usize, GameError>;
}

/// Proposes a uniformly random cell of the board.
#[derive(Clone, Debug, Default)]
pub struct RandomPolicy;

impl Policy for RandomPolicy {
    fn name(&self) -> &str {
        "random"
    }

    fn propose(&mut self, view: &PlyView<'_>, rng: &mut StdRng) -> Result<usize, GameError> {
        Ok(rng.gen_range(0..view.grid.num_cells()))
    }
}

/// Proposes the move suggested by [`next_move()`] for a shared dataset.
#[derive(Clone, Debug)]
pub struct KnnPolicy {
    dataset: Arc<HistoricalDataset>,
    params: HeuristicParams,
}

impl KnnPolicy {
    pub fn new(dataset: Arc<HistoricalDataset>, params: HeuristicParams) -> Self {
        Self { dataset, params }
    }

    pub fn dataset(&self) -> &HistoricalDataset {
        &self.dataset
    }
}

impl Policy for KnnPolicy {
    fn name(&self) -> &str {
        "knn"
    }

    fn propose(&mut self, view: &PlyView<'_>, rng: &mut StdRng) -> Result<usize, GameError> {
        Ok(next_move(
            view.ply,
            view.history,
            &self.dataset,
            view.opponent_mask(),
            &self.params,
            rng,
        )?)
    }
}
