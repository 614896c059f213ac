//! Move selection from a table of past games.
//!
//! The heuristic looks up the past games whose first moves are most similar to
//! the live game, and picks the follow-up move that earned the largest final
//! area on average. Similarity is the Euclidean distance between move
//! sequences read as vectors of linear cell ids, not a distance on the board.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{DatasetError, HistoricalDataset, OwnershipMask};

/// Tuning knobs for [`next_move()`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeuristicParams {
    /// How many past games to consult.
    pub neighbors: usize,
    /// Subtracted from a past game's final area when its follow-up move lies
    /// in the opponent's current territory.
    pub overlap_penalty: f64,
}

impl Default for HeuristicParams {
    fn default() -> Self {
        Self {
            neighbors: 20,
            overlap_penalty: 10.0,
        }
    }
}

/// The aggregated evidence for one candidate move.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CandidateScore {
    pub cell_id: usize,
    /// Mean of the (possibly penalized) final areas of the past games that
    /// played this move.
    pub mean_outcome: f64,
    /// How many of the neighbors played this move.
    pub support: usize,
}

/// Chooses the next move for the player about to make move number `ply + 1`.
///
/// `history` holds the `ply` moves made so far by both players. The returned
/// cell id is not checked for legality.
pub fn next_move(
    ply: usize,
    history: &[usize],
    dataset: &HistoricalDataset,
    opponent_mask: &OwnershipMask,
    params: &HeuristicParams,
    rng: &mut StdRng,
) -> Result<usize, DatasetError> {
    let candidates = score_candidates(ply, history, dataset, opponent_mask, params, rng)?;
    let mut best = candidates[0];
    for candidate in &candidates[1..] {
        // Strictly greater, so the first candidate wins ties
        if candidate.mean_outcome > best.mean_outcome {
            best = *candidate;
        }
    }
    trace!(ply, cell_id = best.cell_id, mean_outcome = best.mean_outcome, "Heuristic move");
    Ok(best.cell_id)
}

/// Scores the follow-up moves of the nearest past games.
///
/// Candidates are returned in the order in which they are first encountered
/// among the neighbors. The result is never empty.
pub fn score_candidates(
    ply: usize,
    history: &[usize],
    dataset: &HistoricalDataset,
    opponent_mask: &OwnershipMask,
    params: &HeuristicParams,
    rng: &mut StdRng,
) -> Result<Vec<CandidateScore>, DatasetError> {
    if history.len() != ply {
        return Err(DatasetError::HistoryLength {
            ply,
            history_len: history.len(),
        });
    }
    dataset.check_ply(ply)?;

    let num_neighbors = params.neighbors.min(dataset.len());
    if num_neighbors == 0 {
        return Err(DatasetError::DataUnavailable { ply });
    }

    let neighbors = if ply == 0 {
        // Nothing to compare yet, so consult random past games
        (0..num_neighbors)
            .map(|_| rng.gen_range(0..dataset.len()))
            .collect()
    } else {
        nearest_rows(dataset, history, num_neighbors)
    };
    trace!(ply, ?neighbors, "Nearest past games");

    // The final area of the player who made move `ply + 1` in the past game
    let area_idx = ply % 2;

    let mut candidates: Vec<(usize, f64, usize)> = Vec::new();
    let mut position_of: HashMap<usize, usize> = HashMap::new();
    for row_idx in neighbors {
        let row = &dataset.rows()[row_idx];
        let cell_id = row.moves[ply];
        let mut outcome = row.areas[area_idx];
        if opponent_mask.contains_id(cell_id) {
            outcome -= params.overlap_penalty;
        }
        let pos = *position_of.entry(cell_id).or_insert_with(|| {
            candidates.push((cell_id, 0.0, 0));
            candidates.len() - 1
        });
        candidates[pos].1 += outcome;
        candidates[pos].2 += 1;
    }

    Ok(candidates
        .into_iter()
        .map(|(cell_id, total, support)| CandidateScore {
            cell_id,
            mean_outcome: total / support as f64,
            support,
        })
        .collect())
}

/// Exact k-nearest-neighbor search over the first `query.len()` moves of every
/// row.
///
/// Rows are ordered by ascending distance, and rows at the same distance by
/// ascending row index. A query longer than the rows is compared on the
/// common prefix only.
pub fn nearest_rows(dataset: &HistoricalDataset, query: &[usize], k: usize) -> Vec<usize> {
    let len = query.len().min(dataset.num_moves());
    let mut by_distance: Vec<(u64, usize)> = dataset
        .rows()
        .iter()
        .enumerate()
        .map(|(idx, row)| (squared_distance(&row.moves[..len], &query[..len]), idx))
        .collect();
    if k == 0 {
        return Vec::new();
    }
    if k < by_distance.len() {
        by_distance.select_nth_unstable(k - 1);
        by_distance.truncate(k);
    }
    by_distance.sort_unstable();
    by_distance.into_iter().map(|(_, idx)| idx).collect()
}

fn squared_distance(a: &[usize], b: &[usize]) -> u64 {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| {
            let d = x.abs_diff(y) as u64;
            d.saturating_mul(d)
        })
        .fold(0u64, u64::saturating_add)
}
