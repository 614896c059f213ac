use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use voronoi::{
    run_game, visualize_territory, GameConfig, GameSummary, HistoricalDataset, Outcome, Player,
    Policies,
};

use crate::player::Contestant;

/// How many games to play and how.
#[derive(Clone, Debug)]
pub struct BatchSettings {
    pub num_games: usize,
    /// Game `i` of the batch uses the seed `seed + i`.
    pub seed: u64,
    /// Size of the thread pool, 0 for one thread per core.
    pub threads: usize,
}

/// Wins and ties from the perspective of the two contestants.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchScore {
    pub wins: [usize; 2],
    pub ties: usize,
}

impl MatchScore {
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Won(player) => self.wins[player.index()] += 1,
            Outcome::Tie => self.ties += 1,
        }
    }

    pub fn num_games(&self) -> usize {
        self.wins[0] + self.wins[1] + self.ties
    }

    /// Win percentage of player one, win percentage of player two, and tie percentage.
    pub fn percentages(&self) -> [f64; 3] {
        let num_games = self.num_games().max(1) as f64;
        [
            self.wins[0] as f64 / num_games * 100.0,
            self.wins[1] as f64 / num_games * 100.0,
            self.ties as f64 / num_games * 100.0,
        ]
    }
}

/// The games of one batch, in game order.
pub struct Batch {
    pub summaries: Vec<GameSummary>,
    pub score: MatchScore,
}

impl Batch {
    /// One row per game, for feeding back to k-NN players or writing to disk.
    pub fn to_dataset(&self, config: &GameConfig) -> HistoricalDataset {
        let rows = self.summaries.iter().map(GameSummary::to_row).collect();
        // Every finished game has exactly `total_plies` moves
        HistoricalDataset::new(config.total_plies(), rows)
            .unwrap_or_else(|_| unreachable!("finished games have a fixed number of moves"))
    }
}

/// Plays independent games between the two contestants in parallel.
///
/// Each game gets its own random number generator seeded from its index, so
/// the result does not depend on the number of threads.
pub fn play_batch(
    config: &GameConfig,
    contestants: &[Contestant; 2],
    settings: &BatchSettings,
) -> anyhow::Result<Batch> {
    config.validate()?;
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(settings.threads)
        .build()?;

    let summaries = pool.install(|| {
        (0..settings.num_games)
            .into_par_iter()
            .map(|game_idx| play_one(config, contestants, settings.seed, game_idx))
            .collect::<anyhow::Result<Vec<GameSummary>>>()
    })?;

    let mut score = MatchScore::default();
    for summary in &summaries {
        score.record(summary.outcome);
    }
    Ok(Batch { summaries, score })
}

fn play_one(
    config: &GameConfig,
    contestants: &[Contestant; 2],
    seed: u64,
    game_idx: usize,
) -> anyhow::Result<GameSummary> {
    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(game_idx as u64));
    let mut policies: Policies = [contestants[0].policy(), contestants[1].policy()];
    let summary = run_game(config.clone(), &mut policies, &mut rng).map_err(|err| {
        anyhow::Error::new(err).context(format!("Game {} could not be completed", game_idx))
    })?;

    match summary.outcome {
        Outcome::Won(player) => debug!(
            game_idx,
            winner = %contestants[player.index()].name,
            red = summary.standings.red,
            blue = summary.standings.blue
        ),
        Outcome::Tie => debug!(game_idx, "Tie"),
    }
    if tracing::enabled!(tracing::Level::TRACE) {
        let (grid, territory) = summary.final_board();
        trace!(
            game_idx,
            "Final board ({} is {}):\n{}",
            contestants[Player::One.index()].name,
            Player::One.color_name(),
            visualize_territory(&grid, &territory)
        );
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use voronoi::HeuristicParams;

    use super::*;

    fn small_config() -> GameConfig {
        GameConfig {
            board_size: 15,
            turns_per_player: 3,
            quarantine_distance: 2.0,
            max_attempts: 100,
        }
    }

    fn random_pair() -> [Contestant; 2] {
        [Contestant::random("a"), Contestant::random("b")]
    }

    #[test]
    fn batch_does_not_depend_on_thread_count() {
        let config = small_config();
        let mut settings = BatchSettings {
            num_games: 12,
            seed: 99,
            threads: 1,
        };
        let sequential = play_batch(&config, &random_pair(), &settings).unwrap();
        settings.threads = 4;
        let parallel = play_batch(&config, &random_pair(), &settings).unwrap();
        assert_eq!(sequential.summaries, parallel.summaries);
        assert_eq!(sequential.score, parallel.score);
        assert_eq!(sequential.score.num_games(), 12);
    }

    #[test]
    fn dataset_has_one_row_per_game() {
        let config = small_config();
        let settings = BatchSettings {
            num_games: 7,
            seed: 1,
            threads: 2,
        };
        let batch = play_batch(&config, &random_pair(), &settings).unwrap();
        let dataset = batch.to_dataset(&config);
        assert_eq!(dataset.len(), 7);
        assert_eq!(dataset.num_moves(), 6);
        for (row, summary) in dataset.rows().iter().zip(&batch.summaries) {
            assert_eq!(row.moves, summary.history);
            assert_eq!(row.areas, [summary.standings.red, summary.standings.blue]);
        }
    }

    #[test]
    fn knn_player_learns_from_a_previous_batch() {
        let config = small_config();
        let settings = BatchSettings {
            num_games: 20,
            seed: 5,
            threads: 2,
        };
        let first = play_batch(&config, &random_pair(), &settings).unwrap();
        let dataset = Arc::new(first.to_dataset(&config));

        let contestants = [
            Contestant::knn("knn", Arc::clone(&dataset), HeuristicParams::default()),
            Contestant::random("random"),
        ];
        let second = play_batch(&config, &contestants, &settings).unwrap();
        assert_eq!(second.score.num_games(), 20);
        for summary in &second.summaries {
            assert_eq!(summary.history.len(), config.total_plies());
        }
    }

    #[test]
    fn invalid_config_fails_before_playing() {
        let config = GameConfig {
            turns_per_player: 0,
            ..small_config()
        };
        let settings = BatchSettings {
            num_games: 3,
            seed: 0,
            threads: 1,
        };
        assert!(play_batch(&config, &random_pair(), &settings).is_err());
    }

    #[test]
    fn score_percentages() {
        let mut score = MatchScore::default();
        score.record(Outcome::Won(Player::One));
        score.record(Outcome::Won(Player::One));
        score.record(Outcome::Won(Player::Two));
        score.record(Outcome::Tie);
        assert_eq!(score.wins, [2, 1]);
        assert_eq!(score.percentages(), [50.0, 25.0, 25.0]);
    }
}
