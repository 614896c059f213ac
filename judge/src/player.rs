use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use voronoi::{GameConfig, HeuristicParams, HistoricalDataset, KnnPolicy, Policy, RandomPolicy};

/// The contents of a player config JSON file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// A short name for the results table.
    pub nick: String,
    pub policy: PolicyConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PolicyConfig {
    Random,
    Knn {
        /// A CSV file of past games.
        dataset: PathBuf,
        #[serde(default)]
        neighbors: Option<usize>,
        #[serde(default)]
        overlap_penalty: Option<f64>,
    },
}

impl PlayerConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

/// A player with everything loaded that is needed to create its policy for
/// each game.
#[derive(Clone, Debug)]
pub struct Contestant {
    pub name: String,
    kind: ContestantKind,
}

#[derive(Clone, Debug)]
enum ContestantKind {
    Random,
    Knn {
        dataset: Arc<HistoricalDataset>,
        params: HeuristicParams,
    },
}

impl Contestant {
    pub fn random(name: &str) -> Self {
        Self {
            name: String::from(name),
            kind: ContestantKind::Random,
        }
    }

    pub fn knn(name: &str, dataset: Arc<HistoricalDataset>, params: HeuristicParams) -> Self {
        Self {
            name: String::from(name),
            kind: ContestantKind::Knn { dataset, params },
        }
    }

    /// Loads the dataset of a k-NN player, which needs a move column for
    /// every ply of a game played with `game`.
    pub fn from_config(config: &PlayerConfig, game: &GameConfig) -> anyhow::Result<Self> {
        match &config.policy {
            PolicyConfig::Random => Ok(Self::random(&config.nick)),
            PolicyConfig::Knn {
                dataset,
                neighbors,
                overlap_penalty,
            } => {
                let defaults = HeuristicParams::default();
                let params = HeuristicParams {
                    neighbors: neighbors.unwrap_or(defaults.neighbors),
                    overlap_penalty: overlap_penalty.unwrap_or(defaults.overlap_penalty),
                };
                if params.neighbors == 0 {
                    anyhow::bail!("Player '{}' must consult at least one neighbor", config.nick);
                }
                let loaded = HistoricalDataset::load(dataset).map_err(|err| {
                    anyhow::Error::new(err)
                        .context(format!("Could not load dataset '{}'", dataset.display()))
                })?;
                if loaded.num_moves() < game.total_plies() {
                    anyhow::bail!(
                        "Dataset '{}' of player '{}' has {} move columns, but a game has {} moves",
                        dataset.display(),
                        config.nick,
                        loaded.num_moves(),
                        game.total_plies()
                    );
                }
                info!(
                    player = %config.nick,
                    rows = loaded.len(),
                    moves = loaded.num_moves(),
                    "Loaded dataset"
                );
                Ok(Self::knn(&config.nick, Arc::new(loaded), params))
            }
        }
    }

    /// A fresh policy for one game.
    pub fn policy(&self) -> Box<dyn Policy> {
        match &self.kind {
            ContestantKind::Random => Box::new(RandomPolicy),
            ContestantKind::Knn { dataset, params } => {
                Box::new(KnnPolicy::new(Arc::clone(dataset), *params))
            }
        }
    }

    pub fn uses_dataset(&self) -> bool {
        matches!(self.kind, ContestantKind::Knn { .. })
    }

    /// Points a k-NN player at a new dataset. Has no effect on other players.
    ///
    /// Must not be called while a batch using this contestant is running.
    pub fn replace_dataset(&mut self, new_dataset: Arc<HistoricalDataset>) {
        if let ContestantKind::Knn { dataset, .. } = &mut self.kind {
            *dataset = new_dataset;
        }
    }
}
