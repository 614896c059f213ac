use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use judge::{play_batch, BatchSettings, Contestant, MatchScore, PlayerConfig, Recorder};
use tracing::info;
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use voronoi::GameConfig;

#[derive(Parser)]
struct Args {
    /// Paths to the config JSON files of the two players. The first one moves first.
    #[clap(num_args(2), value_delimiter = ' ')]
    player_configs: Vec<PathBuf>,

    /// How many games to play per iteration
    #[arg(short, long, default_value_t = 100)]
    num_games: usize,

    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Side length of the square board
    #[arg(long, default_value_t = 100)]
    board_size: usize,

    /// Number of markers each player places
    #[arg(long, default_value_t = 5)]
    turns_per_player: usize,

    /// New markers must be strictly farther than this from all existing markers
    #[arg(long, default_value_t = 5.0)]
    quarantine_distance: f64,

    /// Random cells to try before scanning the whole board for a legal one
    #[arg(long, default_value_t = 1000)]
    max_attempts: usize,

    /// Number of threads to play games on, 0 for one per core
    #[arg(short, long, default_value_t = 0)]
    threads: usize,

    /// How many batches of games to play
    #[arg(short, long, default_value_t = 1)]
    iterations: usize,

    /// After each iteration, the games just played become the dataset of every k-NN player
    #[arg(short, long, default_value_t = false)]
    feedback: bool,

    /// Write the games as CSV to this file. With several iterations, the
    /// iteration number is appended to the file name.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Record every game as a JSON file into this directory
    #[arg(short, long)]
    record_games_to_directory: Option<PathBuf>,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "info")]
    log_level: LevelFilter,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    initialize_logging(args.log_level);

    if args.player_configs.len() != 2 {
        anyhow::bail!("Exactly two player configs are needed");
    }
    if args.feedback && args.iterations < 2 {
        anyhow::bail!("--feedback only has an effect with at least two iterations");
    }

    let config = GameConfig {
        board_size: args.board_size,
        turns_per_player: args.turns_per_player,
        quarantine_distance: args.quarantine_distance,
        max_attempts: args.max_attempts,
    };
    config.validate()?;

    // Get a random seed
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed);

    let mut recorder = if let Some(dir_path) = args.record_games_to_directory {
        Some(Recorder::new(dir_path)?)
    } else {
        None
    };

    let mut contestants = [
        Contestant::from_config(&PlayerConfig::load(&args.player_configs[0])?, &config)?,
        Contestant::from_config(&PlayerConfig::load(&args.player_configs[1])?, &config)?,
    ];

    for iteration in 0..args.iterations {
        let settings = BatchSettings {
            num_games: args.num_games,
            seed: seed.wrapping_add((iteration as u64).wrapping_mul(args.num_games as u64)),
            threads: args.threads,
        };
        info!(
            iteration = iteration + 1,
            num_games = settings.num_games,
            "Playing batch"
        );
        let batch = play_batch(&config, &contestants, &settings)?;
        print_match_result(&contestants, &batch.score);

        if let Some(rec) = &mut recorder {
            let names = [contestants[0].name.as_str(), contestants[1].name.as_str()];
            for summary in &batch.summaries {
                rec.write_game_recording(names, summary)?;
            }
        }

        if args.output.is_some() || args.feedback {
            let dataset = batch.to_dataset(&config);
            if let Some(output) = &args.output {
                let path = output_path(output, iteration, args.iterations);
                dataset.save(&path)?;
                info!(path = %path.display(), rows = dataset.len(), "Wrote dataset");
            }
            // The batch is complete, so no game reads the old dataset anymore
            if args.feedback {
                let dataset = Arc::new(dataset);
                for contestant in contestants.iter_mut().filter(|c| c.uses_dataset()) {
                    contestant.replace_dataset(Arc::clone(&dataset));
                }
            }
        }
    }

    Ok(())
}

fn print_match_result(contestants: &[Contestant; 2], score: &MatchScore) {
    let [win_1, win_2, tie] = score.percentages();
    eprintln!(
        "End result:\n- {} wins by {} ({:.1}%)\n- {} wins by {} ({:.1}%)\n- {} ties ({:.1}%)",
        score.wins[0],
        contestants[0].name,
        win_1,
        score.wins[1],
        contestants[1].name,
        win_2,
        score.ties,
        tie
    );
}

// "games.csv" becomes "games_3.csv" for the third of several iterations
fn output_path(output: &Path, iteration: usize, iterations: usize) -> PathBuf {
    if iterations == 1 {
        return output.to_path_buf();
    }
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = match output.extension() {
        Some(ext) => format!("{}_{}.{}", stem, iteration + 1, ext.to_string_lossy()),
        None => format!("{}_{}", stem, iteration + 1),
    };
    output.with_file_name(file_name)
}

fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_paths_per_iteration() {
        let output = Path::new("datasets/games.csv");
        assert_eq!(output_path(output, 0, 1), PathBuf::from("datasets/games.csv"));
        assert_eq!(output_path(output, 0, 3), PathBuf::from("datasets/games_1.csv"));
        assert_eq!(output_path(output, 2, 3), PathBuf::from("datasets/games_3.csv"));
        assert_eq!(
            output_path(Path::new("games"), 1, 2),
            PathBuf::from("games_2")
        );
    }
}
