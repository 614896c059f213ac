use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use serde::Serialize;
use voronoi::GameSummary;

/// Writes one JSON file per game into a directory.
pub struct Recorder {
    num: usize,
    directory: PathBuf,
}

#[derive(Serialize)]
struct GameRecording<'a> {
    players: [&'a str; 2],
    #[serde(flatten)]
    summary: &'a GameSummary,
}

impl Recorder {
    pub fn new(directory: PathBuf) -> anyhow::Result<Self> {
        if !directory.is_dir() {
            anyhow::bail!("Directory '{}' does not exist", directory.display());
        }
        Ok(Self { num: 1, directory })
    }

    /// Writes `game_<num>.json`, numbering games consecutively across batches.
    pub fn write_game_recording(
        &mut self,
        players: [&str; 2],
        summary: &GameSummary,
    ) -> anyhow::Result<PathBuf> {
        let filepath = self.directory.join(format!("game_{:0>6}.json", self.num));
        let mut writer = BufWriter::new(File::create(&filepath)?);
        serde_json::to_writer_pretty(&mut writer, &GameRecording { players, summary })?;
        writeln!(writer)?;
        writer.flush()?;
        self.num += 1;
        Ok(filepath)
    }
}
