/// The error type for [`GameConfig::validate()`](crate::GameConfig::validate).
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    ZeroBoardSize,
    BoardTooLarge { board_size: usize },
    ZeroTurns,
    InvalidQuarantine(f64),
    ZeroAttempts,
}

impl std::error::Error for ConfigError {}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ZeroBoardSize => write!(f, "The board size must be at least 1"),
            ConfigError::BoardTooLarge { board_size } => write!(
                f,
                "A board of size {} has too many cells to address with linear ids",
                board_size
            ),
            ConfigError::ZeroTurns => write!(f, "Each player must have at least one turn"),
            ConfigError::InvalidQuarantine(q) => write!(
                f,
                "The quarantine distance must be a non-negative number, got {}",
                q
            ),
            ConfigError::ZeroAttempts => {
                write!(f, "The maximum number of placement attempts must be at least 1")
            }
        }
    }
}

/// The error type for loading and querying a [`HistoricalDataset`](crate::HistoricalDataset).
#[derive(Debug)]
pub enum DatasetError {
    Io(std::io::Error),
    MissingColumn {
        name: String,
    },
    MalformedRow {
        line: usize,
        reason: String,
    },
    /// A row built in memory has the wrong number of moves.
    RowLength {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// The table has no columns for the requested ply.
    MalformedDataset {
        needed_moves: usize,
        available_moves: usize,
    },
    /// There are no rows to take neighbors from.
    DataUnavailable {
        ply: usize,
    },
    /// The move history passed to a query does not hold exactly `ply` moves.
    HistoryLength {
        ply: usize,
        history_len: usize,
    },
}

impl std::error::Error for DatasetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DatasetError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for DatasetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetError::Io(_) => write!(f, "Could not read or write the dataset"),
            DatasetError::MissingColumn { name } => {
                write!(f, "The dataset has no column named '{}'", name)
            }
            DatasetError::MalformedRow { line, reason } => {
                write!(f, "Line {} of the dataset is malformed: {}", line, reason)
            }
            DatasetError::RowLength {
                row,
                expected,
                found,
            } => write!(
                f,
                "Row {} of the dataset has {} moves instead of {}",
                row, found, expected
            ),
            DatasetError::MalformedDataset {
                needed_moves,
                available_moves,
            } => write!(
                f,
                "The dataset has {} move columns, but {} are needed for this ply",
                available_moves, needed_moves
            ),
            DatasetError::DataUnavailable { ply } => {
                write!(f, "The dataset has no rows to choose move {} from", ply + 1)
            }
            DatasetError::HistoryLength { ply, history_len } => write!(
                f,
                "Asked for move {} with a history of {} moves",
                ply + 1,
                history_len
            ),
        }
    }
}

impl From<std::io::Error> for DatasetError {
    fn from(err: std::io::Error) -> Self {
        DatasetError::Io(err)
    }
}

/// The error type for running a game.
#[derive(Debug)]
pub enum GameError {
    Config(ConfigError),
    Dataset(DatasetError),
    /// No legal cell is left for the player to move.
    BoardExhausted {
        ply: usize,
        attempts: usize,
    },
    /// `step()` was called on a game that is already over.
    GameFinished,
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::Config(err) => Some(err),
            GameError::Dataset(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for GameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameError::Config(_) => write!(f, "Invalid game configuration"),
            GameError::Dataset(_) => write!(f, "The move heuristic could not use its dataset"),
            GameError::BoardExhausted { ply, attempts } => write!(
                f,
                "No legal cell left for move {} after {} random attempts and a full scan",
                ply + 1,
                attempts
            ),
            GameError::GameFinished => write!(f, "The game is already finished"),
        }
    }
}

impl From<ConfigError> for GameError {
    fn from(err: ConfigError) -> Self {
        GameError::Config(err)
    }
}

impl From<DatasetError> for GameError {
    fn from(err: DatasetError) -> Self {
        GameError::Dataset(err)
    }
}
