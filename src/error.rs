use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("terminal setup failed: {0}")]
    Terminal(#[source] io::Error),
    #[error("input thread stopped")]
    EventChannel,
    #[error("high score file {} is corrupt", .0.display())]
    CorruptScores(PathBuf),
    #[error("failed to write high score file {}: {source}", path.display())]
    SaveScores {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to open log file {}: {source}", path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
