use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{Error, Result};

const MAGIC: &[u8; 4] = b"MCH1";
// 4 magic + 4-byte little-endian score
const FILE_SIZE: usize = 8;

/// The persisted Snake high score.
#[derive(Clone, Debug)]
pub struct HighScore {
    best: u32,
    path: PathBuf,
}

impl HighScore {
    /// Missing or unreadable data counts as zero.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let best = match read_file(&path) {
            Ok(best) => best,
            Err(err) => {
                warn!(error = %err, "ignoring stored high score");
                0
            }
        };
        info!(best, path = %path.display(), "high score loaded");
        HighScore { best, path }
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stores `score` if it beats the current best. Returns whether it did.
    pub fn submit(&mut self, score: u32) -> Result<bool> {
        if score <= self.best {
            return Ok(false);
        }
        self.write_file(score)?;
        self.best = score;
        info!(best = score, "new high score");
        Ok(true)
    }

    fn write_file(&self, best: u32) -> Result<()> {
        let mut buf = Vec::with_capacity(FILE_SIZE);
        buf.extend_from_slice(MAGIC);
        buf.extend_from_slice(&best.to_le_bytes());
        fs::write(&self.path, &buf).map_err(|source| Error::SaveScores {
            path: self.path.clone(),
            source,
        })
    }
}

fn read_file(path: &Path) -> Result<u32> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(err) => return Err(err.into()),
    };
    if data.len() < FILE_SIZE || &data[0..4] != MAGIC {
        return Err(Error::CorruptScores(path.to_path_buf()));
    }
    let bytes: [u8; 4] = [data[4], data[5], data[6], data[7]];
    Ok(u32::from_le_bytes(bytes))
}
