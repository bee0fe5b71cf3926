use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("Checkpoint storage error at [{path}]: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error
    },
    #[error("Checkpoint at [{path}] is corrupt: {reason}")]
    Corrupt {
        path: PathBuf,
        reason: String
    },
    #[error("Checkpoint at [{path}] belongs to source [{found}], expected [{expected}]")]
    SourceMismatch {
        path: PathBuf,
        expected: String,
        found: String
    },
    #[error("Checkpoint could not be serialized: {0}")]
    Serialize(#[from] serde_json::Error)
}

impl CheckpointError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub fn corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Corrupt { path: path.into(), reason: reason.into() }
    }
}
