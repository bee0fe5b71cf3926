use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::checkpoint::{CheckpointError, CheckpointRecord, CHECKPOINT_VERSION};
use crate::io::atomic_write;
use crate::models::AggregationEntry;
use crate::types::Offset;

const CHECKPOINT_FILE: &str = "checkpoint.json";

/// Persists the stream position together with the aggregation state.
///
/// A single file inside the checkpoint directory holds the current record. Commits go through
/// a temporary file and a rename, so a reader always sees either the previous or the new record.
pub struct CheckpointManager {
    path: PathBuf,
    source: String
}

impl CheckpointManager {
    /// Creates a manager for the given checkpoint directory and input source.
    pub fn new(directory: impl AsRef<Path>, source: impl Into<String>) -> Self {
        Self {
            path: directory.as_ref().join(CHECKPOINT_FILE),
            source: source.into()
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the current checkpoint, if one was ever committed.
    ///
    /// # Errors
    /// Returns `CheckpointError::Corrupt` when the file exists but cannot be trusted and
    /// `CheckpointError::SourceMismatch` when it was written for a different input source.
    /// Neither case falls back to an empty state.
    pub fn load(&self) -> Result<Option<CheckpointRecord>, CheckpointError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                info!("No checkpoint found at [{}], starting from the earliest record", self.path.display());
                return Ok(None)
            }
            Err(error) => return Err(CheckpointError::io(&self.path, error))
        };

        let record: CheckpointRecord = serde_json::from_slice(&bytes)
            .map_err(|error| CheckpointError::corrupt(&self.path, error.to_string()))?;

        self.validate(&record)?;

        info!("Loaded checkpoint at offset [{}] with [{}] entries", record.offset, record.entries.len());

        Ok(Some(record))
    }

    /// Atomically replaces the current checkpoint with `offset` and `entries`.
    pub fn commit(&self, offset: Offset, entries: &[AggregationEntry]) -> Result<(), CheckpointError> {
        let record = CheckpointRecord {
            version: CHECKPOINT_VERSION,
            source: self.source.clone(),
            offset,
            entries: entries.to_vec()
        };

        let bytes = serde_json::to_vec_pretty(&record)?;

        if let Some(directory) = self.path.parent() {
            fs::create_dir_all(directory).map_err(|error| CheckpointError::io(directory, error))?;
        }

        atomic_write(&self.path, &bytes).map_err(|error| CheckpointError::io(&self.path, error))?;

        debug!("Committed checkpoint at offset [{offset}]");

        Ok(())
    }

    fn validate(&self, record: &CheckpointRecord) -> Result<(), CheckpointError> {
        if record.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::corrupt(&self.path, format!("unsupported version [{}]", record.version)))
        }

        if record.source != self.source {
            return Err(CheckpointError::SourceMismatch {
                path: self.path.clone(),
                expected: self.source.clone(),
                found: record.source.clone()
            })
        }

        let mut kinds = HashSet::new();

        for entry in &record.entries {
            if entry.count == 0 {
                return Err(CheckpointError::corrupt(&self.path, format!("entry [{}] has a zero count", entry.kind)))
            }

            if entry.min_amount > entry.max_amount {
                return Err(CheckpointError::corrupt(&self.path, format!("entry [{}] has min above max", entry.kind)))
            }

            if !kinds.insert(entry.kind.as_str()) {
                return Err(CheckpointError::corrupt(&self.path, format!("entry [{}] appears more than once", entry.kind)))
            }
        }

        Ok(())
    }
}
