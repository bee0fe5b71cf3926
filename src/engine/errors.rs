use thiserror::Error;

use crate::checkpoint::CheckpointError;
use crate::io::SinkError;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The view could not be published, the batch was rolled back and not checkpointed.
    #[error(transparent)]
    Publish(#[from] SinkError),
    /// The batch was applied and published but its checkpoint is not durable.
    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),
    #[error("Engine halted after a failed checkpoint commit at offset [{0}]")]
    Halted(u64)
}
