mod checkpoint_manager;
mod errors;

use serde::{Deserialize, Serialize};

use crate::models::AggregationEntry;
use crate::types::Offset;

pub use checkpoint_manager::CheckpointManager;
pub use errors::CheckpointError;

/// Current on-disk layout version.
pub const CHECKPOINT_VERSION: u32 = 1;

/// The durable commit point of the pipeline.
///
/// `offset` is the next record to consume: every record below it is already reflected in `entries`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointRecord {
    pub version: u32,
    pub source: String,
    pub offset: Offset,
    pub entries: Vec<AggregationEntry>
}
