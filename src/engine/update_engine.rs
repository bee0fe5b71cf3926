use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use crate::checkpoint::{CheckpointError, CheckpointManager};
use crate::engine::EngineError;
use crate::io::Sink;
use crate::models::{AggregationEntry, Transaction};
use crate::storage::Storage;
use crate::types::{Batch, Offset};

/// Only types with at least this many frauds make it into the published view.
pub const MIN_PUBLISHED_COUNT: u64 = 2;

/// Running counters over everything the engine consumed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EngineStats {
    pub batches: u64,
    pub records: u64,
    /// Malformed records dropped by the parser.
    pub skipped: u64,
    /// Well-formed records which are not fraudulent.
    pub ignored: u64,
    /// Fraudulent records folded into the aggregation.
    pub applied: u64,
    /// Records below the committed offset, already reflected in the state.
    pub duplicates: u64,
    pub publishes: u64,
    pub commits: u64
}

impl EngineStats {
    fn merge(&mut self, other: &EngineStats) {
        self.batches += other.batches;
        self.records += other.records;
        self.skipped += other.skipped;
        self.ignored += other.ignored;
        self.applied += other.applied;
        self.duplicates += other.duplicates;
        self.publishes += other.publishes;
        self.commits += other.commits;
    }
}

/// Single writer of the aggregation state.
///
/// Each batch is applied in input order, the resulting view is published as a whole and only
/// then is the new offset committed together with the state that produced it.
pub struct UpdateEngine<S: Storage, P: Sink> {
    storage: S,
    sink: P,
    checkpoints: CheckpointManager,
    offset: Offset,
    committed: Vec<AggregationEntry>,
    stats: EngineStats,
    halted: bool
}

impl<S: Storage, P: Sink> UpdateEngine<S, P> {
    /// Creates an engine starting from the earliest offset with whatever `storage` holds.
    pub fn new(storage: S, sink: P, checkpoints: CheckpointManager) -> Self {
        let committed = storage.snapshot();

        Self {
            storage,
            sink,
            checkpoints,
            offset: 0,
            committed,
            stats: EngineStats::default(),
            halted: false
        }
    }

    /// Creates an engine positioned at the last committed checkpoint, if there is one.
    ///
    /// # Errors
    /// A checkpoint which exists but cannot be loaded is fatal, the engine never silently
    /// restarts from an empty state.
    pub fn recover(storage: S, sink: P, checkpoints: CheckpointManager) -> Result<Self, CheckpointError> {
        let record = checkpoints.load()?;
        let mut engine = Self::new(storage, sink, checkpoints);

        if let Some(record) = record {
            engine.storage.restore(record.entries.clone());
            engine.offset = record.offset;
            engine.committed = record.entries;
        }

        Ok(engine)
    }

    /// Next offset the engine expects to consume.
    pub fn offset(&self) -> Offset {
        self.offset
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn sink(&self) -> &P {
        &self.sink
    }

    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }

    /// Applies one batch on top of the state committed at `since_offset` and returns the new offset.
    ///
    /// Malformed records are skipped and non-fraudulent ones ignored. When at least one record
    /// changed the state the full view is published before the checkpoint is committed.
    ///
    /// # Errors
    /// - `EngineError::Publish` if the sink rejects the view. The state is rolled back to the last
    ///   commit so the same batch can be replayed without double counting.
    /// - `EngineError::Checkpoint` if the commit fails. The engine refuses any further batches.
    pub fn process(&mut self, batch: Batch, since_offset: Offset) -> Result<Offset, EngineError> {
        if self.halted {
            return Err(EngineError::Halted(self.offset))
        }

        //NOTE: Counters only reach the running stats once the batch is committed, a replayed batch is counted once
        let mut batch_stats = EngineStats { batches: 1, ..EngineStats::default() };

        let mut new_offset = since_offset;
        let mut changed = false;

        for record in batch {
            batch_stats.records += 1;

            if record.offset < since_offset {
                batch_stats.duplicates += 1;
                debug!("Record at offset [{}] is already committed, skipping", record.offset);
                continue;
            }

            new_offset = new_offset.max(record.offset + 1);

            match Transaction::parse(&record.bytes) {
                Ok(transaction) if transaction.is_fraudulent() => {
                    self.storage.upsert(&transaction.kind, transaction.amount);
                    batch_stats.applied += 1;
                    changed = true;
                }
                Ok(_) => {
                    batch_stats.ignored += 1;
                }
                Err(error) => {
                    batch_stats.skipped += 1;
                    warn!("Skipping record at offset [{}]: {error}", record.offset);
                }
            }
        }

        let snapshot = self.storage.snapshot();

        if changed {
            if let Err(error) = self.sink.publish(&published_view(&snapshot)) {
                self.storage.restore(self.committed.clone());
                warn!("Publishing failed, rolled back to offset [{}]: {error}", self.offset);
                return Err(error.into())
            }

            batch_stats.publishes += 1;
        }

        if let Err(error) = self.checkpoints.commit(new_offset, &snapshot) {
            self.halted = true;
            error!("Checkpoint commit at offset [{new_offset}] failed: {error}");
            return Err(error.into())
        }

        batch_stats.commits += 1;
        self.stats.merge(&batch_stats);
        self.committed = snapshot;
        self.offset = new_offset;

        debug!("Batch committed at offset [{new_offset}]");

        Ok(new_offset)
    }

    /// Consumes batches until the channel closes and returns the final committed offset.
    pub async fn run(&mut self, mut receiver: mpsc::Receiver<Batch>) -> Result<Offset, EngineError> {
        // NOTE: Batches must be applied strictly in arrival order, so they are never processed concurrently.
        while let Some(batch) = receiver.recv().await {
            let since_offset = self.offset;
            self.process(batch, since_offset)?;
        }

        Ok(self.offset)
    }
}

/// Renders the published view: one line per type with more than one recorded fraud.
pub fn published_view(snapshot: &[AggregationEntry]) -> Vec<String> {
    snapshot.iter()
        .filter(|entry| entry.count >= MIN_PUBLISHED_COUNT)
        .map(AggregationEntry::format)
        .collect()
}
