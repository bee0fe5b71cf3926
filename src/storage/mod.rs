mod aggregation_storage;
#[cfg(test)]
mod tests;

use rust_decimal::Decimal;

use crate::models::AggregationEntry;

pub use aggregation_storage::AggregationStorage;

/// Keyed running state of the aggregation.
///
/// Exactly one writer (the update engine) is expected to call `upsert`, `snapshot` and
/// `restore`; they are never interleaved from different threads.
pub trait Storage: Send + Sync + 'static {
    fn upsert(&self, kind: &str, amount: Decimal);
    fn snapshot(&self) -> Vec<AggregationEntry>;
    fn restore(&self, entries: Vec<AggregationEntry>);
}
