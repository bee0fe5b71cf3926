use crate::models::AggregationEntry;
use crate::storage::Storage;
use dashmap::DashMap;
use rust_decimal::Decimal;

pub struct AggregationStorage {
    entries: DashMap<String, AggregationEntry>
}

impl AggregationStorage {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new()
        }
    }

    pub fn get(&self, kind: &str) -> Option<AggregationEntry> {
        self.entries.get(kind).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for AggregationStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for AggregationStorage {
    fn upsert(&self, kind: &str, amount: Decimal) {
        self.entries.entry(kind.to_string())
            .and_modify(|entry| entry.record(amount))
            .or_insert_with(|| AggregationEntry::new(kind, amount));
    }

    fn snapshot(&self) -> Vec<AggregationEntry> {
        let mut entries: Vec<_> = self.entries.iter().map(|item| item.value().clone()).collect();
        entries.sort_by(|left, right| left.kind.cmp(&right.kind));
        entries
    }

    fn restore(&self, entries: Vec<AggregationEntry>) {
        self.entries.clear();

        for entry in entries {
            self.entries.insert(entry.kind.clone(), entry);
        }
    }
}
