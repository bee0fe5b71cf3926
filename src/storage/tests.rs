use super::{AggregationStorage, Storage};
use crate::models::AggregationEntry;
use anyhow::{anyhow, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::str::FromStr;

fn amount(value: &str) -> Result<Decimal> {
    Ok(Decimal::from_str(value)?)
}

#[test]
fn test_upsert_creates_entry_on_first_fraud() -> Result<()> {
    let storage = AggregationStorage::new();

    assert!(storage.get("CASH_OUT").is_none());

    storage.upsert("CASH_OUT", amount("100")?);

    let entry = storage.get("CASH_OUT").ok_or_else(|| anyhow!("CASH_OUT entry missing"))?;

    assert_eq!(entry, AggregationEntry::new("CASH_OUT", amount("100")?));

    Ok(())
}

#[test]
fn test_upsert_updates_count_and_extremes_per_type() -> Result<()> {
    let storage = AggregationStorage::new();
    let observed = ["300", "12.5", "7000", "12.5", "450"];

    for value in observed {
        storage.upsert("TRANSFER", amount(value)?);
    }
    storage.upsert("CASH_OUT", amount("1")?);

    let transfer = storage.get("TRANSFER").ok_or_else(|| anyhow!("TRANSFER entry missing"))?;

    assert_eq!(transfer.count, observed.len() as u64);
    assert_eq!(transfer.max_amount, amount("7000")?);
    assert_eq!(transfer.min_amount, amount("12.5")?);

    for value in observed {
        let value = amount(value)?;
        assert!(transfer.min_amount <= value && value <= transfer.max_amount);
    }

    assert_eq!(storage.len(), 2);

    Ok(())
}

#[test]
fn test_ties_do_not_create_additional_entries() -> Result<()> {
    let storage = AggregationStorage::new();
    storage.upsert("CASH_OUT", amount("50")?);
    storage.upsert("CASH_OUT", amount("50")?);
    storage.upsert("CASH_OUT", amount("50")?);

    assert_eq!(storage.len(), 1);
    assert_eq!(storage.snapshot()[0].count, 3);

    Ok(())
}

#[test]
fn test_snapshot_is_an_independent_sorted_copy() -> Result<()> {
    let storage = AggregationStorage::new();
    storage.upsert("TRANSFER", amount("10")?);
    storage.upsert("CASH_OUT", amount("20")?);

    let snapshot = storage.snapshot();
    storage.upsert("CASH_OUT", amount("30")?);

    let kinds: Vec<_> = snapshot.iter().map(|entry| entry.kind.as_str()).collect();

    assert_eq!(kinds, vec!["CASH_OUT", "TRANSFER"]);
    assert_eq!(snapshot[0].count, 1);
    assert_eq!(storage.snapshot()[0].count, 2);

    Ok(())
}

#[test]
fn test_restore_replaces_the_entire_state() -> Result<()> {
    let storage = AggregationStorage::new();
    storage.upsert("PAYMENT", amount("1")?);

    let mut cash_out = AggregationEntry::new("CASH_OUT", amount("100")?);
    cash_out.record(amount("50")?);
    storage.restore(vec![cash_out.clone()]);

    assert!(storage.get("PAYMENT").is_none());
    assert_eq!(storage.snapshot(), vec![cash_out]);

    storage.restore(Vec::new());

    assert!(storage.is_empty());

    Ok(())
}

#[test]
fn test_random_upserts_keep_count_and_bounds_per_type() -> Result<()> {
    let kinds = ["CASH_OUT", "TRANSFER", "DEBIT"];

    for seed in 0..32 {
        let mut rng = StdRng::seed_from_u64(seed);
        let storage = AggregationStorage::new();
        let mut observed: BTreeMap<&str, Vec<Decimal>> = BTreeMap::new();

        for _ in 0..rng.random_range(1..200) {
            let kind = kinds[rng.random_range(0..kinds.len())];
            let value = Decimal::new(rng.random_range(0..10_000_000), rng.random_range(0..4));

            storage.upsert(kind, value);
            observed.entry(kind).or_default().push(value);
        }

        assert_eq!(storage.len(), observed.len());

        for (kind, values) in &observed {
            let entry = storage.get(kind).ok_or_else(|| anyhow!("{kind} entry missing for seed {seed}"))?;

            assert_eq!(entry.count, values.len() as u64);
            assert!(values.iter().all(|value| entry.min_amount <= *value && *value <= entry.max_amount));
            assert!(values.contains(&entry.min_amount) && values.contains(&entry.max_amount));
        }
    }

    Ok(())
}
