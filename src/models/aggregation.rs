use std::fmt;
use std::fmt::{Display, Formatter};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Running fraud summary for a single transaction type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationEntry {
    /// Transaction type the entry summarises.
    pub kind: String,
    /// Number of fraudulent transactions of this type seen so far.
    pub count: u64,
    /// Largest fraud amount seen so far.
    pub max_amount: Decimal,
    /// Smallest fraud amount seen so far.
    pub min_amount: Decimal
}

impl AggregationEntry {
    /// Creates the entry for the first fraud of a given type.
    pub fn new(kind: impl Into<String>, amount: Decimal) -> Self {
        Self {
            kind: kind.into(),
            count: 1,
            max_amount: amount,
            min_amount: amount
        }
    }

    /// Folds one more fraud amount into the running summary.
    ///
    /// Ties keep the value already stored, so the rendered scale of an extremum never
    /// changes because an equal amount arrived with different precision.
    pub fn record(&mut self, amount: Decimal) {
        self.count = self.count.saturating_add(1);

        if amount > self.max_amount {
            self.max_amount = amount;
        }

        if amount < self.min_amount {
            self.min_amount = amount;
        }
    }

    /// Renders the published output line for this entry.
    pub fn format(&self) -> String {
        self.to_string()
    }
}

impl Display for AggregationEntry {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "Type: {}  Number of Frauds: {}  Biggest Fraud: {}  Smallest Fraud: {}",
            self.kind,
            self.count,
            self.max_amount,
            self.min_amount
        )
    }
}
