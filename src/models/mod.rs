mod aggregation;
mod errors;
mod transaction;

pub use aggregation::AggregationEntry;
pub use errors::ParseError;
pub use transaction::Transaction;
