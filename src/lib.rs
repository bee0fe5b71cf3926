//! Streaming fraud analytics.
//!
//! Raw transaction records are parsed, filtered down to fraudulent ones and folded into a
//! per-type summary (count, biggest and smallest amount). Every change republishes the full
//! summary, and the input position is checkpointed together with the state that produced it.

pub mod checkpoint;
pub mod cli;
pub mod engine;
pub mod io;
pub mod models;
pub mod storage;
pub mod types;
