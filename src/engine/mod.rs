mod errors;
mod update_engine;

pub use errors::EngineError;
pub use update_engine::{published_view, EngineStats, UpdateEngine, MIN_PUBLISHED_COUNT};
