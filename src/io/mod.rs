mod atomic;
mod reader;
mod sink;
#[cfg(test)]
mod tests;

pub use atomic::atomic_write;
pub use reader::{spawn_reader, SourceConfig};
pub use sink::{FileSink, Sink, SinkError};
