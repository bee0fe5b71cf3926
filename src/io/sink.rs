use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

use crate::io::atomic_write;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Transient I/O error while publishing to [{destination}]: {source}")]
    TransientIo {
        destination: String,
        #[source]
        source: io::Error
    }
}

/// Full-state output: every publish replaces whatever was published before.
pub trait Sink: Send + 'static {
    fn publish(&mut self, lines: &[String]) -> Result<(), SinkError>;
}

/// Publishes the current view as a text file, one line per entry.
pub struct FileSink {
    path: PathBuf
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into()
        }
    }
}

impl Sink for FileSink {
    fn publish(&mut self, lines: &[String]) -> Result<(), SinkError> {
        let mut contents = lines.join("\n");

        if !contents.is_empty() {
            contents.push('\n');
        }

        atomic_write(&self.path, contents.as_bytes()).map_err(|source| SinkError::TransientIo {
            destination: self.path.display().to_string(),
            source
        })?;

        debug!("Published [{}] lines to [{}]", lines.len(), self.path.display());

        Ok(())
    }
}
