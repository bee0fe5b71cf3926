use std::fs::File;
use std::io::{BufRead, BufReader};
use std::mem;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tokio::task::{spawn_blocking, JoinHandle};
use tracing::{debug, info};

use crate::types::{Batch, Offset, RawRecord};

/// Where and how the line reader consumes its input.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Newline-delimited input file; the zero-based line index is the record offset.
    pub path: PathBuf,
    /// First offset to deliver, everything before it is skipped.
    pub from_offset: Offset,
    /// Maximum number of records per batch.
    pub batch_size: usize,
    /// Keep polling for appended records once the end of the file is reached.
    pub follow: bool,
    pub poll_interval: Duration
}

/// Spawns a blocking reader which feeds batches of raw records into a bounded channel.
///
/// The stream ends when the input is exhausted (unless following), when the file cannot be
/// read, or when the receiving side is dropped. Open and read failures are returned through the handle.
pub fn spawn_reader(config: SourceConfig, backpressure: usize) -> (JoinHandle<Result<()>>, mpsc::Receiver<Batch>) {
    let (sender, receiver) = mpsc::channel::<Batch>(backpressure);

    let handle = spawn_blocking(move || -> Result<()> {
        let file = File::open(&config.path)
            .with_context(|| format!("Error opening input at path: {}", config.path.display()))?;

        let batch_size = config.batch_size.max(1);
        let mut reader = BufReader::new(file);
        let mut offset: Offset = 0;
        let mut line = Vec::new();
        let mut batch = Batch::with_capacity(batch_size);

        if config.from_offset > 0 {
            info!("Resuming input [{}] from offset [{}]", config.path.display(), config.from_offset);
        }

        loop {
            match reader.read_until(b'\n', &mut line) {
                Ok(0) => {
                    if !config.follow {
                        if !line.is_empty() && offset >= config.from_offset {
                            batch.push(RawRecord::new(offset, mem::take(&mut line)));
                        }

                        let _ = flush(&sender, &mut batch);
                        break;
                    }

                    if !flush(&sender, &mut batch) || sender.is_closed() {
                        break;
                    }

                    thread::sleep(config.poll_interval);
                }
                Ok(_) => {
                    //NOTE: A line without its terminator is still being written, wait for the rest of it
                    if !line.ends_with(b"\n") {
                        continue;
                    }

                    let bytes = strip_terminator(mem::take(&mut line));

                    if offset >= config.from_offset {
                        batch.push(RawRecord::new(offset, bytes));
                    }

                    offset += 1;

                    if batch.len() >= batch_size && !flush(&sender, &mut batch) {
                        break;
                    }
                }
                Err(error) => {
                    let _ = flush(&sender, &mut batch);
                    return Err(error).with_context(|| format!("Error reading input at path: {}", config.path.display()));
                }
            }
        }

        debug!("Input reader for [{}] finished at offset [{offset}]", config.path.display());

        Ok(())
    });

    (handle, receiver)
}

fn flush(sender: &mpsc::Sender<Batch>, batch: &mut Batch) -> bool {
    if batch.is_empty() {
        return true;
    }

    sender.blocking_send(mem::take(batch)).is_ok()
}

fn strip_terminator(mut bytes: Vec<u8>) -> Vec<u8> {
    if bytes.ends_with(b"\n") {
        bytes.pop();
    }

    if bytes.ends_with(b"\r") {
        bytes.pop();
    }

    bytes
}
