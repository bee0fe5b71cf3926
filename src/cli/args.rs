use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::level_filters::LevelFilter;

use crate::io::SourceConfig;
use crate::types::Offset;

/// Aggregates fraudulent transactions per type and republishes the summary on every change
#[derive(Parser, Debug)]
#[command(name = "fraud-analytics")]
#[command(about = "Streams transactions and maintains a per-type fraud summary", long_about = None)]
pub struct CliArgs {
    /// Input source to ingest transaction records from
    #[arg(short = 'i', long = "input", value_name = "SOURCE")]
    pub input: PathBuf,

    /// Output destination the fraud summary is published to
    #[arg(short = 'o', long = "output", value_name = "DESTINATION")]
    pub output: PathBuf,

    /// Directory to store checkpoints in
    #[arg(short = 'c', long = "check", value_name = "DIR")]
    pub checkpoint_dir: PathBuf,

    /// Number of records applied per batch
    #[arg(long = "batch-size", value_name = "SIZE", default_value_t = 500, value_parser = clap::value_parser!(u64).range(1..))]
    pub batch_size: u64,

    /// Keep waiting for new records once the end of the input is reached
    #[arg(long = "follow")]
    pub follow: bool,

    /// Delay between polls for new records when following the input
    #[arg(long = "poll-interval-ms", value_name = "MS", default_value_t = 500)]
    pub poll_interval_ms: u64,

    /// Log level: error, warn, info, debug or trace
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String
}

impl CliArgs {
    pub fn level_filter(&self) -> LevelFilter {
        parse_log_level(&self.log_level)
    }

    /// Input name as recorded in checkpoints, so a checkpoint is never applied to another source.
    pub fn source_name(&self) -> String {
        self.input.display().to_string()
    }

    pub fn source_config(&self, from_offset: Offset) -> SourceConfig {
        SourceConfig {
            path: self.input.clone(),
            from_offset,
            batch_size: usize::try_from(self.batch_size).unwrap_or(usize::MAX),
            follow: self.follow,
            poll_interval: Duration::from_millis(self.poll_interval_ms)
        }
    }
}

fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to 'error'", level);
            LevelFilter::ERROR
        }
    }
}
