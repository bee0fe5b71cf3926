use std::io::stderr;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use fraud_analytics::checkpoint::CheckpointManager;
use fraud_analytics::cli::CliArgs;
use fraud_analytics::engine::UpdateEngine;
use fraud_analytics::io::{spawn_reader, FileSink};
use fraud_analytics::storage::AggregationStorage;

const BACKPRESSURE: usize = 16;

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();

    setup_logging(args.level_filter());

    let checkpoints = CheckpointManager::new(&args.checkpoint_dir, args.source_name());
    let sink = FileSink::new(&args.output);
    let mut engine = UpdateEngine::recover(AggregationStorage::new(), sink, checkpoints)
        .inspect_err(|error| error!("Unable to recover from checkpoint: {error}"))?;

    info!("Starting at offset [{}] for input [{}]", engine.offset(), args.source_name());

    let (reader_handle, receiver) = spawn_reader(args.source_config(engine.offset()), BACKPRESSURE);

    let timer = Instant::now();
    let result = engine.run(receiver).await;
    let duration = timer.elapsed();

    let offset = result.inspect_err(|error| error!("Stopping: {error}"))?;

    reader_handle.await?
        .inspect_err(|error| error!("Input ingestion failed: {error:#}"))?;

    let stats = engine.stats();

    info!(
        "Processed up to offset [{offset}] in {duration:?}: {} batches, {} records, {} applied, {} ignored, {} skipped, {} already committed, {} publishes, {} commits",
        stats.batches,
        stats.records,
        stats.applied,
        stats.ignored,
        stats.skipped,
        stats.duplicates,
        stats.publishes,
        stats.commits
    );

    Ok(())
}

fn setup_logging(level: LevelFilter) {
    //NOTE: The published view goes to the output destination, logging stays on stderr
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .init();
}
