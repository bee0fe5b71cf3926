use super::{atomic_write, spawn_reader, FileSink, Sink, SourceConfig};
use crate::types::{Batch, RawRecord};

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Result};
use tempfile::{tempdir, NamedTempFile};
use tokio::sync::mpsc;
use tokio::time::timeout;

fn config(path: &Path, from_offset: u64, batch_size: usize) -> SourceConfig {
    SourceConfig {
        path: path.to_path_buf(),
        from_offset,
        batch_size,
        follow: false,
        poll_interval: Duration::from_millis(10)
    }
}

async fn collect(mut receiver: mpsc::Receiver<Batch>) -> Vec<Batch> {
    let mut batches = Vec::new();

    while let Some(batch) = receiver.recv().await {
        batches.push(batch);
    }

    batches
}

#[tokio::test]
async fn test_reader_groups_lines_into_batches_with_offsets() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    write!(file, "a\nb\r\nc\nd\ne")?;

    let (handle, receiver) = spawn_reader(config(file.path(), 0, 2), 4);
    let batches = collect(receiver).await;
    handle.await??;

    assert_eq!(batches.len(), 3);
    assert_eq!(batches[0], vec![RawRecord::new(0, "a"), RawRecord::new(1, "b")]);
    assert_eq!(batches[1], vec![RawRecord::new(2, "c"), RawRecord::new(3, "d")]);
    assert_eq!(batches[2], vec![RawRecord::new(4, "e")]);

    Ok(())
}

#[tokio::test]
async fn test_reader_skips_records_before_the_resume_offset() -> Result<()> {
    let mut file = NamedTempFile::new()?;

    for index in 0..10 {
        writeln!(file, "record-{index}")?;
    }

    let (handle, receiver) = spawn_reader(config(file.path(), 5, 100), 4);
    let records: Vec<_> = collect(receiver).await.into_iter().flatten().collect();
    handle.await??;

    let offsets: Vec<_> = records.iter().map(|record| record.offset).collect();

    assert_eq!(offsets, vec![5, 6, 7, 8, 9]);
    assert_eq!(records[0].bytes, b"record-5");

    Ok(())
}

#[tokio::test]
async fn test_reader_reports_missing_input_through_its_handle() -> Result<()> {
    let directory = tempdir()?;
    let (handle, receiver) = spawn_reader(config(&directory.path().join("missing.csv"), 0, 10), 4);

    assert!(collect(receiver).await.is_empty());

    let error = handle.await?.err().ok_or_else(|| anyhow!("missing input was not reported"))?;

    assert!(error.to_string().contains("missing.csv"));

    Ok(())
}

#[tokio::test]
async fn test_reader_follows_appended_records() -> Result<()> {
    let file = NamedTempFile::new()?;
    fs::write(file.path(), "first\nsec")?;

    let mut follow = config(file.path(), 0, 10);
    follow.follow = true;

    let (handle, mut receiver) = spawn_reader(follow, 4);

    let first = timeout(Duration::from_secs(5), receiver.recv()).await?
        .ok_or_else(|| anyhow!("stream closed before the first batch"))?;

    assert_eq!(first, vec![RawRecord::new(0, "first")]);

    OpenOptions::new().append(true).open(file.path())?.write_all(b"ond\n")?;

    let second = timeout(Duration::from_secs(5), receiver.recv()).await?
        .ok_or_else(|| anyhow!("stream closed before the appended batch"))?;

    assert_eq!(second, vec![RawRecord::new(1, "second")]);

    drop(receiver);
    handle.await??;

    Ok(())
}

#[test]
fn test_file_sink_replaces_previous_view() -> Result<()> {
    let directory = tempdir()?;
    let path = directory.path().join("frauds.txt");
    let mut sink = FileSink::new(&path);

    sink.publish(&["line one".to_string(), "line two".to_string()])?;

    assert_eq!(fs::read_to_string(&path)?, "line one\nline two\n");

    sink.publish(&["line three".to_string()])?;

    assert_eq!(fs::read_to_string(&path)?, "line three\n");

    sink.publish(&[])?;

    assert_eq!(fs::read_to_string(&path)?, "");
    assert_eq!(fs::read_dir(directory.path())?.count(), 1);

    Ok(())
}

#[test]
fn test_atomic_write_fails_without_touching_the_target_directory() -> Result<()> {
    let directory = tempdir()?;
    let target = directory.path().join("missing").join("file.txt");

    assert!(atomic_write(&target, b"data").is_err());
    assert!(!target.exists());

    Ok(())
}
