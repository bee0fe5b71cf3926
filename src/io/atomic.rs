use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;
use std::process;

/// Replaces the file at `path` with `data` in a single step.
///
/// The payload is written and synced to a sibling temporary file which is then renamed over
/// the target, so a crash leaves either the previous contents or the new ones.
pub fn atomic_write(path: &Path, data: &[u8]) -> io::Result<()> {
    let file_name = path.file_name().and_then(|name| name.to_str()).unwrap_or("file");
    let temp_path = path.with_file_name(format!(".{file_name}.{}.tmp", process::id()));

    let result = write_synced(&temp_path, data).and_then(|_| fs::rename(&temp_path, path));

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
        return result;
    }

    //NOTE: Directory fsync makes the rename itself durable, it is best effort and not supported everywhere
    #[cfg(unix)]
    {
        if let Some(parent) = path.parent() {
            if let Ok(directory) = File::open(parent) {
                let _ = directory.sync_all();
            }
        }
    }

    Ok(())
}

fn write_synced(path: &Path, data: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data)?;
    file.sync_all()
}
