//! Atomic file writes and cross-process file locking for the durable-state
//! crates (event log, cache, rate budget, trust ledger, checkpoints).
//!
//! Every durable artifact in the control plane is updated in isolation —
//! there are no cross-file transactions — so the primitives here are
//! deliberately small: write-temp-then-rename for atomicity within a single
//! file, and a dedicated `.lock` file per directory for mutual exclusion
//! across processes.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Write `data` to `path` atomically: write to a UUID-suffixed temp file in
/// the same directory, fsync it, then rename over the destination. On
/// POSIX filesystems the rename is atomic, so readers never observe a
/// partially written file.
pub fn atomic_write(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let temp_name = format!(
        ".{}.{}.tmp",
        path.file_name().and_then(|n| n.to_str()).unwrap_or("file"),
        uuid::Uuid::new_v4()
    );
    let temp_path = path.with_file_name(temp_name);

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = File::create(&temp_path)?;
    file.write_all(data)?;
    file.sync_all()?;

    std::fs::rename(&temp_path, path)?;

    #[cfg(unix)]
    {
        if let Some(parent) = path.parent() {
            if let Ok(dir) = File::open(parent) {
                let _ = dir.sync_all();
            }
        }
    }

    Ok(())
}

/// Append `line` (with a trailing newline) to `path`, creating it if
/// necessary. Used for JSONL event/log files where the file itself grows
/// by appending rather than rewriting.
pub fn append_line(path: &Path, line: &str) -> std::io::Result<()> {
    use std::fs::OpenOptions;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(line.as_bytes())?;
    if !line.ends_with('\n') {
        file.write_all(b"\n")?;
    }
    Ok(())
}

/// An exclusively-locked `<dir>/.lock` file held for the lifetime of the
/// guard. Serializes writers across processes to a shared directory (rate
/// state, trust ledger, proposal store).
pub struct DirLock {
    _file: File,
}

impl DirLock {
    /// Block until the exclusive lock on `dir`'s `.lock` file is acquired.
    pub fn acquire(dir: &Path) -> std::io::Result<Self> {
        std::fs::create_dir_all(dir)?;
        let lock_path = dir.join(".lock");
        let file = File::create(&lock_path)?;
        fs2::FileExt::lock_exclusive(&file)?;
        Ok(Self { _file: file })
    }
}

impl Drop for DirLock {
    fn drop(&mut self) {
        let _ = fs2::FileExt::unlock(&self._file);
    }
}

/// Returns the path a [`DirLock`] would use for `dir`, for callers that
/// need to reference it without acquiring the lock.
pub fn lock_path(dir: &Path) -> PathBuf {
    dir.join(".lock")
}
