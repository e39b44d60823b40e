//! Atomic text I/O with file locking

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};

use fs2::FileExt;

use crate::{Error, NormalizedPath, Result};

static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Write content atomically to a file.
///
/// Writes to a locked temp file in the target directory, syncs it, then
/// renames it over the target. Missing parent directories are NOT created;
/// the resulting `NotFound` error is left for the caller to act on.
pub fn write_atomic(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    let native_path = path.to_native();

    // Same directory as the target so the rename stays on one filesystem
    let temp_name = format!(
        ".{}.{}.{}.tmp",
        native_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id(),
        TEMP_SEQ.fetch_add(1, Ordering::Relaxed)
    );
    let temp_path = native_path.with_file_name(&temp_name);

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;

    let written = (|| {
        temp_file.lock_exclusive().map_err(|_| Error::LockFailed {
            path: native_path.clone(),
        })?;
        temp_file
            .write_all(content)
            .map_err(|e| Error::io(&temp_path, e))?;
        temp_file.sync_all().map_err(|e| Error::io(&temp_path, e))?;
        temp_file.unlock().map_err(|_| Error::LockFailed {
            path: native_path.clone(),
        })
    })();
    drop(temp_file);

    let renamed = written.and_then(|()| {
        fs::rename(&temp_path, &native_path).map_err(|e| Error::io(&native_path, e))
    });
    if renamed.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    renamed
}

/// Read a file as UTF-8 text.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Write text content to a file atomically.
pub fn write_text(path: &NormalizedPath, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes())
}
