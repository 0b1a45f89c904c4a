//! Atomic file replacement.
//!
//! Data goes to a hidden temp file next to the target, is flushed and
//! fsynced, then renamed over the target. Readers see either the old file or
//! the new one. The temp file is removed again if any step fails.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::trace;

/// Replace `path` with `data`, creating parent directories as needed.
pub async fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }

    let tmp = temp_path_for(path)?;
    let result = write_then_rename(&tmp, path, data).await;
    if result.is_err() {
        // Best effort; the write error is what gets reported.
        let _ = fs::remove_file(&tmp).await;
    }
    result
}

async fn write_then_rename(tmp: &Path, path: &Path, data: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(tmp).await?;
    file.write_all(data).await?;
    file.flush().await?;
    file.sync_all().await?;
    drop(file);

    trace!(tmp = %tmp.display(), target = %path.display(), "Renaming temp file into place");
    fs::rename(tmp, path).await
}

/// `dir/.name.tmp` for `dir/name`.
fn temp_path_for(path: &Path) -> io::Result<PathBuf> {
    let name = path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} does not name a file", path.display()),
        )
    })?;

    let mut tmp_name = OsString::from(".");
    tmp_name.push(name);
    tmp_name.push(".tmp");
    Ok(path.with_file_name(tmp_name))
}
