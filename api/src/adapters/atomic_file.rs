//! Whole-file replacement that never leaves a half-written file behind.
//!
//! Content goes to a sibling `.tmp` file which is synced and then renamed
//! over the destination, so readers see either the old or the new file.
//! The parent directory is synced afterwards so the rename itself is durable.

use std::io;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

pub const TEMP_EXTENSION: &str = "tmp";

pub async fn atomic_write(path: &Path, contents: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let temp_path = path.with_extension(TEMP_EXTENSION);
    let written = async {
        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(contents).await?;
        file.sync_all().await?;
        fs::rename(&temp_path, path).await
    }
    .await;

    if written.is_err() {
        let _ = fs::remove_file(&temp_path).await;
        return written;
    }

    match path.parent() {
        Some(parent) => sync_directory(parent).await,
        None => Ok(()),
    }
}

#[cfg(unix)]
async fn sync_directory(directory: &Path) -> io::Result<()> {
    let directory = if directory.as_os_str().is_empty() {
        Path::new(".")
    } else {
        directory
    };
    fs::File::open(directory).await?.sync_all().await
}

// Directories cannot be opened as files here; the rename is as durable as
// the filesystem makes it.
#[cfg(not(unix))]
async fn sync_directory(_directory: &Path) -> io::Result<()> {
    Ok(())
}

/// Whether `file_name` is a staging file left by an interrupted write.
pub fn is_temp_file(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .map_or(false, |extension| extension == TEMP_EXTENSION)
}

/// Reads `path` as UTF-8, returning `None` when it does not exist.
pub async fn read_to_string_if_exists(path: &Path) -> io::Result<Option<String>> {
    match fs::read_to_string(path).await {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}
