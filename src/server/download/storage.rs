use std::path::{Component, Path, PathBuf};
use tokio::fs;

use super::error::{DownloadError, Result};
use super::types::FileEntry;

/// Create the destination directory (and parents) if it is missing
pub fn ensure_directory(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }

    std::fs::create_dir_all(path).map_err(|source| DownloadError::CreateDirectory {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!("Created download directory {}", path.display());
    Ok(())
}

/// Regular files in `dir`, sorted by name. A missing directory is empty.
pub async fn list_files(dir: &Path) -> Result<Vec<FileEntry>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let read_error = |source| DownloadError::ReadDirectory {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = fs::read_dir(dir).await.map_err(read_error)?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(read_error)? {
        let metadata = match entry.metadata().await {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::warn!("Skipping {:?}: {}", entry.path(), e);
                continue;
            }
        };
        if !metadata.is_file() {
            continue;
        }
        files.push(FileEntry {
            name: entry.file_name().to_string_lossy().to_string(),
            size_bytes: metadata.len(),
        });
    }

    files.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(files)
}

/// Resolve `name` inside `dir`, refusing anything that is not a plain file name
pub fn resolve_file(dir: &Path, name: &str) -> Result<PathBuf> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(dir.join(name)),
        _ => Err(DownloadError::InvalidFileName(name.to_string())),
    }
}

/// Full contents of a downloaded file
pub async fn read_file(dir: &Path, name: &str) -> Result<Vec<u8>> {
    let path = resolve_file(dir, name)?;
    let bytes = fs::read(&path)
        .await
        .map_err(|source| DownloadError::ReadFile {
            path: path.clone(),
            source,
        })?;
    tracing::info!("Serving {} ({} bytes)", path.display(), bytes.len());
    Ok(bytes)
}
