use dioxus::prelude::*;
use server_fn::error::NoCustomError;

use crate::server::download::types::FileEntry;

#[cfg(feature = "server")]
use super::server_error;
#[cfg(feature = "server")]
use crate::server::download::{services::app_state, storage};
#[cfg(feature = "server")]
use std::path::PathBuf;

#[cfg(feature = "server")]
fn resolve_directory(directory: &str) -> PathBuf {
    if directory.trim().is_empty() {
        app_state().config.default_download_dir.clone()
    } else {
        PathBuf::from(directory.trim())
    }
}

/// Files currently sitting in `directory`
#[server(ListDownloadedFiles)]
pub async fn list_downloaded_files(
    directory: String,
) -> Result<Vec<FileEntry>, ServerFnError<NoCustomError>> {
    #[cfg(feature = "server")]
    {
        storage::list_files(&resolve_directory(&directory))
            .await
            .map_err(server_error)
    }

    #[cfg(not(feature = "server"))]
    Err(ServerFnError::<NoCustomError>::ServerError(
        "Server feature not enabled".to_string(),
    ))
}

/// Bytes of one downloaded file, for saving in the browser
#[server(ReadDownloadedFile)]
pub async fn read_downloaded_file(
    directory: String,
    name: String,
) -> Result<Vec<u8>, ServerFnError<NoCustomError>> {
    tracing::info!("File requested: {} in {}", name, directory);

    #[cfg(feature = "server")]
    {
        storage::read_file(&resolve_directory(&directory), &name)
            .await
            .map_err(|e| {
                tracing::warn!("Could not serve {}: {}", name, e);
                server_error(e)
            })
    }

    #[cfg(not(feature = "server"))]
    Err(ServerFnError::<NoCustomError>::ServerError(
        "Server feature not enabled".to_string(),
    ))
}
