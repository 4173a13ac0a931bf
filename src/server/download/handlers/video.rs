use dioxus::prelude::*;
use server_fn::error::NoCustomError;

use crate::server::download::types::{DownloadRequest, SessionId};

#[cfg(feature = "server")]
use super::server_error;
#[cfg(feature = "server")]
use crate::server::download::{error::DownloadError, services::app_state, utils::validate_url};

/// Queue a download in the background and return right away.
///
/// Only a bad URL or an unusable destination directory fails the call;
/// everything else is reported through the session's progress list.
#[server(StartDownload)]
pub async fn start_download(
    session: SessionId,
    request: DownloadRequest,
) -> Result<(), ServerFnError<NoCustomError>> {
    tracing::info!(
        "Download request from session {}: URL={}, type={:?}, quality={:?}",
        session,
        request.url,
        request.media_type,
        request.quality
    );

    #[cfg(feature = "server")]
    {
        let state = app_state();
        let url = validate_url(&request.url)
            .map_err(|e| server_error(DownloadError::InvalidUrl(e)))?;
        let destination = if request.destination.trim().is_empty() {
            state.config.default_download_dir.to_string_lossy().to_string()
        } else {
            request.destination.trim().to_string()
        };

        let request = DownloadRequest {
            url,
            destination,
            ..request
        };
        let session = state.session(&session);
        state
            .orchestrator
            .submit(&session.store, request)
            .map_err(|e| {
                tracing::error!("Could not start download: {}", e);
                server_error(e)
            })?;
        Ok(())
    }

    #[cfg(not(feature = "server"))]
    Err(ServerFnError::<NoCustomError>::ServerError(
        "Server feature not enabled".to_string(),
    ))
}
