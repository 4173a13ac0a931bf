use dioxus::prelude::*;
use server_fn::error::NoCustomError;

use crate::server::download::types::{SessionId, TrackedDownload};

#[cfg(feature = "server")]
use crate::server::download::services::app_state;

/// Every download tracked for this session, in submission order
#[server(GetDownloadProgress)]
pub async fn get_download_progress(
    session: SessionId,
) -> Result<Vec<TrackedDownload>, ServerFnError<NoCustomError>> {
    #[cfg(feature = "server")]
    {
        Ok(app_state().session(&session).store.get_all())
    }

    #[cfg(not(feature = "server"))]
    Err(ServerFnError::<NoCustomError>::ServerError(
        "Server feature not enabled".to_string(),
    ))
}
