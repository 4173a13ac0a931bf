use dioxus::prelude::*;
use server_fn::error::NoCustomError;

use crate::server::download::types::VideoInfo;

#[cfg(feature = "server")]
use super::server_error;
#[cfg(feature = "server")]
use crate::server::download::{services::app_state, utils::validate_url};

/// Get video info without downloading
#[server(GetVideoInfo)]
pub async fn get_video_info(url: String) -> Result<VideoInfo, ServerFnError<NoCustomError>> {
    tracing::info!("Getting video info for: {}", url);

    #[cfg(feature = "server")]
    {
        let url = validate_url(&url).map_err(server_error)?;
        app_state().engine().fetch_info(&url).await.map_err(|e| {
            tracing::warn!("Info extraction failed for {}: {}", url, e);
            server_error(e)
        })
    }

    #[cfg(not(feature = "server"))]
    Err(ServerFnError::<NoCustomError>::ServerError(
        "Server feature not enabled".to_string(),
    ))
}
