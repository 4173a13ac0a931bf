use dioxus::prelude::*;
use server_fn::error::NoCustomError;

use crate::server::download::types::SessionId;

#[cfg(feature = "server")]
use crate::server::download::services::app_state;

/// Start a new session for a freshly opened page
#[server(OpenSession)]
pub async fn open_session() -> Result<SessionId, ServerFnError<NoCustomError>> {
    #[cfg(feature = "server")]
    {
        let session = app_state().sessions.open();
        tracing::info!("Issued session handle {}", session.id);
        Ok(session.id.clone())
    }

    #[cfg(not(feature = "server"))]
    Err(ServerFnError::<NoCustomError>::ServerError(
        "Server feature not enabled".to_string(),
    ))
}

/// Destination directory the form starts with
#[server(GetDefaultDirectory)]
pub async fn get_default_directory() -> Result<String, ServerFnError<NoCustomError>> {
    #[cfg(feature = "server")]
    {
        Ok(app_state()
            .config
            .default_download_dir
            .to_string_lossy()
            .to_string())
    }

    #[cfg(not(feature = "server"))]
    Err(ServerFnError::<NoCustomError>::ServerError(
        "Server feature not enabled".to_string(),
    ))
}
