use dioxus::prelude::*;
use server_fn::error::NoCustomError;

use crate::common::Toaster;
use crate::server::download::{
    get_download_progress, get_video_info, list_downloaded_files, read_downloaded_file,
    start_download, validate_url, FileEntry, SessionId, TrackedDownload, VideoInfo,
};
use crate::views::download::platforms::save_bytes;
use crate::views::download::types::{DownloadForm, SAVE_MIME_TYPE};

/// Message text without the server function framing
pub fn describe(error: ServerFnError<NoCustomError>) -> String {
    match error {
        ServerFnError::ServerError(message) => message,
        other => other.to_string(),
    }
}

// Load metadata for the info card
pub async fn fetch_info(
    url: String,
    mut info: Signal<Option<VideoInfo>>,
    mut toast: Signal<Option<Toaster>>,
    mut loading: Signal<bool>,
) {
    if let Err(message) = validate_url(&url) {
        toast.set(Some(Toaster::Error(message)));
        return;
    }

    loading.set(true);
    info.set(None);
    match get_video_info(url.trim().to_string()).await {
        Ok(found) => {
            info.set(Some(found));
            toast.set(Some(Toaster::Success(
                "Video info loaded successfully".to_string(),
            )));
        }
        Err(e) => {
            toast.set(Some(Toaster::Error(format!("Error: {}", describe(e)))));
        }
    }
    loading.set(false);
}

// Submit the form and start tracking the new download
pub async fn start(
    session: Option<SessionId>,
    form: DownloadForm,
    mut toast: Signal<Option<Toaster>>,
    mut polling: Signal<bool>,
    jobs: Signal<Vec<TrackedDownload>>,
) {
    let Some(session) = session else {
        toast.set(Some(Toaster::Info(
            "Still connecting, try again in a moment".to_string(),
        )));
        return;
    };

    if let Err(message) = validate_url(&form.url) {
        toast.set(Some(Toaster::Error(message)));
        return;
    }

    match start_download(session.clone(), form.to_request()).await {
        Ok(()) => {
            toast.set(Some(Toaster::Success(
                "Download started! Follow its progress in the status panel.".to_string(),
            )));
            polling.set(true);
            refresh_jobs(session, jobs).await;
        }
        Err(e) => {
            tracing::warn!("Download request rejected: {}", e);
            toast.set(Some(Toaster::Error(describe(e))));
        }
    }
}

/// Reload the session's download list; true while anything is still running
pub async fn refresh_jobs(session: SessionId, mut jobs: Signal<Vec<TrackedDownload>>) -> bool {
    match get_download_progress(session).await {
        Ok(list) => {
            let active = list.iter().any(|entry| entry.record.is_active());
            jobs.set(list);
            active
        }
        Err(e) => {
            tracing::warn!("Failed to get download progress: {}", e);
            // keep polling, the next round may succeed
            true
        }
    }
}

pub async fn refresh_files(
    directory: String,
    mut files: Signal<Vec<FileEntry>>,
    mut error: Signal<Option<String>>,
) {
    match list_downloaded_files(directory).await {
        Ok(list) => {
            files.set(list);
            error.set(None);
        }
        Err(e) => error.set(Some(describe(e))),
    }
}

// Fetch a finished file and hand it to the browser
pub async fn save_file(directory: String, name: String, mut toast: Signal<Option<Toaster>>) {
    match read_downloaded_file(directory, name.clone()).await {
        Ok(bytes) => {
            if let Err(message) = save_bytes(&bytes, &name, SAVE_MIME_TYPE) {
                toast.set(Some(Toaster::Error(message)));
            }
        }
        Err(e) => toast.set(Some(Toaster::Error(format!(
            "Could not fetch {}: {}",
            name,
            describe(e)
        )))),
    }
}
