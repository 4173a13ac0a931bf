// Platform-specific implementations
mod common;
#[cfg(feature = "web")]
mod web;

// Export platform-specific functions
#[cfg(not(feature = "web"))]
pub use common::{create_blob_url, sleep_ms, trigger_download};
#[cfg(feature = "web")]
pub use web::{create_blob_url, sleep_ms, trigger_download};

/// Blob URLs hold browser memory until revoked; data URLs don't
#[cfg_attr(not(feature = "web"), allow(dead_code))]
pub(crate) fn is_object_url(url: &str) -> bool {
    url.starts_with("blob:")
}

/// Hand `data` to the browser as a file download
pub fn save_bytes(data: &[u8], filename: &str, mime_type: &str) -> Result<(), String> {
    let url = create_blob_url(data, mime_type)
        .ok_or_else(|| "Could not prepare the file for saving".to_string())?;
    trigger_download(&url, filename);
    Ok(())
}
