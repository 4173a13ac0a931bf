// Fallbacks used outside the browser (server-side rendering)

// Non-web fallback implementation using base64
#[cfg(not(feature = "web"))]
pub fn create_blob_url(data: &[u8], mime_type: &str) -> Option<String> {
    use base64::{engine::general_purpose::STANDARD, Engine};
    let base64_data = STANDARD.encode(data);
    let data_url = format!("data:{};base64,{}", mime_type, base64_data);
    Some(data_url)
}

// No-op for trigger_download on non-web platforms
#[cfg(not(feature = "web"))]
pub fn trigger_download(_url: &str, filename: &str) {
    tracing::warn!("Ignoring save request for {} outside the browser", filename);
}

#[cfg(not(feature = "web"))]
pub async fn sleep_ms(ms: u32) {
    futures_timer::Delay::new(std::time::Duration::from_millis(ms as u64)).await;
}
