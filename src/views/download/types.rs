use crate::server::download::{DownloadRequest, MediaType, Quality};

/// Delay between progress refreshes while downloads are running
pub const POLL_INTERVAL_MS: u32 = 1000;

/// Every saved file is offered with the same generic video type
pub const SAVE_MIME_TYPE: &str = "video/mp4";

// Form state captured when the user presses "Start download"
#[derive(Clone, Debug, PartialEq)]
pub struct DownloadForm {
    pub url: String,
    pub media_type: MediaType,
    pub quality: Quality,
    pub directory: String,
}

impl DownloadForm {
    pub fn to_request(&self) -> DownloadRequest {
        DownloadRequest {
            url: self.url.trim().to_string(),
            quality: self.quality,
            media_type: self.media_type,
            destination: self.directory.trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_is_trimmed() {
        let form = DownloadForm {
            url: "  https://example.com/v1\n".into(),
            media_type: MediaType::Audio,
            quality: Quality::Hd720,
            directory: " ./downloads ".into(),
        };
        let request = form.to_request();
        assert_eq!(request.url, "https://example.com/v1");
        assert_eq!(request.destination, "./downloads");
        assert_eq!(request.media_type, MediaType::Audio);
        assert_eq!(request.quality, Quality::Hd720);
    }
}
