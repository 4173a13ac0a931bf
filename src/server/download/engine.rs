use async_trait::async_trait;
use std::path::Path;

use super::error::EngineError;
use super::tracker::ProgressEvent;
use super::types::{DownloadRequest, MediaType, VideoInfo};

/// Receives progress events while a download runs
pub type ProgressCallback<'a> = &'a (dyn Fn(ProgressEvent) + Send + Sync);

/// Audio post-processing requested after extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioExtraction {
    pub codec: &'static str,
    pub quality: &'static str,
}

/// Everything the engine needs to run one download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineJob {
    pub url: String,
    pub output_template: String,
    pub format: String,
    pub audio: Option<AudioExtraction>,
}

impl EngineJob {
    pub fn from_request(request: &DownloadRequest) -> Self {
        let output_template = Path::new(&request.destination)
            .join("%(title)s.%(ext)s")
            .to_string_lossy()
            .to_string();

        match request.media_type {
            MediaType::Video => Self {
                url: request.url.clone(),
                output_template,
                format: request.quality.format_selector().to_string(),
                audio: None,
            },
            MediaType::Audio => Self {
                url: request.url.clone(),
                output_template,
                format: "bestaudio/best".to_string(),
                audio: Some(AudioExtraction {
                    codec: "mp3",
                    quality: "192",
                }),
            },
        }
    }
}

/// The external extraction/download engine.
///
/// `download` resolves once the transfer is over; `on_progress` is called
/// from inside that future for every event the engine reports.
#[async_trait]
pub trait DownloadEngine: Send + Sync {
    async fn fetch_info(&self, url: &str) -> Result<VideoInfo, EngineError>;

    async fn download(
        &self,
        job: &EngineJob,
        on_progress: ProgressCallback<'_>,
    ) -> Result<(), EngineError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::download::types::Quality;

    fn request(media_type: MediaType, quality: Quality) -> DownloadRequest {
        DownloadRequest {
            url: "https://example.com/v1".into(),
            quality,
            media_type,
            destination: "downloads".into(),
        }
    }

    #[test]
    fn video_jobs_use_quality_selector() {
        let job = EngineJob::from_request(&request(MediaType::Video, Quality::Sd480));
        assert_eq!(
            job.format,
            "bestvideo[height<=480]+bestaudio/best[height<=480]"
        );
        assert!(job.audio.is_none());
        assert!(job.output_template.ends_with("%(title)s.%(ext)s"));
        assert!(job.output_template.starts_with("downloads"));
    }

    #[test]
    fn audio_jobs_request_mp3_extraction() {
        let job = EngineJob::from_request(&request(MediaType::Audio, Quality::Worst));
        assert_eq!(job.format, "bestaudio/best");
        assert_eq!(
            job.audio,
            Some(AudioExtraction {
                codec: "mp3",
                quality: "192",
            })
        );
    }
}
