// Types shared between the browser and the server
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle identifying one browser session
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    #[cfg(feature = "server")]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the user wants out of the URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    Video,
    Audio,
}

impl MediaType {
    pub fn label(&self) -> &'static str {
        match self {
            MediaType::Video => "Video",
            MediaType::Audio => "Audio",
        }
    }
}

/// Video quality choices offered in the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    #[default]
    Best,
    Worst,
    Hd720,
    Sd480,
    Sd360,
}

impl Quality {
    pub const ALL: [Quality; 5] = [
        Quality::Best,
        Quality::Worst,
        Quality::Hd720,
        Quality::Sd480,
        Quality::Sd360,
    ];

    /// yt-dlp format selector for this quality
    pub fn format_selector(&self) -> &'static str {
        match self {
            Quality::Best => "best",
            Quality::Worst => "worst",
            Quality::Hd720 => "bestvideo[height<=720]+bestaudio/best[height<=720]",
            Quality::Sd480 => "bestvideo[height<=480]+bestaudio/best[height<=480]",
            Quality::Sd360 => "bestvideo[height<=360]+bestaudio/best[height<=360]",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Quality::Best => "Best quality",
            Quality::Worst => "Lowest quality",
            Quality::Hd720 => "720p",
            Quality::Sd480 => "480p",
            Quality::Sd360 => "360p",
        }
    }

    /// Stable key used as the `<option>` value
    pub fn key(&self) -> &'static str {
        match self {
            Quality::Best => "best",
            Quality::Worst => "worst",
            Quality::Hd720 => "720p",
            Quality::Sd480 => "480p",
            Quality::Sd360 => "360p",
        }
    }

    pub fn from_key(key: &str) -> Option<Quality> {
        Quality::ALL.into_iter().find(|q| q.key() == key)
    }
}

/// A download the user asked for. Never changes after submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadRequest {
    pub url: String,
    pub quality: Quality,
    pub media_type: MediaType,
    pub destination: String,
}

/// Lifecycle of one tracked download
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Queued,
    Running,
    Completed,
    Failed,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed | JobState::Failed)
    }
}

/// Snapshot of a download's progress as shown to the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub request: DownloadRequest,
    pub percent: u8,
    pub status: String,
    pub filename: Option<String>,
    pub error: Option<String>,
    pub state: JobState,
}

impl ProgressRecord {
    pub fn is_active(&self) -> bool {
        !self.state.is_terminal()
    }

    /// File name without the directory part
    pub fn display_filename(&self) -> Option<String> {
        self.filename.as_ref().map(|name| {
            std::path::Path::new(name)
                .file_name()
                .map(|base| base.to_string_lossy().to_string())
                .unwrap_or_else(|| name.clone())
        })
    }
}

/// One row of the session's download list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedDownload {
    pub url: String,
    pub record: ProgressRecord,
}

/// Metadata shown by the "fetch info" action
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VideoInfo {
    pub title: Option<String>,
    pub uploader: Option<String>,
    pub duration: Option<String>,
    pub view_count: Option<u64>,
    pub upload_date: Option<String>,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
}

/// A file sitting in the destination directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    pub size_bytes: u64,
}

impl FileEntry {
    pub fn size_mb(&self) -> f64 {
        self.size_bytes as f64 / (1024.0 * 1024.0)
    }

    pub fn display_size(&self) -> String {
        format!("{:.1} MB", self.size_mb())
    }
}
