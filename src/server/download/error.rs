use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A fault reported by the extraction engine.
///
/// `Display` yields the bare description so it can be stored in a
/// progress record as-is.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0}")]
    Fault(String),

    #[error("failed to launch yt-dlp: {0}")]
    Launch(#[source] io::Error),

    #[error("I/O error while talking to yt-dlp: {0}")]
    Io(#[from] io::Error),

    #[error("yt-dlp is not available: {0}")]
    Unavailable(String),
}

/// Errors raised by orchestration and the file library
#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("Failed to create directory {}: {source}", path.display())]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read directory {}: {source}", path.display())]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read file {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid file name: {0}")]
    InvalidFileName(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

pub type Result<T> = std::result::Result<T, DownloadError>;
