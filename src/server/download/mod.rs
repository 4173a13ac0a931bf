// Download functionality module

// Types shared with the browser
pub mod types;
pub use types::*;

// Formatting and parsing helpers
pub mod utils;
pub use utils::*;

// Server functions
pub mod handlers;
pub use handlers::*;

#[cfg(feature = "server")]
pub mod config;
#[cfg(feature = "server")]
pub mod engine;
#[cfg(feature = "server")]
pub mod error;
#[cfg(feature = "server")]
pub mod orchestrator;
#[cfg(feature = "server")]
pub mod services;
#[cfg(feature = "server")]
pub mod session;
#[cfg(feature = "server")]
pub mod storage;
#[cfg(feature = "server")]
pub mod tracker;

// yt-dlp handling
#[cfg(feature = "server")]
pub mod ytdlp;
