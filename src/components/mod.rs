pub mod download_progress;
pub use download_progress::DownloadProgress;

mod navbar;
pub use navbar::Navbar;
