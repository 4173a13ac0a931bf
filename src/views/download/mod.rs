// Export all parts of the download module
pub(crate) mod handlers;
pub(crate) mod platforms;
mod types;
mod ui;

// Re-export the main component
pub use ui::Download;
