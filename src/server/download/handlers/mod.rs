// Server functions called from the browser

// Session handles
pub mod lifecycle;
pub use lifecycle::*;

// Video info handlers
pub mod info;
pub use info::*;

// Download handlers
pub mod video;
pub use video::*;

// Progress tracking
pub mod progress;
pub use progress::*;

// Completed files
pub mod files;
pub use files::*;

#[cfg(feature = "server")]
use dioxus::prelude::*;
#[cfg(feature = "server")]
use server_fn::error::NoCustomError;

/// Report a server-side failure to the caller as plain text
#[cfg(feature = "server")]
pub(crate) fn server_error(e: impl std::fmt::Display) -> ServerFnError<NoCustomError> {
    ServerFnError::<NoCustomError>::ServerError(e.to_string())
}
