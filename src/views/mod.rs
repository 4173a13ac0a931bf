pub mod download;
pub use download::Download;

pub mod downloads;
pub use downloads::Downloads;

mod getinfo;
