mod extension;
mod metadata;

pub use extension::Extension;
pub use metadata::{DownloadResult, VideoMetadata};
