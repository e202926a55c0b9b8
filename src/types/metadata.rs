use std::{fmt::Display, path::PathBuf};

/// Maximum number of characters of the caption shown when printing metadata
const CAPTION_PREVIEW_LEN: usize = 200;

/// Everything resolved about a post before downloading it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoMetadata {
    pub platform: &'static str,
    pub source_url: String,
    pub video_url: String,
    pub filename: String,
    pub title: Option<String>,
    pub caption: Option<String>,
}

impl Display for VideoMetadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let caption: Option<String> = self
            .caption
            .as_deref()
            .map(|c| c.chars().take(CAPTION_PREVIEW_LEN).collect());

        writeln!(f, "{:>10}  {}", "Platform", self.platform)?;
        writeln!(f, "{:>10}  {}", "Title", self.title.as_deref().unwrap_or("-"))?;
        writeln!(f, "{:>10}  {}", "Caption", caption.as_deref().unwrap_or("-"))?;
        writeln!(f, "{:>10}  {}", "Video URL", self.video_url)?;
        write!(f, "{:>10}  {}", "Filename", self.filename)
    }
}

/// A metadata record along with where its video ended up on disk
#[derive(Debug)]
pub struct DownloadResult {
    pub metadata: VideoMetadata,
    pub output_path: PathBuf,
}
