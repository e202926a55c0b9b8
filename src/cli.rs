use std::path::PathBuf;

use clap::Parser;
use indoc::indoc;
use tracing::Level;

macro_rules! arg_env {
    ($v:literal) => {
        concat!("SEDOT_", $v)
    };
}

const AFTER_HELP: &str = indoc! {"
    Settings (output directory, headers, timeouts) can also be given in a
    `sedot.toml` file or with `SEDOT_*` environment variables,
    e.g. SEDOT_OUTPUT_DIR=videos.

    Examples:
      sedot https://www.instagram.com/reel/C0dE/
      sedot -o clips --overwrite https://www.threads.net/@user/post/C0dE
"};

/// Download videos from Instagram posts/reels and Threads.
#[derive(Parser, Debug)]
#[command(version, about, after_help = AFTER_HELP)]
pub struct Args {
    /// Instagram/Threads post URLs to download.
    /// Provide multiple URLs separated by spaces.
    #[arg(value_name = "URL", required = true)]
    pub urls: Vec<String>,

    /// Directory where the videos will be stored [default: downloads]
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Replace files that already exist
    #[arg(long)]
    pub overwrite: bool,

    /// Only fetch metadata without downloading the video
    #[arg(long)]
    pub dry_run: bool,

    /// Print metadata before downloading
    #[arg(long)]
    pub show_metadata: bool,

    /// Read settings from this TOML file instead of `./sedot.toml`
    #[arg(long, value_name = "FILE", env = arg_env!("CONFIG"))]
    pub config: Option<PathBuf>,

    /// Verbosity of the logs written to stderr
    #[arg(long, default_value_t = Level::WARN, env = arg_env!("LOG_LEVEL"))]
    pub log_level: Level,
}
