use std::{
    io::{ErrorKind, Read, Write},
    path::Path,
};

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use crate::{
    io::{ensure_dir, partial_file, persist},
    outside::PageFetcher,
    result::{Error, Result},
    types::{DownloadResult, VideoMetadata},
};

pub const DEFAULT_CHUNK_SIZE: usize = 128 * 1024;

const BAR_TEMPLATE: &str =
    "{msg:.bold.blue} {bar:40} {bytes}/{total_bytes} {bytes_per_sec} {eta}";
const SPINNER_TEMPLATE: &str = "{spinner} {msg:.bold.blue} {bytes} {bytes_per_sec}";

/// Saves resolved videos to disk
pub struct Downloader<'a> {
    fetcher: &'a dyn PageFetcher,
    chunk_size: usize,
}

impl<'a> Downloader<'a> {
    pub fn new(fetcher: &'a dyn PageFetcher, chunk_size: usize) -> Self {
        Self {
            fetcher,
            chunk_size: chunk_size.max(1),
        }
    }

    /// Stream the video to `output_dir/<filename>`.
    ///
    /// The data goes to a temporary file first and is moved in place once
    /// complete: a failed download leaves the output directory as it was.
    pub fn download(
        &self,
        metadata: VideoMetadata,
        output_dir: &Path,
        overwrite: bool,
    ) -> Result<DownloadResult> {
        ensure_dir(output_dir)?;

        let destination = output_dir.join(&metadata.filename);
        if destination.exists() && !overwrite {
            return Err(Error::AlreadyExists { path: destination });
        }

        let url = metadata.video_url.as_str();
        info!("Downloading {url}");
        let stream = self.fetcher.open_stream(url)?;
        debug!("Announced size: {:?} bytes", stream.content_length);

        // Only create the file once the server agreed to send it
        let mut file = partial_file(output_dir)?;
        let progress = progress_bar(stream.content_length);

        let mut body = stream.body;
        let mut buf = vec![0u8; self.chunk_size];
        let path = file.path().to_owned();
        let written = copy_body(&mut *body, &mut file, &path, url, &mut buf, &progress)?;

        let output_path = persist(file, &destination, overwrite)?;
        info!("Saved {written} bytes to {}", output_path.display());

        Ok(DownloadResult {
            metadata,
            output_path,
        })
    }
}

/// Copy the whole body into `out`, then finish the progress bar.
/// The bar is abandoned on the first failed read or write.
fn copy_body(
    body: &mut dyn Read,
    out: &mut impl Write,
    out_path: &Path,
    url: &str,
    buf: &mut [u8],
    progress: &ProgressBar,
) -> Result<u64> {
    match copy_chunks(body, out, out_path, url, buf, progress) {
        Ok(written) => {
            progress.finish_and_clear();
            Ok(written)
        }
        Err(err) => {
            progress.abandon();
            Err(err)
        }
    }
}

fn copy_chunks(
    body: &mut dyn Read,
    out: &mut impl Write,
    out_path: &Path,
    url: &str,
    buf: &mut [u8],
    progress: &ProgressBar,
) -> Result<u64> {
    let mut written = 0u64;
    loop {
        let n = match body.read(buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(Error::network(url)(err)),
        };

        out.write_all(&buf[..n])
            .map_err(|err| Error::io(out_path)(err))?;
        written += n as u64;
        progress.inc(n as u64);
    }
    out.flush().map_err(|err| Error::io(out_path)(err))?;

    Ok(written)
}

/// A byte progress bar when the size is known, a spinner otherwise
fn progress_bar(total: Option<u64>) -> ProgressBar {
    let (progress, template) = match total {
        Some(total) => (ProgressBar::new(total), BAR_TEMPLATE),
        None => (ProgressBar::new_spinner(), SPINNER_TEMPLATE),
    };

    if let Ok(style) = ProgressStyle::with_template(template) {
        progress.set_style(style);
    }
    progress.set_message("downloading");
    progress
}
