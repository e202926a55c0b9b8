use scraper::Html;
use tracing::{debug, info};
use url::Url;

use crate::{
    html_meta::{meta_content, resolve_video_url},
    outside::PageFetcher,
    platform::Platform,
    result::{Error, Result},
    slug::build_filename,
    types::VideoMetadata,
};

/// Clean up a user provided URL, defaulting to HTTPS when no scheme is given
pub fn normalize_url(raw_url: &str) -> Result<String> {
    let candidate = raw_url.trim();
    if candidate.is_empty() {
        return Err(Error::EmptyInput);
    }

    // "instagram.com:443/p/x" parses with "instagram.com" as the scheme,
    // so only a scheme followed by "//" counts
    let has_scheme = Url::parse(candidate)
        .is_ok_and(|url| candidate[url.scheme().len()..].starts_with("://"));
    if has_scheme {
        Ok(candidate.to_owned())
    } else {
        Ok(format!("https://{candidate}"))
    }
}

/// Read the metadata of an already fetched post page
pub fn extract_video_metadata(
    html: &str,
    source_url: &str,
    platform: Platform,
) -> Result<VideoMetadata> {
    let document = Html::parse_document(html);

    let video_url = resolve_video_url(&document).ok_or_else(|| Error::ResolutionFailure {
        url: source_url.to_owned(),
    })?;

    let title = meta_content(&document, "og:title");
    let caption = meta_content(&document, "og:description");
    let filename = build_filename(title.as_deref(), source_url, platform.id);

    Ok(VideoMetadata {
        platform: platform.id,
        source_url: source_url.to_owned(),
        video_url,
        filename,
        title,
        caption,
    })
}

/// Turns post URLs into [`VideoMetadata`]
pub struct Resolver<'a> {
    fetcher: &'a dyn PageFetcher,
}

impl<'a> Resolver<'a> {
    pub fn new(fetcher: &'a dyn PageFetcher) -> Self {
        Self { fetcher }
    }

    /// Find the platform of the URL, fetch its page and extract the metadata.
    ///
    /// Unsupported URLs are rejected before any request is made.
    pub fn fetch_metadata(&self, raw_url: &str) -> Result<VideoMetadata> {
        let url = normalize_url(raw_url)?;
        let platform = Platform::for_url(&url).ok_or_else(|| Error::UnsupportedDomain {
            url: raw_url.to_owned(),
        })?;
        debug!("{url} is handled by the {} scraper", platform.id);

        self.scrape(platform, &url)
    }

    fn scrape(&self, platform: Platform, url: &str) -> Result<VideoMetadata> {
        info!("Fetching page {url}");
        let html = self.fetcher.fetch_html(url)?;
        extract_video_metadata(&html, url, platform)
    }
}
