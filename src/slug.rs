use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use url::Url;

use crate::types::Extension;

/// Fallback used for title and URL slugs that end up empty
pub const DEFAULT_SLUG: &str = "video";

/// Used when not a single part of the filename survived slugification
const DEFAULT_BASENAME: &str = "sedot-video";

/// Used when the URL has neither a path segment nor a host
const DEFAULT_URL_NAME: &str = "download";

/// Every run of characters that cannot appear in a slug
static NON_SLUG_RE: OnceLock<Regex> = OnceLock::new();

fn non_slug_re() -> &'static Regex {
    NON_SLUG_RE.get_or_init(|| Regex::new(r"[^a-z0-9]+").unwrap())
}

/// Create a filesystem-friendly slug from a string.
///
/// Accents are decomposed and every non-ASCII character is dropped.
/// If nothing is left, `fallback` is returned as-is.
pub fn slugify(value: &str, fallback: &str) -> String {
    let ascii: String = value
        .nfkd()
        .filter(char::is_ascii)
        .collect::<String>()
        .trim()
        .to_lowercase();

    let slug = non_slug_re().replace_all(&ascii, "-");
    let slug = slug.trim_matches('-');

    if slug.is_empty() {
        fallback.to_owned()
    } else {
        slug.to_owned()
    }
}

/// Return the last meaningful part of a URL, to be used in a filename.
///
/// This is the last non-empty path segment, or the host when the path is empty.
pub fn filename_from_url(url: &str) -> String {
    let candidate = match Url::parse(url) {
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
            .map(str::to_owned)
            .or_else(|| parsed.host_str().map(str::to_owned))
            .unwrap_or_default(),
        // Not a full URL, treat it as a bare path
        Err(_) => url
            .rsplit('/')
            .find(|s| !s.is_empty())
            .unwrap_or_default()
            .to_owned(),
    };

    let candidate = candidate.trim_matches('/');
    if candidate.is_empty() {
        DEFAULT_URL_NAME.to_owned()
    } else {
        candidate.to_owned()
    }
}

/// Append the extension unless the name already ends with it, ignoring case
pub fn ensure_extension(name: &str, extension: &str) -> String {
    if name.to_lowercase().ends_with(&extension.to_lowercase()) {
        name.to_owned()
    } else {
        format!("{name}{extension}")
    }
}

/// Create a descriptive filename for a downloaded video.
///
/// Format: `<platform>[-<title>]-<url name>.mp4`
pub fn build_filename(title: Option<&str>, source_url: &str, platform: &str) -> String {
    let mut parts = vec![
        slugify(platform, platform),
        slugify(&filename_from_url(source_url), DEFAULT_SLUG),
    ];
    if let Some(title) = title.filter(|t| !t.is_empty()) {
        parts.insert(1, slugify(title, DEFAULT_SLUG));
    }

    let base = parts
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    let base = if base.is_empty() {
        DEFAULT_BASENAME.to_owned()
    } else {
        base
    };

    ensure_extension(&base, Extension::Mp4.with_dot())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_strips_accents_and_symbols() {
        assert_eq!(slugify("Évian Été!", "x"), "evian-ete");
        assert_eq!(slugify("  Hello,   World -- 2024 ", "x"), "hello-world-2024");
    }

    #[test]
    fn slugify_falls_back_verbatim() {
        assert_eq!(slugify("", "x"), "x");
        assert_eq!(slugify("###", "x"), "x");
        assert_eq!(slugify("日本語", "Not A Slug!"), "Not A Slug!");
    }

    #[test]
    fn filename_from_url_takes_last_segment() {
        assert_eq!(
            filename_from_url("https://instagram.com/p/ABC123/"),
            "ABC123"
        );
        assert_eq!(
            filename_from_url("https://www.threads.net/@user/post/C0de?igsh=1"),
            "C0de"
        );
    }

    #[test]
    fn filename_from_url_falls_back_to_host() {
        assert_eq!(filename_from_url("https://instagram.com/"), "instagram.com");
        assert_eq!(filename_from_url("https://instagram.com"), "instagram.com");
        assert_eq!(filename_from_url(""), "download");
    }

    #[test]
    fn ensure_extension_is_case_insensitive() {
        assert_eq!(ensure_extension("clip", ".mp4"), "clip.mp4");
        assert_eq!(ensure_extension("clip.MP4", ".mp4"), "clip.MP4");
        assert_eq!(ensure_extension("clip.mp4", ".mp4"), "clip.mp4");
    }

    #[test]
    fn build_filename_without_title() {
        assert_eq!(
            build_filename(None, "https://instagram.com/p/ABC123/", "instagram"),
            "instagram-abc123.mp4"
        );
        assert_eq!(
            build_filename(Some(""), "https://instagram.com/p/ABC123/", "instagram"),
            "instagram-abc123.mp4"
        );
    }

    #[test]
    fn build_filename_inserts_title_second() {
        assert_eq!(
            build_filename(
                Some("Hello World"),
                "https://instagram.com/p/XYZ/",
                "instagram"
            ),
            "instagram-hello-world-xyz.mp4"
        );
    }

    #[test]
    fn build_filename_uses_default_for_symbolic_title() {
        assert_eq!(
            build_filename(Some("🔥🔥🔥"), "https://threads.net/t/Q1", "threads"),
            "threads-video-q1.mp4"
        );
    }
}
