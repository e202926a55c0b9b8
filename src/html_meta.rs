use std::sync::OnceLock;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::json_walk::find_content_url;

/// Open Graph properties that may hold the video location, by priority
const OG_VIDEO_PROPERTIES: [&str; 3] = ["og:video:secure_url", "og:video:url", "og:video"];

static META_SELECTOR: OnceLock<Selector> = OnceLock::new();
static JSON_LD_SELECTOR: OnceLock<Selector> = OnceLock::new();

fn meta_selector() -> &'static Selector {
    META_SELECTOR.get_or_init(|| Selector::parse("meta").unwrap())
}

fn json_ld_selector() -> &'static Selector {
    JSON_LD_SELECTOR
        .get_or_init(|| Selector::parse(r#"script[type="application/ld+json"]"#).unwrap())
}

/// Find the first `<meta>` tag whose `attribute` is exactly `value`
fn find_meta<'a>(document: &'a Html, attribute: &str, value: &str) -> Option<ElementRef<'a>> {
    document
        .select(meta_selector())
        .find(|tag| tag.value().attr(attribute) == Some(value))
}

/// Trimmed `content` attribute of a tag. Empty content counts as missing.
fn content_of(tag: ElementRef<'_>) -> Option<String> {
    tag.value()
        .attr("content")
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_owned)
}

/// Read a meta tag content, looking it up by `property` first and `name` second.
pub fn meta_content(document: &Html, key: &str) -> Option<String> {
    find_meta(document, "property", key)
        .or_else(|| find_meta(document, "name", key))
        .and_then(content_of)
}

/// Raw text of every JSON-LD script block, in document order
pub fn json_ld_blocks(document: &Html) -> Vec<String> {
    document
        .select(json_ld_selector())
        .map(|script| script.text().collect())
        .collect()
}

/// Locate the video URL of a post page.
///
/// Open Graph video tags are tried first, then every JSON-LD block until one
/// of them contains a `contentUrl`. Blocks that are not valid JSON are skipped.
pub fn resolve_video_url(document: &Html) -> Option<String> {
    for property in OG_VIDEO_PROPERTIES {
        if let Some(url) = find_meta(document, "property", property).and_then(content_of) {
            debug!("Video URL found in the {property} meta tag");
            return Some(url);
        }
    }

    for (idx, block) in json_ld_blocks(document).iter().enumerate() {
        let block: &str = if block.trim().is_empty() { "{}" } else { block };
        let data = match serde_json::from_str::<serde_json::Value>(block) {
            Ok(data) => data,
            Err(err) => {
                debug!("Skipping JSON-LD block #{idx}, invalid JSON: {err}");
                continue;
            }
        };

        if let Some(url) = find_content_url(&data) {
            debug!("Video URL found in JSON-LD block #{idx}");
            return Some(url);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    fn parse(html: &str) -> Html {
        Html::parse_document(html)
    }

    #[test]
    fn og_secure_url_wins_over_json_ld() {
        let doc = parse(indoc! {r#"
            <html><head>
            <script type="application/ld+json">{"contentUrl": "https://ld/v.mp4"}</script>
            <meta property="og:video" content="https://og/plain.mp4">
            <meta property="og:video:secure_url" content="https://og/secure.mp4">
            </head></html>
        "#});
        assert_eq!(
            resolve_video_url(&doc).as_deref(),
            Some("https://og/secure.mp4")
        );
    }

    #[test]
    fn og_video_url_before_og_video() {
        let doc = parse(indoc! {r#"
            <meta property="og:video" content="https://og/plain.mp4">
            <meta property="og:video:url" content=" https://og/url.mp4 ">
        "#});
        assert_eq!(resolve_video_url(&doc).as_deref(), Some("https://og/url.mp4"));
    }

    #[test]
    fn empty_og_tag_is_ignored() {
        let doc = parse(indoc! {r#"
            <meta property="og:video:secure_url" content="">
            <meta property="og:video" content="https://og/plain.mp4">
        "#});
        assert_eq!(
            resolve_video_url(&doc).as_deref(),
            Some("https://og/plain.mp4")
        );
    }

    #[test]
    fn json_ld_blocks_are_tried_in_order() {
        let doc = parse(indoc! {r#"
            <script type="application/ld+json">{ not json</script>
            <script type="application/ld+json">{"@type": "SocialMediaPosting"}</script>
            <script type="application/ld+json">
              {"@type": "VideoObject", "video": {"contentUrl": "https://ld/third.mp4"}}
            </script>
            <script type="application/ld+json">{"contentUrl": "https://ld/fourth.mp4"}</script>
        "#});
        assert_eq!(
            resolve_video_url(&doc).as_deref(),
            Some("https://ld/third.mp4")
        );
    }

    #[test]
    fn other_script_types_are_ignored() {
        let doc = parse(r#"<script type="application/json">{"contentUrl": "https://x"}</script>"#);
        assert_eq!(resolve_video_url(&doc), None);
    }

    #[test]
    fn meta_content_falls_back_to_name() {
        let doc = parse(indoc! {r#"
            <meta name="og:title" content="  By name  ">
            <meta property="og:description" content="By property">
            <meta property="og:site_name" content="   ">
        "#});
        assert_eq!(meta_content(&doc, "og:title").as_deref(), Some("By name"));
        assert_eq!(
            meta_content(&doc, "og:description").as_deref(),
            Some("By property")
        );
        assert_eq!(meta_content(&doc, "og:site_name"), None);
        assert_eq!(meta_content(&doc, "og:image"), None);
    }
}
