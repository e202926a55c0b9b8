use serde_json::Value;
use tracing::trace;

/// Deepest nesting of objects/arrays that will be looked into.
/// Anything below is considered as not containing a video.
pub const MAX_DEPTH: usize = 64;

/// Search a structured-data document for the video `contentUrl`.
///
/// The search is depth-first and the first match wins:
/// - an object with a non-empty `contentUrl` string returns it
/// - an object with a `video` value only looks into that value
/// - otherwise every value of the object is searched, in document order
/// - array elements are searched in order
pub fn find_content_url(node: &Value) -> Option<String> {
    walk(node, 0)
}

fn walk(node: &Value, depth: usize) -> Option<String> {
    if depth > MAX_DEPTH {
        trace!("JSON walk reached max depth, giving up on this branch");
        return None;
    }

    match node {
        Value::Object(map) => {
            if let Some(url) = map
                .get("contentUrl")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|url| !url.is_empty())
            {
                return Some(url.to_owned());
            }

            if let Some(video) = map.get("video").filter(|v| is_truthy(v)) {
                return walk(video, depth + 1);
            }

            map.values().find_map(|value| walk(value, depth + 1))
        }
        Value::Array(items) => items.iter().find_map(|item| walk(item, depth + 1)),
        _ => None,
    }
}

/// Whether the value holds something, as opposed to being null or empty
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
