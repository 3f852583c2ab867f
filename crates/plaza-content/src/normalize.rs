use plaza_types::{NormalizedContent, PostKind};
use serde_json::Value;

/// Extensions treated as renderable media when they end a URL path
const MEDIA_EXTENSIONS: [&str; 10] = [
    ".png", ".jpg", ".jpeg", ".gif", ".webp", ".svg", ".avif", ".mp4", ".webm", ".mov",
];

/// True when a string is a directly renderable media reference: an
/// http(s) URL ending in a known media extension, or a `data:image/` URI.
pub fn looks_like_media(uri: &str) -> bool {
    if uri.starts_with("data:image/") {
        return true;
    }
    if !uri.starts_with("http://") && !uri.starts_with("https://") {
        return false;
    }
    // Extension check ignores query strings
    let path = uri.split(['?', '#']).next().unwrap_or(uri).to_ascii_lowercase();
    MEDIA_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

fn string_field<'a>(value: &'a Value, key: &str, short: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .or_else(|| value.get(short).and_then(Value::as_str))
}

fn media_field(value: &Value) -> Vec<String> {
    let entries = value
        .get("media")
        .and_then(Value::as_array)
        .or_else(|| value.get("m").and_then(Value::as_array));
    match entries {
        // Non-string entries are dropped rather than stringified
        Some(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        None => Vec::new(),
    }
}

fn kind_field(value: &Value) -> Option<PostKind> {
    match string_field(value, "type", "y") {
        Some("post") => Some(PostKind::Post),
        Some("comment") => Some(PostKind::Comment),
        // Unknown kinds are dropped so replies never thread off garbage
        _ => None,
    }
}

// A text body that is itself a media URL with no media entries becomes a
// media-only post.
fn shift_media_text(mut content: NormalizedContent) -> NormalizedContent {
    let trimmed = content.text.trim();
    if content.media.is_empty() && looks_like_media(trimmed) {
        content.media = vec![trimmed.to_string()];
        content.text = String::new();
    }
    content
}

/// Normalizes a parsed JSON payload into the canonical content shape.
///
/// Producers may use full keys (`text`, `media`, `type`, `parent`) or
/// their single-letter forms (`t`, `m`, `y`, `p`); the full key wins when
/// both are present. `meta` passes through untouched. Normalization is
/// idempotent: feeding the serialized output back in changes nothing.
pub fn normalize_value(value: &Value) -> NormalizedContent {
    let content = NormalizedContent {
        text: string_field(value, "text", "t").unwrap_or_default().to_string(),
        media: media_field(value),
        kind: kind_field(value),
        parent: string_field(value, "parent", "p").map(str::to_string),
        meta: value.get("meta").filter(|m| !m.is_null()).cloned(),
    };
    shift_media_text(content)
}

/// Interprets a free-form payload: an inline URI or a fetched body.
///
/// A payload starting with `{` or `[` is treated as JSON (falling back to
/// literal text when it does not parse), a bare media URL becomes a
/// media-only post, anything else is plain text.
pub fn parse_content(raw: &str) -> NormalizedContent {
    let trimmed = raw.trim();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
            return normalize_value(&value);
        }
    }
    if looks_like_media(trimmed) {
        return NormalizedContent::from_media(trimmed);
    }
    NormalizedContent::from_text(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn full_keys_are_read() {
        let content = normalize_value(&json!({
            "text": "hello",
            "media": ["https://cdn.example/a.png"],
            "type": "comment",
            "parent": "9parent",
            "meta": {"lang": "en"},
        }));
        assert_eq!(content.text, "hello");
        assert_eq!(content.media, vec!["https://cdn.example/a.png"]);
        assert_eq!(content.kind, Some(PostKind::Comment));
        assert_eq!(content.parent.as_deref(), Some("9parent"));
        assert_eq!(content.meta, Some(json!({"lang": "en"})));
    }

    #[test]
    fn short_keys_are_read() {
        let content = normalize_value(&json!({
            "t": "gm",
            "m": ["https://cdn.example/b.gif"],
            "y": "post",
            "p": "9parent",
        }));
        assert_eq!(content.text, "gm");
        assert_eq!(content.media, vec!["https://cdn.example/b.gif"]);
        assert_eq!(content.kind, Some(PostKind::Post));
        assert_eq!(content.parent.as_deref(), Some("9parent"));
    }

    #[test]
    fn full_key_wins_over_short_key() {
        let content = normalize_value(&json!({"text": "long", "t": "short"}));
        assert_eq!(content.text, "long");
    }

    #[test]
    fn unknown_kind_is_dropped() {
        let content = normalize_value(&json!({"text": "x", "type": "retweet"}));
        assert_eq!(content.kind, None);
    }

    #[test]
    fn non_string_media_entries_are_dropped() {
        let content = normalize_value(&json!({
            "media": ["https://cdn.example/ok.png", 42, null, {"u": "nested"}],
        }));
        assert_eq!(content.media, vec!["https://cdn.example/ok.png"]);
    }

    #[test]
    fn media_url_in_text_moves_to_media() {
        let content = normalize_value(&json!({"text": "https://cdn.example/pic.jpeg"}));
        assert_eq!(content.text, "");
        assert_eq!(content.media, vec!["https://cdn.example/pic.jpeg"]);
    }

    #[test]
    fn media_url_in_text_stays_when_media_present() {
        let content = normalize_value(&json!({
            "text": "https://cdn.example/pic.jpeg",
            "media": ["https://cdn.example/other.png"],
        }));
        assert_eq!(content.text, "https://cdn.example/pic.jpeg");
    }

    #[test]
    fn normalization_is_idempotent() {
        let cases = vec![
            json!({"t": "hello", "y": "comment", "p": "9x"}),
            json!({"text": "https://cdn.example/pic.png"}),
            json!({"media": ["https://cdn.example/a.png", 7]}),
            json!({"text": "plain", "meta": {"k": "v"}}),
        ];
        for case in cases {
            let once = normalize_value(&case);
            let twice = normalize_value(&serde_json::to_value(&once).unwrap());
            assert_eq!(once, twice, "not idempotent for {}", case);
        }
    }

    #[test]
    fn parse_content_handles_json() {
        let content = parse_content(r#"{"text":"inline json","type":"post"}"#);
        assert_eq!(content.text, "inline json");
        assert_eq!(content.kind, Some(PostKind::Post));
    }

    #[test]
    fn parse_content_handles_broken_json_as_text() {
        let raw = r#"{"text": unterminated"#;
        let content = parse_content(raw);
        assert_eq!(content.text, raw);
        assert!(content.media.is_empty());
    }

    #[test]
    fn parse_content_handles_media_url() {
        let content = parse_content("https://cdn.example/clip.mp4");
        assert_eq!(content.text, "");
        assert_eq!(content.media, vec!["https://cdn.example/clip.mp4"]);
    }

    #[test]
    fn parse_content_handles_data_image_uri() {
        let content = parse_content("data:image/png;base64,iVBORw0KGgo=");
        assert_eq!(content.media, vec!["data:image/png;base64,iVBORw0KGgo="]);
    }

    #[test]
    fn parse_content_handles_plain_text() {
        let content = parse_content("hello world");
        assert_eq!(content.text, "hello world");
        assert!(content.media.is_empty());
        assert!(content.kind.is_none());
    }

    #[test]
    fn json_array_normalizes_to_empty_content() {
        let content = parse_content(r#"["not","an","object"]"#);
        assert_eq!(content.text, "");
        assert!(content.media.is_empty());
    }

    #[test]
    fn media_extension_check_ignores_query_strings() {
        assert!(looks_like_media("https://cdn.example/x.png?size=large"));
        assert!(!looks_like_media("https://cdn.example/page?img=x.png"));
        assert!(!looks_like_media("ipfs://QmNotHttp.png"));
    }
}
