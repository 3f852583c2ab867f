use serde::{Deserialize, Serialize};

use crate::post::PostKind;

/// Canonical shape of off-chain post content after normalization.
///
/// Producers are free to publish abbreviated keys (`t`, `m`, `y`, `p`);
/// consumers only ever see this struct.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedContent {
    /// Text body (may be empty for media-only content)
    #[serde(default)]
    pub text: String,

    /// Media URIs
    #[serde(default)]
    pub media: Vec<String>,

    /// Declared kind, when present and recognized
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<PostKind>,

    /// Parent post id for replies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    /// Producer metadata, passed through untouched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

impl NormalizedContent {
    /// Plain text content with no media
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Media-only content with an empty text body
    pub fn from_media(uri: impl Into<String>) -> Self {
        Self {
            media: vec![uri.into()],
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_constructor_leaves_media_empty() {
        let content = NormalizedContent::from_text("gm");
        assert_eq!(content.text, "gm");
        assert!(content.media.is_empty());
        assert!(content.kind.is_none());
    }

    #[test]
    fn media_constructor_clears_text() {
        let content = NormalizedContent::from_media("https://cdn.example/cat.png");
        assert_eq!(content.text, "");
        assert_eq!(content.media, vec!["https://cdn.example/cat.png"]);
    }
}
