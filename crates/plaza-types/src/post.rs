use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether an on-chain entry is a top-level post or a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostKind {
    /// Top-level post
    Post,
    /// Reply to another post
    Comment,
}

/// A post reconstructed from the ledger plus its resolved off-chain content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Transaction signature the post was found in
    pub id: String,

    /// Deterministic protocol-level id, base-58 of a 32-byte hash
    pub post_id: String,

    /// Author address (base-58 public key)
    pub author: String,

    /// Content URI exactly as stored on chain
    pub uri: String,

    /// On-chain content hash, hex encoded
    pub content_hash: String,

    /// Client-chosen nonce carried in the instruction
    pub client_nonce: u64,

    /// Slot the transaction landed in
    pub slot: u64,

    /// Block time of the transaction, or the observation time when the
    /// ledger did not record one
    pub created_at: DateTime<Utc>,

    /// Resolved text body (empty for media-only posts)
    pub content: String,

    /// Resolved media URIs
    pub media: Vec<String>,

    /// Declared kind, when the content carried one
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<PostKind>,

    /// Parent post id for replies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    /// Whether the resolved bytes hashed to the on-chain content hash
    pub hash_verified: bool,
}

impl Post {
    /// True when the entry declares itself a reply
    pub fn is_comment(&self) -> bool {
        self.kind == Some(PostKind::Comment)
    }

    /// True when the entry is a reply to the given post id
    pub fn is_reply_to(&self, parent_post_id: &str) -> bool {
        self.is_comment() && self.parent.as_deref() == Some(parent_post_id)
    }
}
