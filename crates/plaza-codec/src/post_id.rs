use sha2::{Digest, Sha256};
use solana_sdk::pubkey::Pubkey;
use std::fmt;

/// Domain separation prefix for post-id derivation
const POST_ID_DOMAIN: &[u8] = b"posting:v1";

/// Protocol-level post id, a 32 byte hash rendered as base-58
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PostId(pub [u8; 32]);

impl PostId {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Base-58 rendering, the form used in content `parent` references
    pub fn to_base58(&self) -> String {
        bs58::encode(&self.0).into_string()
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base58())
    }
}

/// Derives the deterministic post id for an author/nonce pair:
/// sha256("posting:v1" || author || nonce little-endian).
///
/// Both the submitting client and any reader can compute this without a
/// ledger lookup, which is what makes optimistic rendering and reply
/// threading work before a transaction is even confirmed.
pub fn derive_post_id(author: &Pubkey, client_nonce: u64) -> PostId {
    let mut hasher = Sha256::new();
    hasher.update(POST_ID_DOMAIN);
    hasher.update(author.as_ref());
    hasher.update(client_nonce.to_le_bytes());
    let digest = hasher.finalize();
    let mut id = [0u8; 32];
    id.copy_from_slice(&digest);
    PostId(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        let author = Pubkey::new_unique();
        assert_eq!(derive_post_id(&author, 1), derive_post_id(&author, 1));
    }

    #[test]
    fn nonce_changes_the_id() {
        let author = Pubkey::new_unique();
        assert_ne!(derive_post_id(&author, 1), derive_post_id(&author, 2));
    }

    #[test]
    fn author_changes_the_id() {
        let a = Pubkey::new_unique();
        let b = Pubkey::new_unique();
        assert_ne!(derive_post_id(&a, 1), derive_post_id(&b, 1));
    }

    #[test]
    fn display_is_base58_of_all_32_bytes() {
        let id = derive_post_id(&Pubkey::new_unique(), 99);
        let rendered = id.to_string();
        let decoded = bs58::decode(&rendered).into_vec().unwrap();
        assert_eq!(decoded.as_slice(), id.as_bytes());
    }
}
