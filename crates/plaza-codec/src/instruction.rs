use sha2::{Digest, Sha256};
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;

use crate::error::{CodecError, CodecResult};

/// Method name of the posting instruction
pub const POST_METHOD: &str = "post";

/// URI buffer length of the current layout
pub const URI_BUFFER_LEN: usize = 512;

/// URI buffer length of the pre-expansion layout
pub const LEGACY_URI_BUFFER_LEN: usize = 200;

const DISCRIMINATOR_LEN: usize = 8;
const URI_LEN_FIELD_LEN: usize = 2;
const HASH_LEN: usize = 32;
const NONCE_LEN: usize = 8;

/// Exact payload length produced by the current layout (562 bytes)
pub const PAYLOAD_LEN: usize =
    DISCRIMINATOR_LEN + URI_BUFFER_LEN + URI_LEN_FIELD_LEN + HASH_LEN + NONCE_LEN;

/// Minimum payload length of the legacy layout (250 bytes)
pub const LEGACY_PAYLOAD_LEN: usize =
    DISCRIMINATOR_LEN + LEGACY_URI_BUFFER_LEN + URI_LEN_FIELD_LEN + HASH_LEN + NONCE_LEN;

/// First eight bytes of sha256("global:" + method), the Anchor-style
/// instruction discriminator.
pub fn discriminator(method: &str) -> [u8; 8] {
    let digest = Sha256::digest(format!("global:{}", method).as_bytes());
    let mut out = [0u8; 8];
    out.copy_from_slice(&digest[..8]);
    out
}

/// Decoded form of the posting instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostInstruction {
    /// Content URI (UTF-8, at most [`URI_BUFFER_LEN`] bytes)
    pub uri: String,

    /// SHA-256 of the content the URI resolves to
    pub content_hash: [u8; 32],

    /// Client-chosen nonce, the post-id derivation input
    pub client_nonce: u64,
}

impl PostInstruction {
    pub fn new(uri: impl Into<String>, content_hash: [u8; 32], client_nonce: u64) -> Self {
        Self {
            uri: uri.into(),
            content_hash,
            client_nonce,
        }
    }

    /// Builds an instruction from a hash slice, rejecting lengths other
    /// than 32 bytes.
    pub fn try_new(
        uri: impl Into<String>,
        content_hash: &[u8],
        client_nonce: u64,
    ) -> CodecResult<Self> {
        let hash: [u8; 32] = content_hash.try_into().map_err(|_| {
            CodecError::InvalidHash(format!(
                "expected 32 bytes, got {}",
                content_hash.len()
            ))
        })?;
        Ok(Self::new(uri, hash, client_nonce))
    }

    /// Encodes the instruction in the current 512-byte-URI layout.
    pub fn encode(&self) -> CodecResult<Vec<u8>> {
        let uri_bytes = self.uri.as_bytes();
        if uri_bytes.len() > URI_BUFFER_LEN {
            return Err(CodecError::UriTooLong(format!(
                "{} bytes exceeds the {} byte buffer",
                uri_bytes.len(),
                URI_BUFFER_LEN
            )));
        }

        let mut data = Vec::with_capacity(PAYLOAD_LEN);
        data.extend_from_slice(&discriminator(POST_METHOD));
        data.extend_from_slice(uri_bytes);
        data.resize(DISCRIMINATOR_LEN + URI_BUFFER_LEN, 0);
        data.extend_from_slice(&(uri_bytes.len() as u16).to_le_bytes());
        data.extend_from_slice(&self.content_hash);
        data.extend_from_slice(&self.client_nonce.to_le_bytes());
        Ok(data)
    }

    /// Decodes a posting payload, accepting both the current and the
    /// legacy layout.
    ///
    /// Layout selection is by length alone: anything long enough for the
    /// current layout is read as current, anything long enough for the
    /// legacy layout is read as legacy. The discriminator bytes are
    /// skipped rather than validated so that payloads are matched by the
    /// program id they were sent to, not by method hash.
    pub fn decode(data: &[u8]) -> CodecResult<Self> {
        let uri_buffer_len = if data.len() >= PAYLOAD_LEN {
            URI_BUFFER_LEN
        } else if data.len() >= LEGACY_PAYLOAD_LEN {
            LEGACY_URI_BUFFER_LEN
        } else {
            return Err(CodecError::PayloadTooShort(format!(
                "{} bytes, need at least {}",
                data.len(),
                LEGACY_PAYLOAD_LEN
            )));
        };

        let mut offset = DISCRIMINATOR_LEN;
        let uri_buffer = &data[offset..offset + uri_buffer_len];
        offset += uri_buffer_len;

        let uri_len =
            u16::from_le_bytes([data[offset], data[offset + 1]]) as usize;
        offset += URI_LEN_FIELD_LEN;
        if uri_len > uri_buffer_len {
            return Err(CodecError::MalformedPayload(format!(
                "URI length {} exceeds the {} byte buffer",
                uri_len, uri_buffer_len
            )));
        }

        let uri = std::str::from_utf8(&uri_buffer[..uri_len])
            .map_err(|e| CodecError::MalformedPayload(format!("URI is not UTF-8: {}", e)))?
            .to_string();

        let mut content_hash = [0u8; 32];
        content_hash.copy_from_slice(&data[offset..offset + HASH_LEN]);
        offset += HASH_LEN;

        let mut nonce_bytes = [0u8; 8];
        nonce_bytes.copy_from_slice(&data[offset..offset + NONCE_LEN]);
        let client_nonce = u64::from_le_bytes(nonce_bytes);

        Ok(Self {
            uri,
            content_hash,
            client_nonce,
        })
    }
}

/// Assembles the on-chain instruction for a post, with the author as the
/// sole (signing) account. Signing and submission are the caller's job.
pub fn build_post_instruction(
    program_id: &Pubkey,
    author: &Pubkey,
    post: &PostInstruction,
) -> CodecResult<Instruction> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![AccountMeta::new_readonly(*author, true)],
        data: post.encode()?,
    })
}
