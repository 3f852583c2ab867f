use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use plaza_codec::{derive_post_id, PostInstruction};
use plaza_content::ContentResolver;
use plaza_types::Post;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_client::GetConfirmedSignaturesForAddress2Config;
use solana_client::rpc_config::RpcTransactionConfig;
use solana_client::rpc_response::RpcConfirmedTransactionStatusWithSignature;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_transaction_status::{EncodedConfirmedTransactionWithStatusMeta, UiTransactionEncoding};
use tracing::{debug, warn};

use crate::error::{ScanError, ScanResult};
use crate::locate::locate_posting_instruction;

/// Handling of posts whose resolved content does not hash to the value
/// stored on chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashPolicy {
    /// Keep the post and report the result through `Post::hash_verified`.
    #[default]
    Surface,
    /// Drop such posts from scan results entirely.
    Reject,
}

/// Tuning for [`FeedScanner`]
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Commitment level for signature listing and transaction fetches
    pub commitment: CommitmentConfig,
    /// What to do with posts that fail content hash verification
    pub hash_policy: HashPolicy,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            commitment: CommitmentConfig::confirmed(),
            hash_policy: HashPolicy::Surface,
        }
    }
}

/// One page of reconstructed posts
#[derive(Debug, Clone)]
pub struct PostPage {
    /// Posts in ledger order, newest first.
    /// [`FeedScanner::list_replies_by_parent`] re-orders its page oldest
    /// first instead.
    pub items: Vec<Post>,
    /// Cursor for the next page: the oldest signature this page covered,
    /// `None` when the ledger ran out of history
    pub next_before: Option<String>,
}

struct DecodedPosting {
    author: Pubkey,
    instruction: PostInstruction,
    slot: u64,
    block_time: Option<i64>,
}

/// Reconstructs posts by walking the posting program's transaction
/// history.
///
/// Scanning is best-effort: transactions that failed on chain, carry no
/// posting instruction or carry an undecodable payload are skipped with a
/// debug log, never surfaced as errors.
pub struct FeedScanner {
    rpc: Arc<RpcClient>,
    program_id: Pubkey,
    resolver: ContentResolver,
    config: ScannerConfig,
}

impl FeedScanner {
    pub fn new(
        rpc: Arc<RpcClient>,
        program_id: Pubkey,
        resolver: ContentResolver,
        config: Option<ScannerConfig>,
    ) -> Self {
        Self {
            rpc,
            program_id,
            resolver,
            config: config.unwrap_or_default(),
        }
    }

    /// Lists one page of posts, newest first. `before` is the cursor from
    /// a previous page's `next_before`; `limit` is passed through to the
    /// RPC node, which caps it at 1000.
    pub async fn list_posts_page(
        &self,
        limit: usize,
        before: Option<&str>,
    ) -> ScanResult<PostPage> {
        let signatures = self.list_signatures(limit, before).await?;
        let next_before = signatures.last().map(|entry| entry.signature.clone());

        let mut items = Vec::new();
        for entry in &signatures {
            if entry.err.is_some() {
                debug!("Skipping failed transaction {}", entry.signature);
                continue;
            }
            match self.fetch_encoded(&entry.signature).await {
                Ok(tx) => {
                    if let Some(post) = self.post_from_encoded(&entry.signature, &tx).await {
                        items.push(post);
                    }
                }
                Err(e) => debug!("Skipping {}: {}", entry.signature, e),
            }
        }
        debug!(
            "Scanned {} signatures into {} posts",
            signatures.len(),
            items.len()
        );
        Ok(PostPage { items, next_before })
    }

    /// Reconstructs the post carried by a single transaction.
    /// [`ScanError::PostNotFound`] covers everything from an unknown
    /// signature to a transaction that holds no readable posting
    /// instruction.
    pub async fn get_post_by_signature(&self, signature: &str) -> ScanResult<Post> {
        let tx = match self.fetch_encoded(signature).await {
            Ok(tx) => tx,
            Err(e) => {
                debug!("Could not fetch transaction {}: {}", signature, e);
                return Err(ScanError::PostNotFound(signature.to_string()));
            }
        };
        self.post_from_encoded(signature, &tx)
            .await
            .ok_or_else(|| ScanError::PostNotFound(signature.to_string()))
    }

    /// Linear scan over the most recent `limit` program transactions for
    /// the one whose derived post id matches. Decodes instructions only,
    /// without resolving content. `None` when the id is not in that
    /// window.
    pub async fn find_post_signature_by_post_id(
        &self,
        post_id: &str,
        limit: usize,
    ) -> ScanResult<Option<String>> {
        let signatures = self.list_signatures(limit, None).await?;
        for entry in &signatures {
            if entry.err.is_some() {
                continue;
            }
            let tx = match self.fetch_encoded(&entry.signature).await {
                Ok(tx) => tx,
                Err(e) => {
                    debug!("Skipping {}: {}", entry.signature, e);
                    continue;
                }
            };
            if let Some(decoded) = self.decode_encoded(&entry.signature, &tx) {
                let derived = derive_post_id(&decoded.author, decoded.instruction.client_nonce);
                if derived.to_base58() == post_id {
                    return Ok(Some(entry.signature.clone()));
                }
            }
        }
        Ok(None)
    }

    /// Lists one page of replies to a post, oldest first. Paging walks
    /// the same program history as [`Self::list_posts_page`], so a page
    /// may hold fewer than `limit` replies even when more history
    /// remains.
    pub async fn list_replies_by_parent(
        &self,
        parent_post_id: &str,
        limit: usize,
        before: Option<&str>,
    ) -> ScanResult<PostPage> {
        let page = self.list_posts_page(limit, before).await?;
        let items = filter_replies(page.items, parent_post_id);
        Ok(PostPage {
            items,
            next_before: page.next_before,
        })
    }

    /// Reconstructs a post from an already fetched transaction. `None`
    /// when the transaction holds no readable posting instruction, or the
    /// content fails verification under [`HashPolicy::Reject`].
    pub async fn post_from_encoded(
        &self,
        signature: &str,
        tx: &EncodedConfirmedTransactionWithStatusMeta,
    ) -> Option<Post> {
        let decoded = self.decode_encoded(signature, tx)?;
        self.finish_post(signature, decoded).await
    }

    async fn list_signatures(
        &self,
        limit: usize,
        before: Option<&str>,
    ) -> ScanResult<Vec<RpcConfirmedTransactionStatusWithSignature>> {
        let before = before
            .map(Signature::from_str)
            .transpose()
            .map_err(|e| ScanError::InvalidSignature(format!("cursor: {}", e)))?;
        let request = GetConfirmedSignaturesForAddress2Config {
            before,
            until: None,
            limit: Some(limit),
            commitment: Some(self.config.commitment),
        };
        Ok(self
            .rpc
            .get_signatures_for_address_with_config(&self.program_id, request)
            .await?)
    }

    async fn fetch_encoded(
        &self,
        signature: &str,
    ) -> ScanResult<EncodedConfirmedTransactionWithStatusMeta> {
        let parsed = Signature::from_str(signature)
            .map_err(|e| ScanError::InvalidSignature(format!("{}: {}", signature, e)))?;
        let request = RpcTransactionConfig {
            encoding: Some(UiTransactionEncoding::Json),
            commitment: Some(self.config.commitment),
            max_supported_transaction_version: Some(0),
        };
        Ok(self.rpc.get_transaction_with_config(&parsed, request).await?)
    }

    fn decode_encoded(
        &self,
        signature: &str,
        tx: &EncodedConfirmedTransactionWithStatusMeta,
    ) -> Option<DecodedPosting> {
        let envelope = &tx.transaction;
        let failed = envelope
            .meta
            .as_ref()
            .map(|meta| meta.err.is_some())
            .unwrap_or(false);
        if failed {
            debug!("Transaction {} failed on chain, skipping", signature);
            return None;
        }

        let located = locate_posting_instruction(envelope, &self.program_id)?;
        let instruction = match PostInstruction::decode(&located.payload) {
            Ok(instruction) => instruction,
            Err(e) => {
                debug!("Undecodable posting payload in {}: {}", signature, e);
                return None;
            }
        };
        let author = match Pubkey::from_str(&located.author) {
            Ok(author) => author,
            Err(e) => {
                debug!("Author of {} is not a valid public key: {}", signature, e);
                return None;
            }
        };
        Some(DecodedPosting {
            author,
            instruction,
            slot: tx.slot,
            block_time: tx.block_time,
        })
    }

    async fn finish_post(&self, signature: &str, decoded: DecodedPosting) -> Option<Post> {
        let DecodedPosting {
            author,
            instruction,
            slot,
            block_time,
        } = decoded;

        let resolved = self
            .resolver
            .resolve_verified(&instruction.uri, &instruction.content_hash)
            .await;
        let hash_verified = resolved.hash_matches.unwrap_or(false);
        if !hash_verified && self.config.hash_policy == HashPolicy::Reject {
            warn!(
                "Dropping {}: content does not match its on-chain hash",
                signature
            );
            return None;
        }

        let created_at = block_time
            .and_then(|seconds| DateTime::from_timestamp(seconds, 0))
            .unwrap_or_else(Utc::now);
        Some(Post {
            id: signature.to_string(),
            post_id: derive_post_id(&author, instruction.client_nonce).to_base58(),
            author: author.to_string(),
            uri: instruction.uri,
            content_hash: hex::encode(instruction.content_hash),
            client_nonce: instruction.client_nonce,
            slot,
            created_at,
            content: resolved.content.text,
            media: resolved.content.media,
            kind: resolved.content.kind,
            parent: resolved.content.parent,
            hash_verified,
        })
    }
}

// Filters a page down to replies of `parent_post_id` and orders them
// oldest first. Ordering covers this page only; callers merging pages
// re-sort.
pub(crate) fn filter_replies(items: Vec<Post>, parent_post_id: &str) -> Vec<Post> {
    let mut replies: Vec<Post> = items
        .into_iter()
        .filter(|post| post.is_reply_to(parent_post_id))
        .collect();
    replies.sort_by_key(|post| post.created_at);
    replies
}
