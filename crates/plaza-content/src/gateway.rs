use url::Url;

/// Maps a post URI to a fetchable gateway URL.
///
/// `ipfs://<cid-path>` and `ar://<tx>` are rewritten onto the configured
/// gateways, `http(s)` URLs pass through untouched. `None` means the URI
/// is not fetchable and should be interpreted inline.
pub fn gateway_url(uri: &str, ipfs_gateway: &str, arweave_gateway: &str) -> Option<String> {
    if let Some(rest) = uri.strip_prefix("ipfs://") {
        return Some(format!("{}{}", ipfs_gateway, rest));
    }
    if let Some(rest) = uri.strip_prefix("ar://") {
        return Some(format!("{}{}", arweave_gateway, rest));
    }
    if uri.starts_with("http://") || uri.starts_with("https://") {
        // Reject strings that only look like URLs, they render inline
        if Url::parse(uri).is_ok() {
            return Some(uri.to_string());
        }
    }
    None
}
