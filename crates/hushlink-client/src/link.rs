//! Share links: `{origin}/view/{secret_id}#{base64url(raw_key)}`
//!
//! The id rides in the path and reaches the server on fetch. The key rides in
//! the fragment, which HTTP clients never put on the wire.

use hushlink_core::VIEW_PATH;
use hushlink_crypto::codec;
use reqwest::Url;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    #[error("Invalid Link. Missing ID or Decryption Key.")]
    InvalidLink,
}

/// A fully assembled share link.
#[derive(Clone, PartialEq, Eq)]
pub struct ShareLink(String);

impl ShareLink {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ShareLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// The fragment is key material; keep it out of logs.
impl std::fmt::Debug for ShareLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let without_key = self.0.split('#').next().unwrap_or_default();
        write!(f, "ShareLink({without_key}#[REDACTED])")
    }
}

/// The pieces of a parsed share link.
#[derive(Clone, PartialEq, Eq)]
pub struct LinkParts {
    /// Scheme, host and port, e.g. `https://hush.example.com`
    pub origin: String,
    pub secret_id: String,
    /// base64url text of the raw key, not yet decoded
    pub key_text: String,
}

impl std::fmt::Debug for LinkParts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkParts")
            .field("origin", &self.origin)
            .field("secret_id", &self.secret_id)
            .field("key_text", &"[REDACTED]")
            .finish()
    }
}

/// Assemble a share link. The id is an opaque server token and is not validated.
pub fn build(origin: &str, secret_id: &str, raw_key: &[u8]) -> ShareLink {
    ShareLink(format!(
        "{}{}{}#{}",
        origin.trim_end_matches('/'),
        VIEW_PATH,
        secret_id,
        codec::encode(raw_key)
    ))
}

/// Split a share link into origin, secret id (last path segment) and key text (fragment).
pub fn parse(location: &str) -> Result<LinkParts, LinkError> {
    let url = Url::parse(location.trim()).map_err(|_| LinkError::InvalidLink)?;

    let secret_id = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
        .ok_or(LinkError::InvalidLink)?;

    let key_text = url
        .fragment()
        .filter(|fragment| !fragment.is_empty())
        .ok_or(LinkError::InvalidLink)?;

    Ok(LinkParts {
        origin: url.origin().ascii_serialization(),
        secret_id: secret_id.to_string(),
        key_text: key_text.to_string(),
    })
}
