//! Unpadded base64url text codec
//!
//! Output uses the URL-safe alphabet (`A-Za-z0-9-_`) with no `=` padding, so it
//! can sit in a URL path or fragment without escaping. Decoding tolerates both
//! padded and unpadded input by re-deriving the padding from the length.

use base64::{engine::general_purpose::URL_SAFE, engine::general_purpose::URL_SAFE_NO_PAD, Engine};

use crate::error::{CryptoError, CryptoResult};

/// Encode bytes as unpadded base64url text.
pub fn encode(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode base64url text, with or without trailing `=` padding.
///
/// Rejects characters outside the base64url alphabet and lengths that are
/// `1 (mod 4)`, which no byte sequence can encode to.
pub fn decode(text: &str) -> CryptoResult<Vec<u8>> {
    let unpadded = text.trim_end_matches('=');

    if let Some(bad) = unpadded.chars().find(|c| !is_base64url_char(*c)) {
        return Err(CryptoError::MalformedInput(format!(
            "invalid base64url character {bad:?}"
        )));
    }

    let remainder = unpadded.len() % 4;
    if remainder == 1 {
        return Err(CryptoError::MalformedInput(format!(
            "invalid base64url length {} (1 mod 4)",
            unpadded.len()
        )));
    }

    let mut padded = String::with_capacity(unpadded.len() + 3);
    padded.push_str(unpadded);
    if remainder != 0 {
        padded.push_str(&"=".repeat(4 - remainder));
    }

    URL_SAFE
        .decode(padded.as_bytes())
        .map_err(|e| CryptoError::MalformedInput(format!("base64url decode: {e}")))
}

fn is_base64url_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}
