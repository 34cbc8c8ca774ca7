//! Envelope: the unit stored by the server
//!
//! ```text
//! [12 bytes: nonce][ciphertext || 16-byte GCM tag]
//! ```
//!
//! The first `NONCE_SIZE` bytes are always the nonce; the rest goes verbatim
//! to the AEAD open call.

use crate::codec;
use crate::error::{CryptoError, CryptoResult};
use crate::NONCE_SIZE;

#[derive(Clone, PartialEq, Eq)]
pub struct Envelope {
    nonce: [u8; NONCE_SIZE],
    ciphertext: Vec<u8>,
}

impl Envelope {
    pub fn new(nonce: [u8; NONCE_SIZE], ciphertext: Vec<u8>) -> Self {
        Self { nonce, ciphertext }
    }

    pub fn nonce(&self) -> &[u8; NONCE_SIZE] {
        &self.nonce
    }

    /// Ciphertext with the authentication tag appended
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// Serialize to `nonce || ciphertext`.
    pub fn pack(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(NONCE_SIZE + self.ciphertext.len());
        out.extend_from_slice(&self.nonce);
        out.extend_from_slice(&self.ciphertext);
        out
    }

    /// Split `nonce || ciphertext` at the nonce boundary.
    ///
    /// Anything shorter than a nonce is a truncated envelope. A ciphertext
    /// shorter than a tag is left for the AEAD to reject.
    pub fn unpack(bytes: &[u8]) -> CryptoResult<Self> {
        if bytes.len() < NONCE_SIZE {
            return Err(CryptoError::MalformedInput(format!(
                "envelope too short: {} bytes (minimum {})",
                bytes.len(),
                NONCE_SIZE
            )));
        }

        let (nonce_bytes, ciphertext) = bytes.split_at(NONCE_SIZE);
        let mut nonce = [0u8; NONCE_SIZE];
        nonce.copy_from_slice(nonce_bytes);

        Ok(Self {
            nonce,
            ciphertext: ciphertext.to_vec(),
        })
    }

    pub fn to_base64url(&self) -> String {
        codec::encode(&self.pack())
    }

    pub fn from_base64url(text: &str) -> CryptoResult<Self> {
        Self::unpack(&codec::decode(text)?)
    }
}

impl std::fmt::Debug for Envelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Envelope")
            .field("nonce", &codec::encode(&self.nonce))
            .field("ciphertext_len", &self.ciphertext.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_layout() {
        let env = Envelope::new([7u8; NONCE_SIZE], vec![1, 2, 3]);
        let packed = env.pack();

        assert_eq!(packed.len(), NONCE_SIZE + 3);
        assert_eq!(&packed[..NONCE_SIZE], &[7u8; NONCE_SIZE]);
        assert_eq!(&packed[NONCE_SIZE..], &[1, 2, 3]);
    }

    #[test]
    fn test_unpack_splits_at_nonce() {
        let mut bytes = vec![9u8; NONCE_SIZE];
        bytes.extend_from_slice(b"ciphertext");

        let env = Envelope::unpack(&bytes).unwrap();
        assert_eq!(env.nonce(), &[9u8; NONCE_SIZE]);
        assert_eq!(env.ciphertext(), b"ciphertext");
    }

    #[test]
    fn test_unpack_nonce_only() {
        let env = Envelope::unpack(&[0u8; NONCE_SIZE]).unwrap();
        assert!(env.ciphertext().is_empty());
    }

    #[test]
    fn test_unpack_truncated() {
        let result = Envelope::unpack(&[0u8; NONCE_SIZE - 1]);
        assert!(matches!(result, Err(CryptoError::MalformedInput(_))));
    }

    #[test]
    fn test_from_base64url_truncated() {
        // 11 bytes decodes fine but cannot hold a nonce
        let text = codec::encode(&[0u8; 11]);
        assert!(matches!(
            Envelope::from_base64url(&text),
            Err(CryptoError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_base64url_roundtrip() {
        let env = Envelope::new([0xAB; NONCE_SIZE], vec![0xFF; 40]);
        let text = env.to_base64url();
        assert_eq!(Envelope::from_base64url(&text).unwrap(), env);
    }

    #[test]
    fn test_debug_hides_ciphertext() {
        let env = Envelope::new([0u8; NONCE_SIZE], vec![0x42; 5]);
        let dbg = format!("{env:?}");
        assert!(dbg.contains("ciphertext_len: 5"));
    }
}
