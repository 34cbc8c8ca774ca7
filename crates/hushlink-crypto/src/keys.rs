//! Secret keys: generation, raw export, and decrypt-only import

use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroize;

use crate::codec;
use crate::error::{CryptoError, CryptoResult};
use crate::KEY_SIZE;

/// A 256-bit AES-GCM key usable for both encryption and decryption.
///
/// Lives only in memory and in the link fragment. Zeroized on drop.
#[derive(Clone)]
pub struct SecretKey {
    bytes: [u8; KEY_SIZE],
}

impl SecretKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }

    /// Export the raw key material.
    pub fn to_bytes(&self) -> [u8; KEY_SIZE] {
        self.bytes
    }

    /// Raw key as unpadded base64url, ready for a link fragment.
    pub fn to_base64url(&self) -> String {
        codec::encode(&self.bytes)
    }
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// A key imported from raw bytes, restricted to decryption.
///
/// Offers no way to encrypt with or re-export the material.
pub struct DecryptKey {
    bytes: [u8; KEY_SIZE],
}

impl DecryptKey {
    /// Import raw key bytes. Anything other than exactly `KEY_SIZE` bytes is rejected.
    pub fn from_slice(raw: &[u8]) -> CryptoResult<Self> {
        if raw.len() != KEY_SIZE {
            return Err(CryptoError::InvalidKeyLength {
                expected: KEY_SIZE,
                actual: raw.len(),
            });
        }
        let mut bytes = [0u8; KEY_SIZE];
        bytes.copy_from_slice(raw);
        Ok(Self { bytes })
    }

    pub(crate) fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl From<&SecretKey> for DecryptKey {
    fn from(key: &SecretKey) -> Self {
        Self {
            bytes: key.to_bytes(),
        }
    }
}

impl Drop for DecryptKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for DecryptKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecryptKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Generate a random 256-bit key from the OS CSPRNG.
pub fn generate_key() -> SecretKey {
    let mut bytes = [0u8; KEY_SIZE];
    OsRng.fill_bytes(&mut bytes);
    SecretKey::from_bytes(bytes)
}
