//! AES-256-GCM encryption/decryption of secrets into envelopes
//!
//! No associated data is bound: the envelope is the whole message, and the id
//! it is stored under is chosen by the server after encryption.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::envelope::Envelope;
use crate::error::{CryptoError, CryptoResult};
use crate::keys::{DecryptKey, SecretKey};
use crate::NONCE_SIZE;

/// Encrypt UTF-8 text under `key` with a fresh random nonce.
pub fn encrypt(key: &SecretKey, plaintext: &str) -> CryptoResult<Envelope> {
    encrypt_bytes(key, plaintext.as_bytes())
}

/// Encrypt raw bytes under `key` with a fresh random nonce.
pub fn encrypt_bytes(key: &SecretKey, plaintext: &[u8]) -> CryptoResult<Envelope> {
    let cipher = Aes256Gcm::new(key.as_bytes().into());

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| CryptoError::Cipher(format!("encryption failed: {e}")))?;

    Ok(Envelope::new(nonce_bytes, ciphertext))
}

/// Import `raw_key` as a decrypt-only key and open the envelope as UTF-8 text.
pub fn decrypt(raw_key: &[u8], envelope: &Envelope) -> CryptoResult<String> {
    let key = DecryptKey::from_slice(raw_key)?;
    let plaintext = decrypt_bytes(&key, envelope)?;
    String::from_utf8(plaintext)
        .map_err(|_| CryptoError::MalformedInput("decrypted secret is not UTF-8".into()))
}

/// Open the envelope, returning the authenticated plaintext bytes.
pub fn decrypt_bytes(key: &DecryptKey, envelope: &Envelope) -> CryptoResult<Vec<u8>> {
    let cipher = Aes256Gcm::new(key.as_bytes().into());
    let nonce = Nonce::from_slice(envelope.nonce());

    cipher.decrypt(nonce, envelope.ciphertext()).map_err(|_| {
        tracing::debug!(
            ciphertext_len = envelope.ciphertext().len(),
            "envelope failed authentication"
        );
        CryptoError::Authentication
    })
}
