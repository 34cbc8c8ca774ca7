//! Cipher capability used by the client state machines.
//!
//! Any implementation must provide AEAD with a 256-bit key and a 96-bit nonce
//! so that envelopes stay interchangeable between clients.

use rand::rngs::OsRng;
use rand::RngCore;

use crate::envelope::Envelope;
use crate::error::CryptoResult;
use crate::keys::{DecryptKey, SecretKey};
use crate::{engine, keys, KEY_SIZE};

pub trait Cipher: Send + Sync {
    fn generate_key(&self) -> SecretKey;
    fn encrypt(&self, key: &SecretKey, plaintext: &str) -> CryptoResult<Envelope>;
    fn decrypt(&self, raw_key: &[u8], envelope: &Envelope) -> CryptoResult<String>;

    fn export_key(&self, key: &SecretKey) -> [u8; KEY_SIZE] {
        key.to_bytes()
    }

    fn import_key(&self, raw: &[u8]) -> CryptoResult<DecryptKey> {
        DecryptKey::from_slice(raw)
    }

    fn random_bytes(&self, buf: &mut [u8]) {
        OsRng.fill_bytes(buf);
    }
}

/// AES-256-GCM backed by the `aes-gcm` crate and the OS CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct Aes256GcmCipher;

impl Cipher for Aes256GcmCipher {
    fn generate_key(&self) -> SecretKey {
        keys::generate_key()
    }

    fn encrypt(&self, key: &SecretKey, plaintext: &str) -> CryptoResult<Envelope> {
        engine::encrypt(key, plaintext)
    }

    fn decrypt(&self, raw_key: &[u8], envelope: &Envelope) -> CryptoResult<String> {
        engine::decrypt(raw_key, envelope)
    }
}
