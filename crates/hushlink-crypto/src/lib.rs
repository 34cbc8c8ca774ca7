//! hushlink-crypto: client-side encryption for hushlink secrets
//!
//! The server only ever sees an envelope; the key travels in the link fragment.
//!
//! Envelope layout:
//! ```text
//! [12 bytes: random nonce][N bytes: AES-256-GCM ciphertext][16 bytes: GCM tag]
//! ```
//!
//! Both the envelope (upload body) and the raw key (link fragment) are carried
//! as unpadded base64url text.

pub mod codec;
pub mod engine;
pub mod envelope;
pub mod error;
pub mod keys;
pub mod provider;

pub use engine::{decrypt, decrypt_bytes, encrypt, encrypt_bytes};
pub use envelope::Envelope;
pub use error::{CryptoError, CryptoResult};
pub use keys::{generate_key, DecryptKey, SecretKey};
pub use provider::{Aes256GcmCipher, Cipher};

/// Size of a secret key in bytes (256-bit)
pub const KEY_SIZE: usize = 32;

/// Size of an AES-GCM nonce (96-bit)
pub const NONCE_SIZE: usize = 12;

/// Size of a GCM authentication tag
pub const TAG_SIZE: usize = 16;
