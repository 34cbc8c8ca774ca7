use thiserror::Error;

pub type CryptoResult<T> = Result<T, CryptoError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// Text or bytes that cannot be a valid codec input or envelope
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Tag verification failed. Wrong key, tampering and corruption are
    /// deliberately indistinguishable.
    #[error("decryption failed: authentication tag mismatch")]
    Authentication,

    #[error("invalid key length: {actual} bytes (expected {expected})")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("cipher error: {0}")]
    Cipher(String),
}
