//! Reveal flow: `Idle → Fetching → Decrypting → {Revealed | Failed}`
//!
//! The link is parsed before anything touches the network, and the server
//! status is classified before any decryption is attempted.

use hushlink_core::types::FetchSecretResponse;
use hushlink_crypto::{codec, Aes256GcmCipher, Cipher, Envelope};
use secrecy::SecretString;
use zeroize::Zeroizing;

use crate::link;
use crate::transport::SecretApi;
use crate::ObserverFn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealState {
    Idle,
    Fetching,
    Decrypting,
    Revealed,
    Failed(RevealFailure),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealFailure {
    InvalidLink,
    NotFound,
    Expired,
    ServerError,
    Decryption,
}

impl RevealFailure {
    pub fn message(&self) -> &'static str {
        match self {
            RevealFailure::InvalidLink => "Invalid Link. Missing ID or Decryption Key.",
            RevealFailure::NotFound => "Secret not found or has already been burned.",
            RevealFailure::Expired => "Secret expired.",
            RevealFailure::ServerError => "Server communication error.",
            RevealFailure::Decryption => {
                "Decryption failed. The link is corrupted or the key is wrong."
            }
        }
    }

    /// A fetch may already have burned the record, so no reveal is ever retried.
    pub fn is_retryable(&self) -> bool {
        false
    }
}

impl std::fmt::Display for RevealFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for RevealFailure {}

/// Map a fetch status to a failure; `None` means the body should be decrypted.
pub fn classify_fetch_status(status: u16) -> Option<RevealFailure> {
    match status {
        200..=299 => None,
        404 => Some(RevealFailure::NotFound),
        410 => Some(RevealFailure::Expired),
        _ => Some(RevealFailure::ServerError),
    }
}

#[derive(Debug)]
pub struct RevealReport {
    pub states: Vec<RevealState>,
    pub outcome: Result<SecretString, RevealFailure>,
}

pub struct RevealFlow<'a> {
    api: &'a dyn SecretApi,
    cipher: Box<dyn Cipher>,
    observer: Option<ObserverFn<RevealState>>,
    states: Vec<RevealState>,
}

impl<'a> RevealFlow<'a> {
    pub fn new(api: &'a dyn SecretApi) -> Self {
        Self {
            api,
            cipher: Box::new(Aes256GcmCipher),
            observer: None,
            states: vec![RevealState::Idle],
        }
    }

    pub fn with_cipher(mut self, cipher: Box<dyn Cipher>) -> Self {
        self.cipher = cipher;
        self
    }

    pub fn with_observer(mut self, observer: ObserverFn<RevealState>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Reveal the secret behind `location`, a full share link.
    pub async fn run(mut self, location: &str) -> RevealReport {
        let outcome = self.drive(location).await;
        match &outcome {
            Ok(_) => self.enter(RevealState::Revealed),
            Err(failure) => {
                tracing::warn!(error = %failure, "secret reveal failed");
                self.enter(RevealState::Failed(*failure));
            }
        }
        RevealReport {
            states: self.states,
            outcome,
        }
    }

    async fn drive(&mut self, location: &str) -> Result<SecretString, RevealFailure> {
        let parts = link::parse(location).map_err(|_| RevealFailure::InvalidLink)?;

        self.enter(RevealState::Fetching);
        let reply = self.api.get_secret(&parts.secret_id).await.map_err(|e| {
            tracing::debug!(error = %e, "fetch failed at transport level");
            RevealFailure::ServerError
        })?;

        if let Some(failure) = classify_fetch_status(reply.status) {
            tracing::debug!(secret_id = %parts.secret_id, status = reply.status, "fetch refused");
            return Err(failure);
        }

        let fetched: FetchSecretResponse =
            serde_json::from_str(&reply.body).map_err(|_| RevealFailure::ServerError)?;
        tracing::info!(secret_id = %parts.secret_id, "secret fetched");

        self.enter(RevealState::Decrypting);
        let raw_key = Zeroizing::new(
            codec::decode(&parts.key_text).map_err(|_| RevealFailure::Decryption)?,
        );
        let envelope =
            Envelope::from_base64url(&fetched.data).map_err(|_| RevealFailure::Decryption)?;
        let plaintext = self
            .cipher
            .decrypt(&raw_key, &envelope)
            .map_err(|_| RevealFailure::Decryption)?;

        Ok(SecretString::from(plaintext))
    }

    fn enter(&mut self, state: RevealState) {
        tracing::trace!(?state, "reveal flow transition");
        if let Some(observer) = &self.observer {
            observer(&state);
        }
        self.states.push(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedApi;
    use hushlink_crypto::{encrypt, generate_key};
    use secrecy::ExposeSecret;
    use std::sync::atomic::Ordering;

    /// A stored fetch body for `plaintext` and the link that opens it.
    fn sealed(plaintext: &str) -> (String, String) {
        let key = generate_key();
        let envelope = encrypt(&key, plaintext).unwrap();
        let body = format!(r#"{{"data":"{}"}}"#, envelope.to_base64url());
        let link = link::build("https://x", "abc123", key.as_bytes());
        (body, link.as_str().to_string())
    }

    #[tokio::test]
    async fn test_reveal_success() {
        let (body, link) = sealed("hello");
        let api = ScriptedApi::replying(200, &body);

        let report = RevealFlow::new(&api).run(&link).await;

        assert_eq!(report.outcome.unwrap().expose_secret(), "hello");
        assert_eq!(
            report.states,
            vec![
                RevealState::Idle,
                RevealState::Fetching,
                RevealState::Decrypting,
                RevealState::Revealed
            ]
        );
        assert_eq!(api.last_get.lock().unwrap().as_deref(), Some("abc123"));
    }

    #[tokio::test]
    async fn test_invalid_link_makes_no_request() {
        let api = ScriptedApi::replying(200, "{}");

        for location in ["https://x/view/#", "https://x/view/abc123", "garbage"] {
            let report = RevealFlow::new(&api).run(location).await;
            let failure = report.outcome.unwrap_err();
            assert_eq!(failure, RevealFailure::InvalidLink);
            assert_eq!(failure.message(), "Invalid Link. Missing ID or Decryption Key.");
        }
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn test_status_classification_skips_decrypt() {
        let cases = [
            (404, "Secret not found or has already been burned."),
            (410, "Secret expired."),
            (500, "Server communication error."),
            (403, "Server communication error."),
        ];
        for (status, expected) in cases {
            let api = ScriptedApi::replying(status, r#"{"error":"nope"}"#);
            let report = RevealFlow::new(&api).run("https://x/view/abc#Zm9v").await;

            assert_eq!(report.outcome.unwrap_err().message(), expected);
            assert!(
                !report.states.contains(&RevealState::Decrypting),
                "status {status} must not reach decryption"
            );
            assert_eq!(api.gets.load(Ordering::SeqCst), 1);
        }
    }

    #[tokio::test]
    async fn test_transport_failure_is_server_error() {
        let api = ScriptedApi::unreachable();
        let report = RevealFlow::new(&api).run("https://x/view/abc#Zm9v").await;
        assert_eq!(report.outcome.unwrap_err(), RevealFailure::ServerError);
    }

    #[tokio::test]
    async fn test_undecodable_body_is_server_error() {
        let api = ScriptedApi::replying(200, "<html></html>");
        let report = RevealFlow::new(&api).run("https://x/view/abc#Zm9v").await;
        assert_eq!(report.outcome.unwrap_err(), RevealFailure::ServerError);
    }

    #[tokio::test]
    async fn test_wrong_key_is_decryption_failure() {
        let (body, _) = sealed("hello");
        let other = link::build("https://x", "abc123", generate_key().as_bytes());
        let api = ScriptedApi::replying(200, &body);

        let report = RevealFlow::new(&api).run(other.as_str()).await;

        let failure = report.outcome.unwrap_err();
        assert_eq!(failure, RevealFailure::Decryption);
        assert!(!failure.is_retryable());
        assert_eq!(report.states[2], RevealState::Decrypting);
    }

    #[tokio::test]
    async fn test_corrupt_fragment_is_decryption_failure() {
        let (body, _) = sealed("hello");
        let api = ScriptedApi::replying(200, &body);

        // Length 1 mod 4 can never be valid base64url
        let report = RevealFlow::new(&api).run("https://x/view/abc123#Zm9vY").await;
        assert_eq!(report.outcome.unwrap_err(), RevealFailure::Decryption);
    }

    #[tokio::test]
    async fn test_truncated_envelope_is_decryption_failure() {
        let (_, link) = sealed("hello");
        let api = ScriptedApi::replying(200, r#"{"data":"AAAA"}"#);

        let report = RevealFlow::new(&api).run(&link).await;
        assert_eq!(report.outcome.unwrap_err(), RevealFailure::Decryption);
    }

    #[test]
    fn test_classify_fetch_status() {
        assert_eq!(classify_fetch_status(200), None);
        assert_eq!(classify_fetch_status(204), None);
        assert_eq!(classify_fetch_status(404), Some(RevealFailure::NotFound));
        assert_eq!(classify_fetch_status(410), Some(RevealFailure::Expired));
        assert_eq!(classify_fetch_status(302), Some(RevealFailure::ServerError));
        assert_eq!(classify_fetch_status(503), Some(RevealFailure::ServerError));
    }
}
