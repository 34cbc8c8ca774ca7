//! Create flow: `Idle → Encrypting → Uploading → {LinkReady | Failed}`
//!
//! Input is validated before any key is generated. The raw key is exported
//! into the link only after the server has accepted the envelope.

use hushlink_core::types::{CreateSecretRequest, CreateSecretResponse, ErrorResponse};
use hushlink_crypto::{Aes256GcmCipher, Cipher};
use secrecy::{ExposeSecret, SecretString};
use zeroize::Zeroizing;

use crate::link::{self, ShareLink};
use crate::transport::SecretApi;
use crate::ObserverFn;

pub const EMPTY_SECRET_MESSAGE: &str = "Please enter a secret message.";
pub const ZERO_DURATION_MESSAGE: &str = "Duration must be greater than 0.";
const FALLBACK_SERVER_ERROR: &str = "Server error";

/// What the sender asked to share.
#[derive(Debug)]
pub struct CreateRequest {
    pub plaintext: SecretString,
    /// Time-to-live in seconds; must be positive
    pub duration_secs: u64,
}

impl CreateRequest {
    pub fn new(plaintext: impl Into<String>, duration_secs: u64) -> Self {
        Self {
            plaintext: SecretString::from(plaintext.into()),
            duration_secs,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateState {
    Idle,
    Encrypting,
    Uploading,
    LinkReady,
    Failed(CreateFailure),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateFailure {
    /// Input rejected before any work was done
    Validation(String),
    /// Local encryption failed
    Encryption(String),
    /// The upload failed; carries the server-supplied detail when there is one
    Upload(String),
}

impl CreateFailure {
    /// Text shown to the sender.
    pub fn message(&self) -> String {
        match self {
            CreateFailure::Validation(msg) => msg.clone(),
            CreateFailure::Encryption(msg) | CreateFailure::Upload(msg) => format!("Error: {msg}"),
        }
    }

    /// Nothing was stored, so the sender may simply try again.
    pub fn is_retryable(&self) -> bool {
        true
    }
}

impl std::fmt::Display for CreateFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for CreateFailure {}

/// Every state visited, in order, plus the terminal outcome.
#[derive(Debug)]
pub struct CreateReport {
    pub states: Vec<CreateState>,
    pub outcome: Result<ShareLink, CreateFailure>,
}

pub struct CreateFlow<'a> {
    api: &'a dyn SecretApi,
    cipher: Box<dyn Cipher>,
    origin: String,
    observer: Option<ObserverFn<CreateState>>,
    states: Vec<CreateState>,
}

impl<'a> CreateFlow<'a> {
    /// `origin` is the scheme/host/port that created links point at.
    pub fn new(api: &'a dyn SecretApi, origin: impl Into<String>) -> Self {
        Self {
            api,
            cipher: Box::new(Aes256GcmCipher),
            origin: origin.into(),
            observer: None,
            states: vec![CreateState::Idle],
        }
    }

    pub fn with_cipher(mut self, cipher: Box<dyn Cipher>) -> Self {
        self.cipher = cipher;
        self
    }

    pub fn with_observer(mut self, observer: ObserverFn<CreateState>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub async fn run(mut self, request: CreateRequest) -> CreateReport {
        let outcome = self.drive(&request).await;
        match &outcome {
            Ok(_) => self.enter(CreateState::LinkReady),
            Err(failure) => {
                tracing::warn!(error = %failure, "secret creation failed");
                self.enter(CreateState::Failed(failure.clone()));
            }
        }
        CreateReport {
            states: self.states,
            outcome,
        }
    }

    async fn drive(&mut self, request: &CreateRequest) -> Result<ShareLink, CreateFailure> {
        validate(request)?;

        self.enter(CreateState::Encrypting);
        let key = self.cipher.generate_key();
        let envelope = self
            .cipher
            .encrypt(&key, request.plaintext.expose_secret())
            .map_err(|e| CreateFailure::Encryption(e.to_string()))?;

        let body = CreateSecretRequest {
            data: envelope.to_base64url(),
            duration: request.duration_secs,
        };

        self.enter(CreateState::Uploading);
        let reply = self
            .api
            .post_secret(&body)
            .await
            .map_err(|e| CreateFailure::Upload(e.to_string()))?;

        if !reply.is_success() {
            tracing::debug!(status = reply.status, "upload rejected");
            return Err(CreateFailure::Upload(server_error_detail(&reply.body)));
        }

        let created: CreateSecretResponse = serde_json::from_str(&reply.body)
            .map_err(|_| CreateFailure::Upload("invalid server response".into()))?;

        tracing::info!(secret_id = %created.id, ttl_secs = request.duration_secs, "secret stored");

        let raw_key = Zeroizing::new(self.cipher.export_key(&key));
        Ok(link::build(&self.origin, &created.id, &raw_key[..]))
    }

    fn enter(&mut self, state: CreateState) {
        tracing::trace!(?state, "create flow transition");
        if let Some(observer) = &self.observer {
            observer(&state);
        }
        self.states.push(state);
    }
}

fn validate(request: &CreateRequest) -> Result<(), CreateFailure> {
    if request.plaintext.expose_secret().is_empty() {
        return Err(CreateFailure::Validation(EMPTY_SECRET_MESSAGE.into()));
    }
    if request.duration_secs == 0 {
        return Err(CreateFailure::Validation(ZERO_DURATION_MESSAGE.into()));
    }
    Ok(())
}

/// The `error` field of a failure body, or a generic fallback.
fn server_error_detail(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .map(|e| e.error)
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| FALLBACK_SERVER_ERROR.to_string())
}
