//! Storage service transport
//!
//! The transport reports raw status codes and bodies; classifying them into
//! user-facing outcomes is the state machines' job.

use async_trait::async_trait;
use hushlink_core::config::ClientConfig;
use hushlink_core::types::CreateSecretRequest;
use hushlink_core::SECRET_API_PATH;
use reqwest::Url;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid server URL: {0}")]
    InvalidUrl(String),

    #[error(
        "server URL uses plaintext HTTP ({0}) but TLS is enforced; use an https:// URL \
         or set client.enforce_tls = false for local development"
    )]
    InsecureEndpoint(String),
}

/// Status code and body text of a storage service response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiReply {
    pub status: u16,
    pub body: String,
}

impl ApiReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The two calls the storage service offers.
#[async_trait]
pub trait SecretApi: Send + Sync {
    /// `POST /api/v1/secret`
    async fn post_secret(&self, request: &CreateSecretRequest) -> Result<ApiReply, TransportError>;

    /// `GET /api/v1/secret/{id}`
    async fn get_secret(&self, secret_id: &str) -> Result<ApiReply, TransportError>;
}

/// reqwest-backed transport for a remote `hushlinkd`.
#[derive(Debug, Clone)]
pub struct HttpSecretApi {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpSecretApi {
    /// Build a transport for `base_url`.
    ///
    /// If `enforce_tls` is true and the URL uses HTTP, this returns an error.
    /// Otherwise, a warning is logged for non-HTTPS URLs.
    pub fn new(base_url: &str, timeout: Duration, enforce_tls: bool) -> Result<Self, TransportError> {
        let base_url =
            Url::parse(base_url).map_err(|e| TransportError::InvalidUrl(format!("{base_url}: {e}")))?;

        match base_url.scheme() {
            "https" => {}
            "http" if enforce_tls => {
                return Err(TransportError::InsecureEndpoint(base_url.to_string()));
            }
            "http" => {
                tracing::warn!(
                    url = %base_url,
                    "server URL uses plaintext HTTP; ciphertext and secret ids travel unencrypted"
                );
            }
            other => {
                return Err(TransportError::InvalidUrl(format!(
                    "unsupported scheme {other:?} in {base_url}"
                )));
            }
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &ClientConfig, base_url: &str) -> Result<Self, TransportError> {
        Self::new(
            base_url,
            Duration::from_secs(config.request_timeout_secs),
            config.enforce_tls,
        )
    }

    fn collection_url(&self) -> Result<Url, TransportError> {
        self.base_url
            .join(SECRET_API_PATH)
            .map_err(|e| TransportError::InvalidUrl(format!("{SECRET_API_PATH}: {e}")))
    }

    /// `{collection}/{id}` with the id appended exactly as it appeared in the link.
    ///
    /// Link segments arrive already percent-encoded, so they must not be encoded again.
    fn secret_url(&self, secret_id: &str) -> Result<Url, TransportError> {
        let mut url = self.collection_url()?;
        url.set_path(&format!("{SECRET_API_PATH}/{secret_id}"));
        Ok(url)
    }

    async fn into_reply(response: reqwest::Response) -> Result<ApiReply, TransportError> {
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(ApiReply { status, body })
    }
}

#[async_trait]
impl SecretApi for HttpSecretApi {
    async fn post_secret(&self, request: &CreateSecretRequest) -> Result<ApiReply, TransportError> {
        let url = self.collection_url()?;
        tracing::debug!(%url, duration = request.duration, "uploading envelope");
        let response = self.client.post(url).json(request).send().await?;
        Self::into_reply(response).await
    }

    async fn get_secret(&self, secret_id: &str) -> Result<ApiReply, TransportError> {
        let url = self.secret_url(secret_id)?;
        tracing::debug!(%url, "fetching envelope");
        let response = self.client.get(url).send().await?;
        Self::into_reply(response).await
    }
}
