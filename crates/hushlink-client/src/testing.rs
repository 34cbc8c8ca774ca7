//! Scripted transport for flow unit tests

use async_trait::async_trait;
use hushlink_core::types::CreateSecretRequest;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::transport::{ApiReply, SecretApi, TransportError};

/// Answers every call with the same canned reply and counts requests.
pub struct ScriptedApi {
    reply: Option<ApiReply>,
    pub posts: AtomicUsize,
    pub gets: AtomicUsize,
    pub last_post: Mutex<Option<CreateSecretRequest>>,
    pub last_get: Mutex<Option<String>>,
}

impl ScriptedApi {
    pub fn replying(status: u16, body: &str) -> Self {
        Self::new(Some(ApiReply::new(status, body)))
    }

    /// Every call fails at the transport layer.
    pub fn unreachable() -> Self {
        Self::new(None)
    }

    fn new(reply: Option<ApiReply>) -> Self {
        Self {
            reply,
            posts: AtomicUsize::new(0),
            gets: AtomicUsize::new(0),
            last_post: Mutex::new(None),
            last_get: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.posts.load(Ordering::SeqCst) + self.gets.load(Ordering::SeqCst)
    }

    fn answer(&self) -> Result<ApiReply, TransportError> {
        self.reply
            .clone()
            .ok_or_else(|| TransportError::InvalidUrl("scripted transport failure".into()))
    }
}

#[async_trait]
impl SecretApi for ScriptedApi {
    async fn post_secret(&self, request: &CreateSecretRequest) -> Result<ApiReply, TransportError> {
        self.posts.fetch_add(1, Ordering::SeqCst);
        *self.last_post.lock().unwrap() = Some(request.clone());
        self.answer()
    }

    async fn get_secret(&self, secret_id: &str) -> Result<ApiReply, TransportError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        *self.last_get.lock().unwrap() = Some(secret_id.to_string());
        self.answer()
    }
}
