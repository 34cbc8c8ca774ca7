//! HTTP surface of the storage service
//!
//! Endpoints:
//!   POST /api/v1/secret       store `{data, duration}`, answer `{id}`
//!   GET  /api/v1/secret/{id}  hand out `{data}` once, then forget it
//!   GET  /healthz             liveness probe
//!   GET  /metrics             Prometheus text format

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use hushlink_core::config::ServerConfig;
use hushlink_core::types::{
    CreateSecretRequest, CreateSecretResponse, ErrorResponse, FetchSecretResponse,
};
use hushlink_core::SECRET_API_PATH;
use hushlink_crypto::{decrypt_bytes, encrypt_bytes, generate_key, DecryptKey, Envelope, SecretKey};
use prometheus_client::registry::Registry;
use std::sync::Arc;
use std::time::Duration;

use crate::metrics::{healthz_handler, metrics_handler, ServiceMetrics};
use crate::store::{MemoryStore, StoreError};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<MemoryStore>,
    pub metrics: ServiceMetrics,
    pub registry: Arc<Registry>,
    /// Process-lifetime key for at-rest sealing; `None` stores bytes as uploaded
    sealer: Option<Arc<SecretKey>>,
    max_duration_secs: u64,
    max_payload_bytes: usize,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Self {
        let mut registry = Registry::default();
        let metrics = ServiceMetrics::new(&mut registry);
        let sealer = config.seal_at_rest.then(|| Arc::new(generate_key()));

        Self {
            store: Arc::new(MemoryStore::new()),
            metrics,
            registry: Arc::new(registry),
            sealer,
            max_duration_secs: config.max_duration_secs,
            max_payload_bytes: config.max_payload_bytes,
        }
    }

    fn seal(&self, data: String) -> Result<Vec<u8>, ApiError> {
        match &self.sealer {
            Some(key) => encrypt_bytes(key, data.as_bytes())
                .map(|envelope| envelope.pack())
                .map_err(|e| {
                    tracing::error!("at-rest seal failed: {e}");
                    ApiError::internal("Internal encryption error")
                }),
            None => Ok(data.into_bytes()),
        }
    }

    fn open(&self, stored: Vec<u8>) -> Result<String, ApiError> {
        let bytes = match &self.sealer {
            Some(key) => Envelope::unpack(&stored)
                .and_then(|envelope| decrypt_bytes(&DecryptKey::from(&**key), &envelope))
                .map_err(|e| {
                    tracing::error!("at-rest open failed: {e}");
                    ApiError::internal("Internal decryption error")
                })?,
            None => stored,
        };
        String::from_utf8(bytes).map_err(|_| ApiError::internal("Internal decryption error"))
    }
}

pub fn router(state: AppState) -> Router {
    let limit = state.max_payload_bytes;
    Router::new()
        .route(SECRET_API_PATH, post(create_secret))
        .route(&format!("{SECRET_API_PATH}/{{id}}"), get(fetch_secret))
        .route("/healthz", get(healthz_handler))
        .route("/metrics", get(metrics_handler))
        .layer(DefaultBodyLimit::max(limit))
        .with_state(state)
}

/// A non-2xx answer carrying `{ "error": ... }`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse::new(self.message))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => Self::new(StatusCode::NOT_FOUND, "Secret not found"),
            StoreError::Expired => Self::new(StatusCode::GONE, "Secret expired"),
            StoreError::DurationTooLarge => Self::bad_request("Duration too large"),
        }
    }
}

async fn create_secret(
    State(state): State<AppState>,
    payload: Result<Json<CreateSecretRequest>, JsonRejection>,
) -> Result<Json<CreateSecretResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::new(StatusCode::PAYLOAD_TOO_LARGE, "Request body too large")
        } else {
            tracing::debug!("rejected create body: {rejection}");
            ApiError::bad_request("Unable to serialize request body")
        }
    })?;

    if request.data.is_empty() {
        return Err(ApiError::bad_request("Secret data must not be empty."));
    }
    if request.duration == 0 {
        return Err(ApiError::bad_request("Duration must be greater than 0."));
    }
    if request.duration > state.max_duration_secs {
        return Err(ApiError::bad_request(format!(
            "Duration must not exceed {} seconds.",
            state.max_duration_secs
        )));
    }

    let duration = request.duration;
    let stored = state.seal(request.data)?;
    let id = state
        .store
        .create_entry(stored, Duration::from_secs(duration))?;

    state.metrics.created.inc();
    state.metrics.set_stored(state.store.len());
    tracing::info!(secret_id = %id, ttl_secs = duration, "secret stored");

    Ok(Json(CreateSecretResponse { id }))
}

async fn fetch_secret(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FetchSecretResponse>, ApiError> {
    let result = state.store.get_and_delete(&id);
    state.metrics.set_stored(state.store.len());

    let stored = match result {
        Ok(stored) => stored,
        Err(e) => {
            match e {
                StoreError::NotFound => {
                    state.metrics.not_found.inc();
                }
                StoreError::Expired => {
                    state.metrics.expired.inc();
                }
                StoreError::DurationTooLarge => {}
            }
            tracing::info!(secret_id = %id, error = %e, "fetch refused");
            return Err(e.into());
        }
    };

    let data = state.open(stored)?;
    state.metrics.revealed.inc();
    tracing::info!(secret_id = %id, "secret revealed and burned");

    Ok(Json(FetchSecretResponse { data }))
}
