//! Prometheus counters for the storage service
//!
//! Exposed as text on `GET /metrics`.

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use prometheus_client::{
    encoding::text::encode,
    metrics::{counter::Counter, gauge::Gauge},
    registry::Registry,
};

use crate::routes::AppState;

#[derive(Clone, Default)]
pub struct ServiceMetrics {
    pub created: Counter,
    pub revealed: Counter,
    pub not_found: Counter,
    pub expired: Counter,
    pub swept: Counter,
    pub stored: Gauge,
}

impl ServiceMetrics {
    pub fn new(registry: &mut Registry) -> Self {
        let metrics = Self::default();

        registry.register(
            "hushlink_secrets_created",
            "Secrets accepted for storage",
            metrics.created.clone(),
        );
        registry.register(
            "hushlink_secrets_revealed",
            "Secrets handed out and burned",
            metrics.revealed.clone(),
        );
        registry.register(
            "hushlink_fetch_not_found",
            "Fetches for unknown or already burned ids",
            metrics.not_found.clone(),
        );
        registry.register(
            "hushlink_fetch_expired",
            "Fetches that found an expired secret",
            metrics.expired.clone(),
        );
        registry.register(
            "hushlink_secrets_swept",
            "Expired secrets removed by the background sweeper",
            metrics.swept.clone(),
        );
        registry.register(
            "hushlink_secrets_stored",
            "Secrets currently held in memory",
            metrics.stored.clone(),
        );

        metrics
    }

    pub fn set_stored(&self, count: usize) {
        self.stored.set(i64::try_from(count).unwrap_or(i64::MAX));
    }
}

pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    let mut body = String::new();
    match encode(&mut body, &state.registry) {
        Ok(()) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4")],
            body,
        ),
        Err(e) => {
            tracing::error!("metrics encode failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [("content-type", "text/plain")],
                e.to_string(),
            )
        }
    }
}

/// Liveness probe
pub async fn healthz_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
