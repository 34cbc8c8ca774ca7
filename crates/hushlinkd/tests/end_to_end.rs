//! Integration test: hushlink-client flows against a live hushlinkd router
//!
//! Binds an ephemeral port, serves the real router and drives it through the
//! reqwest transport, so the whole wire path is exercised.

use hushlink_client::{CreateFlow, CreateRequest, HttpSecretApi, RevealFailure, RevealFlow};
use hushlink_core::config::ServerConfig;
use secrecy::ExposeSecret;
use std::time::Duration;

async fn start_server(config: ServerConfig) -> (String, hushlinkd::AppState) {
    let state = hushlinkd::AppState::new(&config);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().unwrap();
    let app = hushlinkd::router(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), state)
}

fn client(base: &str) -> HttpSecretApi {
    HttpSecretApi::new(base, Duration::from_secs(5), false).expect("client")
}

#[tokio::test]
async fn create_reveal_burn_over_http() {
    let (base, state) = start_server(ServerConfig::default()).await;
    let api = client(&base);

    let created = CreateFlow::new(&api, &base)
        .run(CreateRequest::new("hello", 60))
        .await;
    let link = created.outcome.expect("create over http");
    assert!(link.as_str().starts_with(&format!("{base}/view/")));
    assert_eq!(state.store.len(), 1);

    let revealed = RevealFlow::new(&api).run(link.as_str()).await;
    assert_eq!(revealed.outcome.unwrap().expose_secret(), "hello");
    assert!(state.store.is_empty());

    let again = RevealFlow::new(&api).run(link.as_str()).await;
    assert_eq!(again.outcome.unwrap_err(), RevealFailure::NotFound);
}

#[tokio::test]
async fn unsealed_server_roundtrip() {
    let (base, _) = start_server(ServerConfig {
        seal_at_rest: false,
        ..ServerConfig::default()
    })
    .await;
    let api = client(&base);

    let link = CreateFlow::new(&api, &base)
        .run(CreateRequest::new("ünïcødé ✓", 60))
        .await
        .outcome
        .unwrap();
    let revealed = RevealFlow::new(&api).run(link.as_str()).await;
    assert_eq!(revealed.outcome.unwrap().expose_secret(), "ünïcødé ✓");
}

#[tokio::test]
async fn over_limit_duration_surfaces_server_message() {
    let (base, _) = start_server(ServerConfig {
        max_duration_secs: 60,
        ..ServerConfig::default()
    })
    .await;
    let api = client(&base);

    let failure = CreateFlow::new(&api, &base)
        .run(CreateRequest::new("hello", 61))
        .await
        .outcome
        .unwrap_err();
    assert_eq!(
        failure.message(),
        "Error: Duration must not exceed 60 seconds."
    );
}

#[tokio::test]
async fn oversized_secret_is_rejected() {
    let (base, state) = start_server(ServerConfig {
        max_payload_bytes: 256,
        ..ServerConfig::default()
    })
    .await;
    let api = client(&base);

    let report = CreateFlow::new(&api, &base)
        .run(CreateRequest::new("x".repeat(1024), 60))
        .await;
    assert!(report.outcome.is_err());
    assert!(state.store.is_empty());
}

#[tokio::test]
async fn unknown_id_is_not_found() {
    let (base, _) = start_server(ServerConfig::default()).await;
    let api = client(&base);

    let location = format!("{base}/view/{}#AAAA", "0".repeat(64));
    let report = RevealFlow::new(&api).run(&location).await;
    assert_eq!(
        report.outcome.unwrap_err().message(),
        "Secret not found or has already been burned."
    );
}
