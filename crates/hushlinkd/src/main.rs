//! hushlinkd: hushlink storage service
//!
//! Usage:
//!   hushlinkd [--config hushlink.toml] [--listen 127.0.0.1:8080]

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use hushlink_core::config::HushConfig;
use std::path::PathBuf;
use std::time::Duration;
use tokio::signal::unix::{signal, SignalKind};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "hushlinkd", version, about = "hushlink burn-after-read storage service")]
struct Cli {
    /// Path to hushlink.toml configuration file
    #[arg(long, short = 'c', env = "HUSHLINK_CONFIG", default_value = "hushlink.toml")]
    config: PathBuf,

    /// Listen address, overrides server.listen
    #[arg(long, env = "HUSHLINK_LISTEN")]
    listen: Option<String>,

    /// Log level (trace, debug, info, warn, error), overrides log.level
    #[arg(long, env = "HUSHLINK_LOG")]
    log: Option<String>,

    /// Log format, overrides log.format
    #[arg(long, env = "HUSHLINK_LOG_FORMAT")]
    log_format: Option<LogFormat>,
}

#[derive(Clone, Debug, ValueEnum)]
enum LogFormat {
    Json,
    Text,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = HushConfig::load(&cli.config)
        .with_context(|| format!("loading config {}", cli.config.display()))?;
    if let Some(listen) = cli.listen {
        config.server.listen = listen;
    }
    config.validate().context("invalid configuration")?;

    let level = cli.log.unwrap_or_else(|| config.log.level.clone());
    let format = cli.log_format.unwrap_or(if config.log.format == "json" {
        LogFormat::Json
    } else {
        LogFormat::Text
    });
    init_logging(&level, &format);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %cli.config.display(),
        seal_at_rest = config.server.seal_at_rest,
        "hushlinkd starting"
    );

    let state = hushlinkd::AppState::new(&config.server);
    let sweeper = hushlinkd::sweeper::spawn(
        state.store.clone(),
        state.metrics.clone(),
        Duration::from_secs(config.server.cleanup_interval_secs),
    );

    let listener = tokio::net::TcpListener::bind(&config.server.listen)
        .await
        .with_context(|| format!("binding {}", config.server.listen))?;
    info!(addr = %config.server.listen, "listening on /api/v1/secret, /healthz, /metrics");

    axum::serve(listener, hushlinkd::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server")?;

    sweeper.abort();
    info!("hushlinkd stopped; in-memory secrets discarded");
    Ok(())
}

async fn shutdown_signal() {
    let sigterm = signal(SignalKind::terminate());
    let sigint = signal(SignalKind::interrupt());
    match (sigterm, sigint) {
        (Ok(mut term), Ok(mut int)) => {
            tokio::select! {
                _ = term.recv() => info!("SIGTERM received, shutting down"),
                _ = int.recv() => info!("SIGINT received, shutting down"),
            }
        }
        _ => {
            tracing::warn!("signal handlers unavailable; falling back to ctrl-c");
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

fn init_logging(level: &str, format: &LogFormat) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json())
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer())
                .init();
        }
    }
}
