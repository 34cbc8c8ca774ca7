//! hushlink: share a secret through a one-time link
//!
//! Commands:
//!   create [SECRET]   - encrypt locally, upload, print the share link
//!   reveal <LINK>     - fetch, burn and decrypt a secret, print it
//!   config show       - display current configuration
//!
//! stdout carries only the link or the secret; everything else goes to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

use hushlink_client::{
    present_create, present_reveal, CreateFlow, CreateRequest, CreateState, HttpSecretApi,
    Presenter, RevealFailure, RevealFlow, RevealState, ShareLink,
};
use hushlink_core::config::HushConfig;
use hushlink_core::types::duration_from_parts;

// ── CLI structure ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "hushlink",
    version,
    about = "One-time secret links",
    long_about = "hushlink: encrypt a secret on this machine, store only ciphertext, \
                  and share a link that works exactly once"
)]
struct Cli {
    /// Path to hushlink.toml configuration file
    #[arg(long, short = 'c', env = "HUSHLINK_CONFIG", default_value = "hushlink.toml")]
    config: PathBuf,

    /// Log level for stderr diagnostics (trace, debug, info, warn, error)
    #[arg(long, env = "HUSHLINK_LOG", default_value = "warn")]
    log: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encrypt a secret and print its one-time link
    Create {
        /// Secret text; prompted for (or read from stdin) when omitted
        secret: Option<String>,

        #[arg(long)]
        hours: Option<u64>,

        #[arg(long)]
        minutes: Option<u64>,

        #[arg(long)]
        seconds: Option<u64>,

        /// Storage service base URL (overrides client.server_url)
        #[arg(long, env = "HUSHLINK_SERVER")]
        server: Option<String>,
    },

    /// Fetch, burn and decrypt the secret behind a link
    Reveal {
        link: String,

        /// Storage service base URL (default: the link's origin)
        #[arg(long, env = "HUSHLINK_SERVER")]
        server: Option<String>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the active configuration (merged defaults + config file)
    Show,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log);

    let config = HushConfig::load(&cli.config)
        .with_context(|| format!("loading config {}", cli.config.display()))?;
    config.validate().context("invalid configuration")?;

    let ok = match cli.command {
        Commands::Create {
            secret,
            hours,
            minutes,
            seconds,
            server,
        } => cmd_create(&config, secret, (hours, minutes, seconds), server).await?,
        Commands::Reveal { link, server } => cmd_reveal(&config, &link, server).await?,
        Commands::Config {
            action: ConfigAction::Show,
        } => cmd_config_show(&config, &cli.config)?,
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

fn init_logging(level: &str) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

// ── Terminal presentation ─────────────────────────────────────────────────────

struct TerminalPresenter {
    spinner: ProgressBar,
}

impl Presenter for TerminalPresenter {
    fn display_result(&mut self, link: &ShareLink) {
        self.spinner.finish_and_clear();
        eprintln!("Share this link. It can be opened once:");
        println!("{link}");
    }

    fn display_error(&mut self, message: &str) {
        self.spinner.finish_and_clear();
        eprintln!("{message}");
    }

    fn display_secret(&mut self, text: &str) {
        self.spinner.finish_and_clear();
        println!("{text}");
    }
}

fn make_spinner(prefix: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{prefix:.bold} {spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_prefix(prefix.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn create_status(state: &CreateState) -> Option<&'static str> {
    match state {
        CreateState::Encrypting => Some("Encrypting..."),
        CreateState::Uploading => Some("Uploading..."),
        _ => None,
    }
}

fn reveal_status(state: &RevealState) -> Option<&'static str> {
    match state {
        RevealState::Fetching => Some("Fetching..."),
        RevealState::Decrypting => Some("Decrypting..."),
        _ => None,
    }
}

fn build_api(config: &HushConfig, base_url: &str) -> Result<HttpSecretApi> {
    HttpSecretApi::from_config(&config.client, base_url)
        .with_context(|| format!("connecting to {base_url}"))
}

// ── `hushlink create` ─────────────────────────────────────────────────────────

async fn cmd_create(
    config: &HushConfig,
    secret: Option<String>,
    parts: (Option<u64>, Option<u64>, Option<u64>),
    server: Option<String>,
) -> Result<bool> {
    let duration_secs = match parts {
        (None, None, None) => config.client.default_duration_secs,
        (h, m, s) => duration_from_parts(h.unwrap_or(0), m.unwrap_or(0), s.unwrap_or(0))
            .context("duration is too large")?,
    };

    let plaintext = match secret {
        Some(text) => text,
        None => read_secret()?,
    };

    let server_url = server.unwrap_or_else(|| config.client.server_url.clone());
    let api = build_api(config, &server_url)?;
    tracing::debug!(server = %server_url, duration_secs, "creating secret");

    let spinner = make_spinner("create");
    let progress = spinner.clone();
    let report = CreateFlow::new(&api, server_url.as_str())
        .with_observer(Box::new(move |state| {
            if let Some(msg) = create_status(state) {
                progress.set_message(msg);
            }
        }))
        .run(CreateRequest::new(plaintext, duration_secs))
        .await;

    Ok(present_create(&report, &mut TerminalPresenter { spinner }))
}

/// Prompt without echo on a terminal, otherwise take all of stdin.
fn read_secret() -> Result<String> {
    if std::io::stdin().is_terminal() {
        rpassword::prompt_password("Secret: ").context("reading secret from terminal")
    } else {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("reading secret from stdin")?;
        // A single trailing newline comes from `echo`, not the secret
        if text.ends_with('\n') {
            text.pop();
            if text.ends_with('\r') {
                text.pop();
            }
        }
        Ok(text)
    }
}

// ── `hushlink reveal` ─────────────────────────────────────────────────────────

/// Server to fetch from: `--server`, else the link's own origin.
///
/// The link is parsed first so a malformed one is reported before any
/// transport is configured.
fn reveal_server(link: &str, server: Option<String>) -> Result<String, RevealFailure> {
    let parts = hushlink_client::link::parse(link).map_err(|_| RevealFailure::InvalidLink)?;
    Ok(server.unwrap_or(parts.origin))
}

async fn cmd_reveal(config: &HushConfig, link: &str, server: Option<String>) -> Result<bool> {
    let server_url = match reveal_server(link, server) {
        Ok(url) => url,
        Err(failure) => {
            tracing::warn!(error = %failure, "secret reveal failed");
            eprintln!("{}", failure.message());
            return Ok(false);
        }
    };
    let api = build_api(config, &server_url)?;

    let spinner = make_spinner("reveal");
    let progress = spinner.clone();
    let report = RevealFlow::new(&api)
        .with_observer(Box::new(move |state| {
            if let Some(msg) = reveal_status(state) {
                progress.set_message(msg);
            }
        }))
        .run(link)
        .await;

    Ok(present_reveal(&report, &mut TerminalPresenter { spinner }))
}

// ── `hushlink config show` ────────────────────────────────────────────────────

fn cmd_config_show(config: &HushConfig, config_path: &Path) -> Result<bool> {
    if config_path.exists() {
        println!("# Configuration from: {}", config_path.display());
    } else {
        println!("# Configuration: defaults (no file at {})", config_path.display());
    }
    println!();
    let rendered = toml::to_string_pretty(config).context("serializing config to TOML")?;
    print!("{rendered}");
    Ok(true)
}
