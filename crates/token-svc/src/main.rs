//! `token-svc` — opaque token service entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise the tracing subscriber.
//! 3. Parse the signature and encryption keys and build the [`TokenCodec`].
//! 4. Build the Axum router and start the HTTP server.

mod config;
mod server;
mod telemetry;
mod token;

use anyhow::{Context, Result};
use tracing::info;

use config::Config;
use server::state::AppState;
use token::{EncryptionKey, SignatureKey, TokenCodec};

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init_telemetry(&cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        http_port = cfg.http_port,
        "token-svc starting"
    );

    // -----------------------------------------------------------------------
    // 3. Key material and codec
    // -----------------------------------------------------------------------
    let signature_key =
        SignatureKey::new(&cfg.signature_key).context("invalid SIGNATURE_KEY")?;
    let encryption_key =
        EncryptionKey::from_hex(&cfg.encryption_key).context("invalid ENCRYPTION_KEY")?;
    let codec = TokenCodec::new(signature_key, encryption_key);

    // -----------------------------------------------------------------------
    // 4. HTTP server
    // -----------------------------------------------------------------------
    let state = AppState::new(codec);
    let router = server::router::build(state);

    let addr: std::net::SocketAddr = ([0, 0, 0, 0], cfg.http_port).into();
    info!(addr = %addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
