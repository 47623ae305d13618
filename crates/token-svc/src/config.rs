//! Configuration loading and validation for the token service.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any required variable is missing or invalid.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::token::keys::ENCRYPTION_KEY_LEN;

/// Validated token service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Secret used to key the HMAC signature. **Required.** Never logged.
    pub signature_key: String,

    /// Hex-encoded 32-byte AES-256 key. **Required.** Never logged.
    pub encryption_key: String,

    /// Port the HTTP server listens on.
    #[serde(default = "default_http_port")]
    pub http_port: u16,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_http_port() -> u16 {
    8080
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required variable is absent or cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        ensure_non_empty(&self.signature_key, "SIGNATURE_KEY")?;
        ensure_non_empty(&self.encryption_key, "ENCRYPTION_KEY")?;

        // Fail fast on a malformed key rather than at first request.
        let decoded = hex::decode(&self.encryption_key)
            .context("ENCRYPTION_KEY must be hex-encoded")?;
        if decoded.len() != ENCRYPTION_KEY_LEN {
            anyhow::bail!(
                "ENCRYPTION_KEY must decode to {ENCRYPTION_KEY_LEN} bytes, got {}",
                decoded.len()
            );
        }
        Ok(())
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} is required and must not be empty");
    }
    Ok(())
}
