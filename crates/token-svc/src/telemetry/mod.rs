//! Structured logging setup.
//!
//! # Telemetry invariants
//!
//! - **No key material, tokens, or payload contents** must appear in any span
//!   attribute or log field.
//! - Log level is configurable via `LOG_LEVEL` (default: `info`).

pub mod init;

pub use init::init_telemetry;
