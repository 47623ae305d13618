//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::token::TokenCodec;

/// Application state shared across all request handlers.
///
/// The codec is `Arc`-wrapped so Axum can clone the state per request without
/// copying key material.
#[derive(Clone)]
pub struct AppState {
    /// The process-wide token codec holding both secret keys.
    pub codec: Arc<TokenCodec>,
}

impl AppState {
    /// Create a new [`AppState`] around a constructed codec.
    pub fn new(codec: TokenCodec) -> Self {
        Self {
            codec: Arc::new(codec),
        }
    }
}

#[cfg(test)]
impl Default for AppState {
    /// Creates an [`AppState`] with fixed test keys, suitable for tests.
    fn default() -> Self {
        use crate::token::{EncryptionKey, SignatureKey};
        Self::new(TokenCodec::new(
            SignatureKey::new("test-signature-key").unwrap(),
            EncryptionKey::from_hex(&"42".repeat(32)).unwrap(),
        ))
    }
}
