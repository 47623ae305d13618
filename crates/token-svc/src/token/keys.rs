//! Secret key material for the token codec.
//!
//! Both keys live only in process memory, are zeroed on drop, and never
//! appear in `Debug` output, logs, or responses.

use thiserror::Error;

/// Byte length of the AES-256 encryption key (32 bytes = 256 bits).
pub const ENCRYPTION_KEY_LEN: usize = 32;

/// Errors produced while parsing key material from configuration.
#[derive(Debug, Error)]
pub enum KeyError {
    /// The signature key is empty.
    #[error("signature key must not be empty")]
    EmptySignatureKey,

    /// The encryption key is not valid hex.
    #[error("encryption key must be hex-encoded")]
    InvalidHex,

    /// The encryption key decodes to the wrong number of bytes.
    #[error("encryption key must decode to {ENCRYPTION_KEY_LEN} bytes, got {0}")]
    InvalidLength(usize),
}

/// HMAC signature key. Arbitrary-length secret bytes.
#[derive(Clone)]
pub struct SignatureKey(Vec<u8>);

impl SignatureKey {
    /// Build a signature key from a configured secret string.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::EmptySignatureKey`] if the string is empty.
    pub fn new(secret: &str) -> Result<Self, KeyError> {
        if secret.is_empty() {
            return Err(KeyError::EmptySignatureKey);
        }
        Ok(Self(secret.as_bytes().to_vec()))
    }

    /// Raw key bytes for HMAC construction.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl Drop for SignatureKey {
    fn drop(&mut self) {
        // Zero the key material on drop.
        self.0.iter_mut().for_each(|b| *b = 0);
    }
}

impl std::fmt::Debug for SignatureKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material — not even in debug builds.
        f.write_str("SignatureKey([REDACTED])")
    }
}

/// AES-256 encryption key. Fixed-size buffer holding exactly
/// [`ENCRYPTION_KEY_LEN`] bytes.
#[derive(Clone)]
pub struct EncryptionKey(Box<[u8; ENCRYPTION_KEY_LEN]>);

impl EncryptionKey {
    /// Parse a hex-encoded encryption key from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::InvalidHex`] if the string is not hex, or
    /// [`KeyError::InvalidLength`] if it decodes to anything other than
    /// [`ENCRYPTION_KEY_LEN`] bytes.
    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_str).map_err(|_| KeyError::InvalidHex)?;
        if bytes.len() != ENCRYPTION_KEY_LEN {
            return Err(KeyError::InvalidLength(bytes.len()));
        }
        let mut buf = Box::new([0u8; ENCRYPTION_KEY_LEN]);
        buf.copy_from_slice(&bytes);
        Ok(Self(buf))
    }

    /// Raw key bytes for cipher construction.
    pub fn as_bytes(&self) -> &[u8; ENCRYPTION_KEY_LEN] {
        &self.0
    }
}

impl Drop for EncryptionKey {
    fn drop(&mut self) {
        self.0.iter_mut().for_each(|b| *b = 0);
    }
}

impl std::fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("EncryptionKey([REDACTED])")
    }
}
