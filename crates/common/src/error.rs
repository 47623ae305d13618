//! The token codec error taxonomy, shared between the codec and the HTTP layer.

use thiserror::Error;

/// Failure kinds produced by the token codec.
///
/// Every attacker-reachable failure inside the codec collapses to one of these
/// variants before crossing the codec boundary; no unstructured error escapes.
/// The structural causes behind [`TokenError::InvalidParams`] (bad base64, bad
/// hex, cipher/padding failure, JSON parse failure) are deliberately not
/// distinguished on the wire, so a caller probing with corrupted ciphertext
/// learns nothing about which decode stage rejected it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    /// A required decode parameter (`token` or `context`) is absent or empty.
    #[error("missing token or context parameter")]
    MissingParams,

    /// The token or context is structurally invalid at some decode stage.
    #[error("invalid token or context parameter")]
    InvalidParams,

    /// The token decrypted cleanly but its signature does not verify.
    ///
    /// Indicates tampering or a token issued under a different signature key,
    /// as opposed to a caller-side formatting mistake.
    #[error("token signature verification failed")]
    Unauthorized,

    /// The payload could not be serialised to JSON (encode path only).
    #[error("payload is not JSON-serialisable")]
    SerializationError,
}

impl TokenError {
    /// The exact machine-readable label sent in the `error` response field.
    pub fn wire_label(&self) -> &'static str {
        match self {
            TokenError::MissingParams => "MissingParams",
            TokenError::InvalidParams => "InvalidParams",
            TokenError::Unauthorized => "Unauthorized",
            TokenError::SerializationError => "SerializationError",
        }
    }

    /// The HTTP status code sent for this error.
    ///
    /// All variants map to 400 — including [`TokenError::Unauthorized`], which
    /// existing clients expect as a 400 despite the label. Do not change this
    /// to 401.
    pub fn http_status(&self) -> u16 {
        400
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_labels_are_exact() {
        assert_eq!(TokenError::MissingParams.wire_label(), "MissingParams");
        assert_eq!(TokenError::InvalidParams.wire_label(), "InvalidParams");
        assert_eq!(TokenError::Unauthorized.wire_label(), "Unauthorized");
        assert_eq!(
            TokenError::SerializationError.wire_label(),
            "SerializationError"
        );
    }

    #[test]
    fn all_variants_are_client_errors() {
        // Unauthorized included: the wire contract pins it to 400, not 401.
        for e in [
            TokenError::MissingParams,
            TokenError::InvalidParams,
            TokenError::Unauthorized,
            TokenError::SerializationError,
        ] {
            assert_eq!(e.http_status(), 400);
        }
    }

    #[test]
    fn display_does_not_leak_stage_detail() {
        let msg = TokenError::InvalidParams.to_string();
        assert!(!msg.contains("base64"));
        assert!(!msg.contains("padding"));
    }
}
