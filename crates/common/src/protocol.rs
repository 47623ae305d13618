//! Request and response types for the token endpoints.
//!
//! Field names here are a wire contract: tokens and contexts issued by earlier
//! deployments must keep decoding, so none of these names may change.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Encode endpoint
// ---------------------------------------------------------------------------

/// Successful response body for `POST /token/encode`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodeResponse {
    /// Base64 ciphertext. Opaque to callers.
    pub token: String,
    /// Hex-encoded IV. Not secret, but required to decode this exact token.
    pub context: String,
}

// ---------------------------------------------------------------------------
// Decode endpoint
// ---------------------------------------------------------------------------

/// Request body for `POST /token/decode`.
///
/// Both fields are optional at the deserialisation layer so that an absent
/// field reaches the handler and is reported as `MissingParams`, rather than
/// being rejected by the JSON extractor with a different body shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecodeRequest {
    /// Base64 ciphertext produced by a previous encode call.
    #[serde(default)]
    pub token: Option<String>,
    /// Hex IV produced by the same encode call.
    #[serde(default)]
    pub context: Option<String>,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Error body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error label, e.g. `"InvalidParams"`.
    pub error: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from an error label.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status, `"ok"` once the codec is constructed.
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_request_tolerates_missing_fields() {
        let req: DecodeRequest = serde_json::from_str("{}").unwrap();
        assert!(req.token.is_none());
        assert!(req.context.is_none());

        let req: DecodeRequest = serde_json::from_str(r#"{"token":"abc"}"#).unwrap();
        assert_eq!(req.token.as_deref(), Some("abc"));
        assert!(req.context.is_none());
    }

    #[test]
    fn encode_response_field_names() {
        let resp = EncodeResponse {
            token: "dG9rZW4=".into(),
            context: "00112233445566778899aabbccddeeff".into(),
        };
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&resp).unwrap()).unwrap();
        assert!(json.get("token").is_some());
        assert!(json.get("context").is_some());
    }

    #[test]
    fn error_response_shape() {
        let e = ErrorResponse::new("Unauthorized");
        let json = serde_json::to_string(&e).unwrap();
        assert_eq!(json, r#"{"error":"Unauthorized"}"#);
    }
}
