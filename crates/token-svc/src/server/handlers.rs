//! Axum request handlers for all service endpoints.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::protocol::{DecodeRequest, EncodeResponse, ErrorResponse, HealthResponse};
use common::TokenError;
use tracing::debug;

use super::state::AppState;

/// `POST /token/encode` — seal an arbitrary JSON payload into an opaque token.
///
/// The body is the payload itself, not a wrapper object. Responds with the
/// token/context pair minted for this call.
pub async fn encode(
    State(state): State<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> Response {
    match state.codec.encode(&payload) {
        Ok(sealed) => (
            StatusCode::OK,
            Json(EncodeResponse {
                token: sealed.token,
                context: sealed.context,
            }),
        )
            .into_response(),
        Err(e) => token_error_response(e),
    }
}

/// `POST /token/decode` — verify a token/context pair and return its payload.
///
/// All failures are reported as HTTP 400 with the error label in the body,
/// including signature failures (`Unauthorized` is 400 by wire contract).
pub async fn decode(State(state): State<AppState>, Json(req): Json<DecodeRequest>) -> Response {
    let token = req.token.unwrap_or_default();
    let context = req.context.unwrap_or_default();

    match state.codec.decode(&token, &context) {
        Ok(payload) => (StatusCode::OK, Json(payload)).into_response(),
        Err(e) => {
            // Log the error kind only; the inputs are attacker-influenced and
            // the payload may be sensitive.
            debug!(error = e.wire_label(), "token decode rejected");
            token_error_response(e)
        }
    }
}

/// `GET /health` — liveness check.
///
/// The codec is constructed before the server binds, so a serving process is
/// always ready.
pub async fn health() -> Response {
    let body = HealthResponse {
        status: "ok".into(),
    };
    (StatusCode::OK, Json(body)).into_response()
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new("NotFound")))
}

/// Map a [`TokenError`] to its wire status and body.
fn token_error_response(e: TokenError) -> Response {
    let status =
        StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::BAD_REQUEST);
    (status, Json(ErrorResponse::new(e.wire_label()))).into_response()
}
