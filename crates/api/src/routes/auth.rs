use axum::body::Bytes;
use axum::extract::State;
use axum::response::IntoResponse;
use chrono::Utc;
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::SharedState;

/// `/auth` accepts either half of the challenge-response handshake in
/// the same body shape (spec §6); the two request types don't share a
/// discriminant field, so the body is tried as a `SignedRequest` first
/// (it is the strictly larger shape) and falls back to
/// `ChallengeRequest`.
#[derive(Deserialize)]
#[serde(untagged)]
enum AuthRequest {
    Signed(ac_auth::SignedRequest),
    Challenge(ac_auth::ChallengeRequest),
}

/// `POST /auth` — issues a nonce challenge or, given a signed nonce,
/// redeems it for a session JWT (spec §4.8).
pub async fn auth(State(state): State<SharedState>, body: Bytes) -> Result<impl IntoResponse, ApiError> {
    let request: AuthRequest =
        serde_json::from_slice(&body).map_err(|e| ApiError::SchemaInvalid(e.to_string()))?;
    let now = Utc::now().timestamp();

    match request {
        AuthRequest::Challenge(req) => {
            let resp = ac_auth::issue_challenge(
                &state.nonce_store,
                &req,
                state.nonce_size,
                state.nonce_exp_min,
                state.nonce_exp_s,
                now,
            );
            Ok((axum::http::StatusCode::OK, axum::Json(resp)).into_response())
        }
        AuthRequest::Signed(req) => {
            let token = ac_auth::respond_to_challenge(
                &state.nonce_store,
                &req,
                &state.node_private_key,
                &state.node_public_key,
                state.nonce_exp_min,
                state.nonce_exp_s,
                now,
            )?;
            Ok((axum::http::StatusCode::CREATED, token).into_response())
        }
    }
}

#[derive(Deserialize)]
pub struct CheckAuthRequest {
    pub token: String,
}

/// `POST /check-auth` — verify a token locally, falling back to peers.
pub async fn check_auth(
    State(state): State<SharedState>,
    axum::Json(req): axum::Json<CheckAuthRequest>,
) -> impl IntoResponse {
    let peers = state.peers.read().clone();
    let now = Utc::now().timestamp();
    let result = ac_auth::check_auth(&state.http_client, &peers, &req.token, now).await;
    axum::Json(serde_json::json!({ "result": result }))
}
