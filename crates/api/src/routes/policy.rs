use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use chrono::Utc;

use crate::error::ApiError;
use crate::state::SharedState;

/// Pulls `(requester_id, requester_pk)` out of a bearer JWT when one is
/// present, falling back to an anonymous identity otherwise (spec §4.2
/// supplement: requester identity for `PAP_log` comes from the policy
/// submitter's JWT claims "when mining is triggered through the
/// authenticated HTTP surface" — policies submitted without a token
/// are still admitted, but attributed to no one in particular).
fn requester_identity(headers: &HeaderMap) -> (String, String) {
    let token = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    match token.and_then(|t| ac_crypto::jwt::verify(t, Utc::now().timestamp()).ok()) {
        Some(claims) => (claims.client_id, claims.sub),
        None => ("anonymous".to_string(), "unknown".to_string()),
    }
}

/// `POST /add-policy` — schema-validate, dedup into the mempool, and
/// gossip best-effort to peers (spec §4.4). The body is parsed
/// manually, rather than via axum's `Json` extractor, so malformed
/// bodies surface as `422 SchemaInvalid` instead of axum's default
/// 400 rejection.
pub async fn add_policy(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let policy: ac_policy::Policy = serde_json::from_slice(&body)
        .map_err(|e| ApiError::SchemaInvalid(e.to_string()))?;

    let (requester_id, requester_pk) = requester_identity(&headers);

    let peers = state.peers.read().clone();
    let accepted = {
        let mut chain = state.chain.write();
        chain.add_to_mempool(policy.clone(), &requester_id, &requester_pk)
    };
    if accepted {
        ac_gossip::broadcast_policy(&state.http_client, &peers, &policy).await;
    }

    Ok((axum::http::StatusCode::OK, "policy accepted"))
}
