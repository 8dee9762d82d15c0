use axum::body::Bytes;
use axum::extract::State;
use axum::response::IntoResponse;
use serde_json::json;

use crate::error::ApiError;
use crate::state::SharedState;

/// `POST /authZ` — evaluate an object-store authorization query
/// against the cached materialized view (spec §4.9).
pub async fn authorize(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let request: ac_authz::AuthorizationRequest =
        serde_json::from_slice(&body).map_err(|e| ApiError::SchemaInvalid(e.to_string()))?;
    let view = state.view.read();
    ac_authz::authorize(&view, &request)?;
    Ok((axum::http::StatusCode::OK, axum::Json(json!({ "result": { "allow": true } }))))
}
