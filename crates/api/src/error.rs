use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Maps every domain crate's error type onto the HTTP status classes of
/// spec §7: `SchemaInvalid` -> 422; chain/mining errors -> 400;
/// authentication failures -> 403 (malformed hex -> 400); authorization
/// denials -> 403 with a reason.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    SchemaInvalid(String),
    #[error(transparent)]
    Chain(#[from] ac_chain::Error),
    #[error(transparent)]
    Auth(#[from] ac_auth::Error),
    #[error(transparent)]
    Authz(#[from] ac_authz::Error),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Conflict(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::SchemaInvalid(msg) => (StatusCode::UNPROCESSABLE_ENTITY, json!({ "error": msg })),
            ApiError::Chain(e) => (StatusCode::BAD_REQUEST, json!({ "error": e.to_string() })),
            ApiError::Auth(e) => {
                let status = match e {
                    ac_auth::Error::MalformedHex(_) => StatusCode::BAD_REQUEST,
                    _ => StatusCode::FORBIDDEN,
                };
                (status, json!({ "error": e.to_string() }))
            }
            ApiError::Authz(e) => (StatusCode::FORBIDDEN, json!({ "reason": e.to_string() })),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            ApiError::Conflict(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
        };
        (status, Json(body)).into_response()
    }
}
