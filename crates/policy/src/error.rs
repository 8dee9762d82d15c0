use thiserror::Error;

/// Schema-level validation failures for policy bodies, surfaced by the
/// HTTP layer as `422`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("policy body failed schema validation: {0}")]
    SchemaInvalid(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::SchemaInvalid(e.to_string())
    }
}
