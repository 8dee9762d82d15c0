use serde::Deserialize;

/// The object store's authorization request (spec §4.9). Mirrors the
/// shape an external policy decision point (e.g. MinIO) would send:
/// a nested `input` object rather than flat top-level fields.
#[derive(Debug, Deserialize)]
pub struct AuthorizationRequest {
    pub input: AuthorizationInput,
}

#[derive(Debug, Deserialize)]
pub struct AuthorizationInput {
    pub account: String,
    #[serde(default)]
    pub groups: Vec<String>,
    pub action: Vec<String>,
    pub bucket: String,
    #[serde(default)]
    pub conditions: Conditions,
    pub owner: String,
    pub claims: RequestClaims,
}

#[derive(Debug, Default, Deserialize)]
pub struct Conditions {
    #[serde(default)]
    pub policy: serde_json::Value,
}

/// The fields of the caller's JWT claims that authorization cares
/// about: `client_id` is the authenticated principal (spec §4.9);
/// `resources` is the resource set the token itself was scoped to at
/// issuance (spec §4.8), compared against identity statements.
#[derive(Debug, Deserialize)]
pub struct RequestClaims {
    pub client_id: String,
    #[serde(default)]
    pub resources: Vec<String>,
}

/// Flattened view of an authorization request used by the evaluator.
#[derive(Debug)]
pub struct UserData {
    pub account: String,
    pub groups: Vec<String>,
    pub action: Vec<String>,
    pub bucket: String,
    pub resources: Vec<String>,
    pub owner: String,
    pub client_id: String,
}

pub fn extract_user_data(req: &AuthorizationRequest) -> UserData {
    UserData {
        account: req.input.account.clone(),
        groups: req.input.groups.clone(),
        action: req.input.action.clone(),
        bucket: req.input.bucket.clone(),
        resources: req.input.claims.resources.clone(),
        owner: req.input.owner.clone(),
        client_id: req.input.claims.client_id.clone(),
    }
}
