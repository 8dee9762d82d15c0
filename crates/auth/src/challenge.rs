use ac_crypto::jwt::ClaimsInput;
use rsa::{RsaPrivateKey, RsaPublicKey};
use serde::{Deserialize, Serialize};

use crate::errors::Error;
use crate::nonce_store::{Lookup, NonceStore};

pub const DOMAIN: &str = "Sign In to access MinIO resources";

#[derive(Debug, Deserialize)]
pub struct ChallengeRequest {
    pub client_pk: String,
    pub client_id: String,
    pub client_name: String,
}

#[derive(Debug, Serialize)]
pub struct ChallengeResponse {
    pub nonce: String,
    pub domain: String,
    pub expire: i64,
}

/// Idle → Challenged: store a fresh nonce for `client_pk` and return the
/// challenge (spec §4.8).
pub fn issue_challenge(
    store: &NonceStore,
    req: &ChallengeRequest,
    nonce_size: usize,
    exp_min: i64,
    exp_s: i64,
    now: i64,
) -> ChallengeResponse {
    let nonce = ac_crypto::random_hex(nonce_size);
    let expire = now + exp_min * 60 + exp_s;
    store.issue(&req.client_pk, nonce.clone(), expire);
    ChallengeResponse {
        nonce,
        domain: DOMAIN.to_string(),
        expire,
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SignedRequest {
    pub message: serde_json::Value,
    pub client_pk: String,
    pub signature: String,
    pub client_id: String,
    pub principal: Vec<String>,
    pub action: Vec<String>,
    pub resources: Vec<String>,
    pub resource_data: Vec<String>,
}

/// Challenged → issue JWT: validates the stored nonce, verifies the
/// client's signature over the canonicalized `message`, then mints an
/// access token carrying the caller's claimed principal/action/resource
/// set (spec §4.8).
#[allow(clippy::too_many_arguments)]
pub fn respond_to_challenge(
    store: &NonceStore,
    req: &SignedRequest,
    node_private_key: &RsaPrivateKey,
    node_public_key: &RsaPublicKey,
    exp_min: i64,
    exp_s: i64,
    now: i64,
) -> Result<String, Error> {
    match store.lookup(&req.client_pk, now) {
        Lookup::Missing => return Err(Error::NoChallenge),
        Lookup::Expired => return Err(Error::InvalidOrExpiredNonce),
        Lookup::Valid(nonce) => {
            let claimed_nonce = req.message.get("nonce").and_then(|v| v.as_str());
            if claimed_nonce != Some(nonce.as_str()) {
                return Err(Error::InvalidOrExpiredNonce);
            }
        }
    }

    let message_bytes = ac_crypto::canonical_json_bytes(&req.message)
        .map_err(|e| Error::MalformedHex(e.to_string()))?;
    let signature = hex::decode(&req.signature).map_err(|e| Error::MalformedHex(e.to_string()))?;
    let client_pk = ac_crypto::public_key_from_openssh_hex(&req.client_pk)?;
    ac_crypto::verify(&client_pk, &message_bytes, &signature)?;

    store.remove(&req.client_pk);

    let claims = ClaimsInput {
        sub: req.client_pk.clone(),
        client_id: req.client_id.clone(),
        role: "user".to_string(),
        principal: req.principal.clone(),
        action: req.action.clone(),
        resources: req.resources.clone(),
        resource_data: req.resource_data.clone(),
    };
    ac_crypto::jwt::issue(claims, node_private_key, node_public_key, now, exp_min, exp_s)
        .map_err(Error::from)
}

/// Verify a JWT locally; on failure, ask peers via their `/check-auth`
/// endpoint and trust the first one that confirms it (spec §4.8).
pub async fn check_auth(client: &reqwest::Client, peers: &[String], token: &str, now: i64) -> bool {
    if ac_crypto::jwt::verify(token, now).is_ok() {
        return true;
    }
    for peer in peers {
        let url = format!("http://{peer}/check-auth");
        let resp = client
            .post(&url)
            .json(&serde_json::json!({ "token": token }))
            .send()
            .await;
        match resp {
            Ok(resp) if resp.status().is_success() => {
                if let Ok(body) = resp.json::<serde_json::Value>().await {
                    if body.get("result").and_then(|v| v.as_bool()) == Some(true) {
                        return true;
                    }
                }
            }
            Ok(resp) => {
                tracing::warn!(peer, status = %resp.status(), "peer rejected check-auth request");
            }
            Err(err) => {
                tracing::warn!(peer, error = %err, "could not reach peer for check-auth");
            }
        }
    }
    false
}
