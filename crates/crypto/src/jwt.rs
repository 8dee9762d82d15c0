use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rsa::pkcs1::{EncodeRsaPrivateKey, EncodeRsaPublicKey};
use rsa::{RsaPrivateKey, RsaPublicKey};
use serde::{Deserialize, Serialize};

use crate::errors::Error;
use crate::keypair::{public_key_from_openssh_hex, public_key_to_openssh_hex};

/// Session credential claims issued after a successful challenge
/// response (spec §4.8) and consumed by the authorization evaluator
/// (spec §4.9) via `claims.client_id`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Hex-encoded OpenSSH client public key that authenticated.
    pub sub: String,
    pub client_id: String,
    pub role: String,
    pub principal: Vec<String>,
    pub action: Vec<String>,
    pub resources: Vec<String>,
    pub resource_data: Vec<String>,
    pub iat: i64,
    pub exp: i64,
    /// Hex-encoded OpenSSH public key of the issuing node.
    pub iss: String,
}

/// Claim fields supplied by the caller; `iat`/`exp`/`iss` are filled in
/// by [`issue`].
#[derive(Clone, Debug)]
pub struct ClaimsInput {
    pub sub: String,
    pub client_id: String,
    pub role: String,
    pub principal: Vec<String>,
    pub action: Vec<String>,
    pub resources: Vec<String>,
    pub resource_data: Vec<String>,
}

fn encoding_key(private: &RsaPrivateKey) -> Result<EncodingKey, Error> {
    let der = private
        .to_pkcs1_der()
        .map_err(|e| Error::Signing(e.to_string()))?;
    Ok(EncodingKey::from_rsa_der(der.as_bytes()))
}

fn decoding_key(public: &RsaPublicKey) -> Result<DecodingKey, Error> {
    let der = public
        .to_pkcs1_der()
        .map_err(|e| Error::InvalidKey(e.to_string()))?;
    Ok(DecodingKey::from_rsa_der(der.as_bytes()))
}

/// Issue an RS256 JWT signed with the node's private key. `now` is
/// injected by the caller (Unix seconds) so issuance stays testable
/// without a wall-clock dependency inside this crate.
pub fn issue(
    claims: ClaimsInput,
    signing: &RsaPrivateKey,
    issuer_public: &RsaPublicKey,
    now: i64,
    exp_min: i64,
    exp_s: i64,
) -> Result<String, Error> {
    let iss = public_key_to_openssh_hex(issuer_public)?;
    let full = Claims {
        sub: claims.sub,
        client_id: claims.client_id,
        role: claims.role,
        principal: claims.principal,
        action: claims.action,
        resources: claims.resources,
        resource_data: claims.resource_data,
        iat: now,
        exp: now + exp_min * 60 + exp_s,
        iss,
    };
    let header = Header::new(Algorithm::RS256);
    encode(&header, &full, &encoding_key(signing)?).map_err(|e| Error::Signing(e.to_string()))
}

/// Verify a JWT against the public key embedded in its own `iss`
/// claim, per spec §4.1: the token is self-describing rather than
/// verified against a single pinned key, which is what lets
/// `/check-auth` ask a peer to verify a token issued by a third node.
pub fn verify(token: &str, now: i64) -> Result<Claims, Error> {
    // First pass: decode without verifying the signature to recover
    // the claimed issuer key.
    let mut insecure = Validation::new(Algorithm::RS256);
    insecure.insecure_disable_signature_validation();
    insecure.validate_exp = false;
    let unverified = decode::<Claims>(token, &DecodingKey::from_secret(&[]), &insecure)
        .map_err(|e| Error::MalformedToken(e.to_string()))?;

    let issuer_pk = public_key_from_openssh_hex(&unverified.claims.iss)?;
    let mut validation = Validation::new(Algorithm::RS256);
    validation.validate_exp = false;
    let verified = decode::<Claims>(token, &decoding_key(&issuer_pk)?, &validation)
        .map_err(|_| Error::InvalidSignature)?;

    if verified.claims.exp < now {
        return Err(Error::Expired);
    }
    Ok(verified.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keypair::Keypair;

    fn sample_claims() -> ClaimsInput {
        ClaimsInput {
            sub: "deadbeef".into(),
            client_id: "c1".into(),
            role: "user".into(),
            principal: vec!["u1".into()],
            action: vec!["s3:GetObject".into()],
            resources: vec!["b".into()],
            resource_data: vec![],
        }
    }

    #[test]
    fn issue_then_verify_round_trips() {
        let kp = Keypair::generate(2048).unwrap();
        let token = issue(sample_claims(), &kp.private, &kp.public, 1_000, 1, 0).unwrap();
        let claims = verify(&token, 1_050).unwrap();
        assert_eq!(claims.client_id, "c1");
        assert_eq!(claims.exp, 1_060);
    }

    #[test]
    fn verify_rejects_expired_token() {
        let kp = Keypair::generate(2048).unwrap();
        let token = issue(sample_claims(), &kp.private, &kp.public, 1_000, 0, 5).unwrap();
        let err = verify(&token, 2_000).unwrap_err();
        assert!(matches!(err, Error::Expired));
    }
}
