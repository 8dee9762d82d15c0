//! Challenge-response authentication (spec §4.8): a nonce challenge
//! keyed by client public key, verified against a PSS-SHA256 signature,
//! redeemed for an RS256 JWT.

mod challenge;
mod errors;
mod nonce_store;

pub use challenge::{
    check_auth, issue_challenge, respond_to_challenge, ChallengeRequest, ChallengeResponse,
    SignedRequest, DOMAIN,
};
pub use errors::Error;
pub use nonce_store::NonceStore;

#[cfg(test)]
mod tests {
    use super::*;
    use ac_crypto::Keypair;
    use serde_json::json;

    #[test]
    fn challenge_then_response_issues_token() {
        let store = NonceStore::new();
        let node = Keypair::generate(2048).unwrap();
        let client = Keypair::generate(2048).unwrap();
        let client_pk_hex = client.public_openssh_hex().unwrap();

        let challenge_req = ChallengeRequest {
            client_pk: client_pk_hex.clone(),
            client_id: "c1".into(),
            client_name: "alice".into(),
        };
        let resp = issue_challenge(&store, &challenge_req, 10, 1, 0, 1_000);

        let message = json!({ "nonce": resp.nonce });
        let message_bytes = ac_crypto::canonical_json_bytes(&message).unwrap();
        let signature = ac_crypto::sign(&client.private, &message_bytes).unwrap();

        let signed = SignedRequest {
            message,
            client_pk: client_pk_hex,
            signature: hex::encode(signature),
            client_id: "c1".into(),
            principal: vec!["u1".into()],
            action: vec!["s3:GetObject".into()],
            resources: vec!["bucket/*".into()],
            resource_data: vec![],
        };

        let token =
            respond_to_challenge(&store, &signed, &node.private, &node.public, 1, 0, 1_000)
                .unwrap();
        let claims = ac_crypto::jwt::verify(&token, 1_000).unwrap();
        assert_eq!(claims.client_id, "c1");
    }

    #[test]
    fn response_without_challenge_is_rejected() {
        let store = NonceStore::new();
        let node = Keypair::generate(2048).unwrap();
        let client = Keypair::generate(2048).unwrap();
        let signed = SignedRequest {
            message: json!({ "nonce": "deadbeef" }),
            client_pk: client.public_openssh_hex().unwrap(),
            signature: String::new(),
            client_id: "c1".into(),
            principal: vec![],
            action: vec![],
            resources: vec![],
            resource_data: vec![],
        };
        let err = respond_to_challenge(&store, &signed, &node.private, &node.public, 1, 0, 1_000)
            .unwrap_err();
        assert!(matches!(err, Error::NoChallenge));
    }
}
