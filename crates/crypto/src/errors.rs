use thiserror::Error;

/// Crypto error
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to generate RSA keypair: {0}")]
    KeyGen(String),
    #[error("failed to sign message: {0}")]
    Signing(String),
    #[error("public key is malformed or not valid OpenSSH-encoded hex: {0}")]
    InvalidKey(String),
    #[error("signature verification failed")]
    InvalidSignature,
    #[error("token is malformed: {0}")]
    MalformedToken(String),
    #[error("token has expired")]
    Expired,
}
