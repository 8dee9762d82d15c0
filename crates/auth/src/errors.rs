use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no challenge has been issued for this client")]
    NoChallenge,
    #[error("Invalid or expired nonce!")]
    InvalidOrExpiredNonce,
    #[error("signature or public key must be passed as valid hex")]
    MalformedHex(String),
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token is invalid: {0}")]
    InvalidToken(String),
}

impl From<ac_crypto::errors::Error> for Error {
    fn from(e: ac_crypto::errors::Error) -> Self {
        use ac_crypto::errors::Error as CryptoError;
        match e {
            CryptoError::InvalidSignature => Error::InvalidSignature,
            CryptoError::InvalidKey(msg) => Error::MalformedHex(msg),
            CryptoError::Expired => Error::InvalidToken("token has expired".to_string()),
            other => Error::InvalidToken(other.to_string()),
        }
    }
}
