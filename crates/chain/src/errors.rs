use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no unconfirmed policies to mine")]
    NoTransactions,
    #[error("contract '{0}' not found")]
    ContractNotFound(String),
    #[error("invalid chain: {0}")]
    InvalidChain(String),
    #[error("expected index {expected}, got {actual}")]
    IndexMismatch { expected: u64, actual: u64 },
}

impl From<ac_contracts::Error> for Error {
    fn from(e: ac_contracts::Error) -> Self {
        match e {
            ac_contracts::Error::ContractNotFound(name) => Error::ContractNotFound(name),
            other => Error::InvalidChain(other.to_string()),
        }
    }
}

impl From<ac_block::Error> for Error {
    fn from(e: ac_block::Error) -> Self {
        Error::InvalidChain(e.to_string())
    }
}
