use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("contract '{0}' not found in block's contract header")]
    ContractNotFound(String),
    #[error("contract name '{0}' already present in this block's contract header")]
    DuplicateContractName(String),
    #[error("contract address mismatch: expected {expected}, got {actual}")]
    ContractAddressMismatch { expected: String, actual: String },
}
