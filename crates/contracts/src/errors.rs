use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("contract '{0}' not found")]
    ContractNotFound(String),
    #[error("contract bytecode is not a valid descriptor: {0}")]
    MalformedBytecode(String),
    #[error("contract execution failed: {0}")]
    ContractError(String),
}

impl From<ac_block::Error> for Error {
    fn from(e: ac_block::Error) -> Self {
        match e {
            ac_block::Error::ContractNotFound(name) => Error::ContractNotFound(name),
            other => Error::ContractError(other.to_string()),
        }
    }
}
