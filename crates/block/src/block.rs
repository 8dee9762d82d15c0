use serde::{Deserialize, Serialize};

use ac_crypto::sha256_hex;

use crate::body::BlockBody;
use crate::canonical::{canonical_bytes_body, canonical_bytes_header};
use crate::errors::Error;
use crate::header::BlockHeader;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub header: BlockHeader,
    pub body: BlockBody,
}

impl Block {
    pub fn new(header: BlockHeader, body: BlockBody) -> Self {
        Block { header, body }
    }

    pub fn index(&self) -> u64 {
        self.header.index
    }

    pub fn proof(&self) -> u64 {
        self.header.proof
    }

    /// `H(block)` in spec invariant 1: the whole-block hash used for
    /// `previous_hash` chaining, distinct from the proof-of-work digest
    /// (which only ever hashes the body).
    pub fn hash(&self) -> String {
        let mut bytes = canonical_bytes_header(&self.header);
        bytes.extend(canonical_bytes_body(&self.body));
        sha256_hex(&bytes)
    }

    /// Search this block's own contract header (not the full chain) for
    /// a contract by name.
    pub fn find_contract(&self, name: &str) -> Result<&[u8], Error> {
        self.body
            .contract_header
            .iter()
            .find(|row| row.contract_name == name)
            .map(|row| row.contract_bytecode.as_slice())
            .ok_or_else(|| Error::ContractNotFound(name.to_string()))
    }
}
