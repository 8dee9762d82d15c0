//! Cryptographic primitives for ledger nodes: RSA keypairs, PSS
//! signing/verification, SHA-256 hashing, nonce generation, and RS256
//! JWT issuance/verification.

pub mod errors;
pub mod hashing;
pub mod jwt;
pub mod keypair;
pub mod nonce;

pub use errors::Error;
pub use hashing::sha256_hex;
pub use keypair::{
    public_key_from_openssh_hex, public_key_to_openssh_hex, sign, verify, Keypair,
};
pub use nonce::random_hex;

mod canonical;
pub use canonical::canonical_json_bytes;
