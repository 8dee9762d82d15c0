//! Content-addressed smart-contract store.
//!
//! Bytecode is opaque from the chain's point of view: it is addressed by
//! its own SHA-256 hash and resolved at invocation time against a fixed
//! table of registered callables (spec §9's reading of the source
//! prototype's `marshal`-based bytecode sandbox, which has no safe Rust
//! analogue).

mod builtins;
mod errors;
mod store;

pub use builtins::{registry, ContractContext, ContractFn};
pub use errors::Error;
pub use store::{address, encode, invoke, lookup};
