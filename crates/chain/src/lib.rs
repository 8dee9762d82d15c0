//! Chain storage: genesis construction, mining, and validation/admission
//! (spec §4.5, §4.6).

mod chain;
mod errors;
mod genesis;

pub use chain::{Chain, ChainSnapshot, MempoolEntry};
pub use errors::Error;
pub use genesis::build as build_genesis;
