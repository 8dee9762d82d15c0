use ac_block::Block;
use ac_crypto::sha256_hex;
use serde::{Deserialize, Serialize};

use crate::builtins::{registry, ContractContext};
use crate::errors::Error;

/// The descriptor a contract's bytecode actually holds: a pointer into
/// the registered callable table (spec §9's "registered callable table"
/// reading of an opaque sandbox). This is the "host-provided encoding"
/// spec §4.2 leaves implementation-defined.
#[derive(Serialize, Deserialize)]
struct Descriptor {
    builtin: String,
}

/// Encode a builtin contract name into its bytecode representation.
pub fn encode(builtin_name: &str) -> Vec<u8> {
    serde_json::to_vec(&Descriptor {
        builtin: builtin_name.to_string(),
    })
    .expect("Descriptor always serializes")
}

/// `address(bytes) = sha256_hex(bytes)`.
pub fn address(bytecode: &[u8]) -> String {
    sha256_hex(bytecode)
}

/// Find a contract's bytecode by name in a block's own contract header.
pub fn lookup<'a>(block: &'a Block, name: &str) -> Result<&'a [u8], Error> {
    Ok(block.find_contract(name)?)
}

/// Invoke a contract's bytecode against a pending transaction and the
/// candidate block under construction. Contracts are deterministic:
/// nondeterminism here would break proof-of-work agreement across nodes
/// (spec §9).
pub fn invoke(
    bytecode: &[u8],
    ctx: &ContractContext,
    block: &mut Block,
) -> Result<(), Error> {
    let descriptor: Descriptor = serde_json::from_slice(bytecode)
        .map_err(|e| Error::MalformedBytecode(e.to_string()))?;
    let contracts = registry();
    let contract_fn = contracts
        .get(descriptor.builtin.as_str())
        .ok_or_else(|| Error::ContractNotFound(descriptor.builtin.clone()))?;
    contract_fn(ctx, block)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_is_deterministic() {
        let bytecode = encode("MAC");
        assert_eq!(address(&bytecode), address(&bytecode));
    }

    #[test]
    fn different_names_address_differently() {
        assert_ne!(address(&encode("MAC")), address(&encode("PAP_log")));
    }
}
