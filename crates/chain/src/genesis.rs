use ac_block::{Block, BlockBody, BlockHeader, ContractHeaderRow};
use ac_crypto::sha256_hex;
use chrono::{DateTime, Utc};

/// The builtin contracts every genesis block ships with, mirroring the
/// source prototype's `onstartup_contracts` module. `contract_bytecode`
/// is produced by `ac_contracts::encode`, so the contract header entries
/// resolve through the same registered-callable table `ac_contracts`
/// looks contracts up in.
const BUILTINS: &[(&str, &str)] = &[
    (
        "MAC",
        "Master access contract: the entry point invoked once per pending policy during mining",
    ),
    (
        "PAP_log",
        "Records requests onto the events header, tracking what happened during mining",
    ),
    ("PAP_attach_policy", ""),
    ("PAP_detach_policy", ""),
];

fn contract_header_rows(timestamp: DateTime<Utc>) -> Vec<ContractHeaderRow> {
    BUILTINS
        .iter()
        .map(|(name, description)| {
            let bytecode = ac_contracts::encode(name);
            ContractHeaderRow {
                timestamp,
                contract_name: name.to_string(),
                contract_address: ac_contracts::address(&bytecode),
                contract_description: description.to_string(),
                contract_bytecode: bytecode,
            }
        })
        .collect()
}

/// Build and mine the genesis block: index 0, `previous_hash = "0"`,
/// seeded with the builtin contract table.
pub fn build(difficulty: usize, timestamp: DateTime<Utc>) -> Block {
    let body = BlockBody {
        contract_header: contract_header_rows(timestamp),
        ..Default::default()
    };
    let mut block = Block::new(BlockHeader::genesis(timestamp), body);
    mine_proof(&mut block, 0, difficulty);
    block
}

/// Shared by genesis construction and regular mining: increments
/// `block.header.proof` until the PoW hash has `difficulty` leading
/// zero hex characters.
pub(crate) fn mine_proof(block: &mut Block, previous_proof: u64, difficulty: usize) {
    let index = block.index();
    loop {
        let digest = ac_block::pow_digest(previous_proof, block.header.proof, index, &block.body);
        if sha256_hex(&digest).starts_with(&"0".repeat(difficulty)) {
            return;
        }
        block.header.proof += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genesis_seeds_all_builtin_contracts() {
        let block = build(1, Utc::now());
        for (name, _) in BUILTINS {
            assert!(block.find_contract(name).is_ok(), "missing {name}");
        }
    }

    #[test]
    fn genesis_proof_satisfies_difficulty() {
        let block = build(1, Utc::now());
        let digest = ac_block::pow_digest(0, block.proof(), 0, &block.body);
        assert!(sha256_hex(&digest).starts_with('0'));
    }
}
