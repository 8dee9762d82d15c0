use ac_block::{pow_digest, Block, BlockBody, BlockHeader};
use ac_contracts::ContractContext;
use ac_crypto::sha256_hex;
use ac_materializer::MaterializedView;
use ac_policy::Policy;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::Error;
use crate::genesis;

/// Wire shape for `GET /` and for what peers exchange during consensus
/// (spec §4.7, §6): the full block list plus the difficulty it was
/// mined under.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChainSnapshot {
    pub chain: Vec<Block>,
    pub difficulty: usize,
}

/// A policy awaiting mining, tagged with the identity that submitted it
/// (spec §4.4) so `PAP_log` can attribute the eventual ledger event to
/// whoever actually called `/add-policy`, not whoever triggers `/mine`.
#[derive(Clone, Debug, PartialEq)]
pub struct MempoolEntry {
    pub policy: Policy,
    pub requester_id: String,
    pub requester_pk: String,
}

/// Ordered sequence of blocks plus the mempool of policies awaiting
/// mining. `chain[0]` is always genesis.
pub struct Chain {
    pub difficulty: usize,
    blocks: Vec<Block>,
    pub mempool: Vec<MempoolEntry>,
}

impl Chain {
    pub fn new(difficulty: usize) -> Self {
        let genesis = genesis::build(difficulty, Utc::now());
        Chain {
            difficulty,
            blocks: vec![genesis],
            mempool: Vec::new(),
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn last_block(&self) -> &Block {
        self.blocks.last().expect("chain always has a genesis block")
    }

    pub fn materialized_view(&self) -> MaterializedView {
        MaterializedView::from_chain(&self.blocks)
    }

    pub fn snapshot(&self) -> ChainSnapshot {
        ChainSnapshot {
            chain: self.blocks.clone(),
            difficulty: self.difficulty,
        }
    }

    /// Add a policy to the mempool, deduplicated by exact policy
    /// equality (spec §4.4). Returns `false` if the policy is already
    /// pending.
    pub fn add_to_mempool(&mut self, policy: Policy, requester_id: &str, requester_pk: &str) -> bool {
        if self.mempool.iter().any(|e| e.policy == policy) {
            return false;
        }
        self.mempool.push(MempoolEntry {
            policy,
            requester_id: requester_id.to_string(),
            requester_pk: requester_pk.to_string(),
        });
        true
    }

    /// Mine a new block from the current mempool (spec §4.5). Each
    /// pending policy is applied under the identity that submitted it.
    pub fn mine(&mut self) -> Result<&Block, Error> {
        if self.mempool.is_empty() {
            return Err(Error::NoTransactions);
        }
        let head = self.last_block();
        let mac_bytecode = ac_contracts::lookup(head, "MAC")?.to_vec();

        let mut candidate = Block::new(
            BlockHeader {
                index: head.index() + 1,
                timestamp: Utc::now(),
                previous_hash: head.hash(),
                proof: 0,
            },
            BlockBody {
                contract_header: head.body.contract_header.clone(),
                events: head.body.events.clone(),
                ..Default::default()
            },
        );

        let head_proof = head.proof();
        for entry in self.mempool.drain(..).collect::<Vec<_>>() {
            let ctx = ContractContext {
                policy: entry.policy,
                requester_id: entry.requester_id,
                requester_pk: entry.requester_pk,
            };
            ac_contracts::invoke(&mac_bytecode, &ctx, &mut candidate)
                .map_err(|e| Error::InvalidChain(format!("contract error: {e}")))?;
        }

        genesis::mine_proof(&mut candidate, head_proof, self.difficulty);
        self.blocks.push(candidate);
        Ok(self.last_block())
    }

    /// `is_block_valid` (spec §4.6): checks index continuity, hash
    /// chaining, the PoW digest against `difficulty`, and the new
    /// block's contract-header invariants (spec §3, invariant 4).
    pub fn is_block_valid(last: &Block, new: &Block, difficulty: usize) -> Result<(), Error> {
        if new.index() != last.index() + 1 {
            return Err(Error::IndexMismatch {
                expected: last.index() + 1,
                actual: new.index(),
            });
        }
        if last.hash() != new.header.previous_hash {
            return Err(Error::InvalidChain("hash mismatch".to_string()));
        }
        let digest = pow_digest(last.proof(), new.proof(), new.index(), &new.body);
        if !sha256_hex(&digest).starts_with(&"0".repeat(difficulty)) {
            return Err(Error::InvalidChain("difficulty".to_string()));
        }
        Self::check_contract_header(new)?;
        Ok(())
    }

    /// Invariant 4 (spec §3): `contract_name` is unique within a block's
    /// contract header, and each row's `contract_address` is the SHA-256
    /// of its own `contract_bytecode`.
    fn check_contract_header(block: &Block) -> Result<(), ac_block::Error> {
        let mut seen = std::collections::HashSet::new();
        for row in &block.body.contract_header {
            if !seen.insert(row.contract_name.as_str()) {
                return Err(ac_block::Error::DuplicateContractName(row.contract_name.clone()));
            }
            let expected = ac_contracts::address(&row.contract_bytecode);
            if expected != row.contract_address {
                return Err(ac_block::Error::ContractAddressMismatch {
                    expected,
                    actual: row.contract_address.clone(),
                });
            }
        }
        Ok(())
    }

    /// Replays invariants 1–4 over the whole chain (spec §4.6, fixing
    /// the source prototype's stubbed `is_chain_valid`).
    pub fn is_valid(&self) -> Result<(), Error> {
        Self::check_contract_header(&self.blocks[0])?;
        for window in self.blocks.windows(2) {
            Self::is_block_valid(&window[0], &window[1], self.difficulty)?;
        }
        Ok(())
    }

    /// Validate then append a single block (spec §4.6). Leaves the
    /// chain unchanged on failure and returns the rejecting error.
    pub fn add_block(&mut self, new_block: Block) -> Result<(), Error> {
        Self::is_block_valid(self.last_block(), &new_block, self.difficulty)?;
        self.blocks.push(new_block);
        Ok(())
    }

    /// Parses and schema-validates `blocks`, verifies block 0 stands
    /// alone, and walks `is_block_valid` across the rest. On success
    /// atomically swaps the internal chain; on failure leaves state
    /// untouched.
    pub fn create_blockchain_from_request(&mut self, blocks: Vec<Block>) -> bool {
        if blocks.is_empty() {
            return false;
        }
        if Self::check_contract_header(&blocks[0]).is_err() {
            return false;
        }
        for window in blocks.windows(2) {
            if Self::is_block_valid(&window[0], &window[1], self.difficulty).is_err() {
                return false;
            }
        }
        self.blocks = blocks;
        true
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genesis_chain_is_valid() {
        let chain = Chain::new(1);
        assert!(chain.is_valid().is_ok());
    }

    #[test]
    fn mine_fails_with_empty_mempool() {
        let mut chain = Chain::new(1);
        assert!(matches!(chain.mine(), Err(Error::NoTransactions)));
    }

    #[test]
    fn mine_appends_block_and_clears_mempool() {
        let mut chain = Chain::new(1);
        let mut statements = indexmap::IndexMap::new();
        statements.insert(
            "s1".to_string(),
            ac_policy::IdentityStatement {
                version: "v1".into(),
                sid: "s1".into(),
                effect: ac_policy::Effect::Allow,
                action: ac_policy::StringOrList(vec!["s3:GetObject".into()]),
                resource: ac_policy::StringOrList(vec!["b".into()]),
                condition: Default::default(),
            },
        );
        chain.add_to_mempool(
            Policy::Identity {
                principal_id: "u1".into(),
                policy: ac_policy::IdentityPolicy {
                    id: "P1".into(),
                    action: ac_policy::PolicyAction::Add,
                    statements,
                },
            },
            "u1",
            "pk",
        );
        let before = chain.len();
        chain.mine().unwrap();
        assert_eq!(chain.len(), before + 1);
        assert!(chain.mempool.is_empty());
        assert!(chain.is_valid().is_ok());
    }

    #[test]
    fn duplicate_contract_name_is_rejected() {
        let chain = Chain::new(1);
        let mut block = chain.last_block().clone();
        let row = block.body.contract_header[0].clone();
        block.body.contract_header.push(row);
        assert!(Chain::check_contract_header(&block).is_err());
    }

    #[test]
    fn tampered_contract_address_is_rejected() {
        let chain = Chain::new(1);
        let mut block = chain.last_block().clone();
        block.body.contract_header[0].contract_address = "deadbeef".to_string();
        assert!(matches!(
            Chain::check_contract_header(&block),
            Err(ac_block::Error::ContractAddressMismatch { .. })
        ));
    }

    #[test]
    fn mempool_dedups_by_exact_equality() {
        let mut chain = Chain::new(1);
        let policy = Policy::Resource(ac_policy::ResourcePolicy {
            id: "P1".into(),
            action: ac_policy::PolicyAction::Add,
            statements: Default::default(),
        });
        assert!(chain.add_to_mempool(policy.clone(), "u1", "pk"));
        assert!(!chain.add_to_mempool(policy, "u1", "pk"));
        assert_eq!(chain.mempool.len(), 1);
    }
}
