//! Block structure: header, body, tabular contract/event rows, and
//! canonical hashing shared by mining, validation, and signing.

pub mod block;
pub mod body;
pub mod canonical;
pub mod errors;
pub mod header;

pub use block::Block;
pub use body::{BlockBody, ContractHeaderRow, EventRow};
pub use canonical::{canonical_bytes_body, canonical_bytes_header, pow_digest};
pub use errors::Error;
pub use header::BlockHeader;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn genesis_previous_hash_is_zero() {
        let header = BlockHeader::genesis(Utc::now());
        assert_eq!(header.previous_hash, "0");
        assert_eq!(header.index, 0);
    }

    #[test]
    fn find_contract_missing_errors() {
        let block = Block::new(BlockHeader::genesis(Utc::now()), BlockBody::default());
        assert!(matches!(
            block.find_contract("MAC"),
            Err(Error::ContractNotFound(_))
        ));
    }

    #[test]
    fn block_hash_changes_when_body_changes() {
        let header = BlockHeader::genesis(Utc::now());
        let b1 = Block::new(header.clone(), BlockBody::default());
        let mut body2 = BlockBody::default();
        body2.events.push(crate::body::EventRow {
            timestamp: Utc::now(),
            requester_id: "r".into(),
            requester_pk: "pk".into(),
            transaction_type: "add".into(),
        });
        let b2 = Block::new(header, body2);
        assert_ne!(b1.hash(), b2.hash());
    }
}
