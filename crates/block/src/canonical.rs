//! Canonical serialization used only for hashing and signing (spec §6).
//! Mapping keys are sorted lexicographically (plain `serde_json::Value`,
//! built without the `preserve_order` feature, sorts object keys for
//! us); tabular fields are rendered as an ordered list of columns
//! (sorted by name) followed by an ordered list of rows (original row
//! order preserved); there is no insignificant whitespace because
//! `serde_json::to_vec` is compact by default.

use serde_json::{json, Value};

use crate::body::{BlockBody, ContractHeaderRow, EventRow};
use crate::header::BlockHeader;

fn contract_header_table(rows: &[ContractHeaderRow]) -> Value {
    let rows: Vec<Value> = rows
        .iter()
        .map(|r| {
            json!([
                r.contract_address,
                hex::encode(&r.contract_bytecode),
                r.contract_description,
                r.contract_name,
                r.timestamp.to_rfc3339(),
            ])
        })
        .collect();
    json!({ "columns": ContractHeaderRow::COLUMNS, "rows": rows })
}

fn events_table(rows: &[EventRow]) -> Value {
    let rows: Vec<Value> = rows
        .iter()
        .map(|r| {
            json!([
                r.requester_id,
                r.requester_pk,
                r.timestamp.to_rfc3339(),
                r.transaction_type,
            ])
        })
        .collect();
    json!({ "columns": EventRow::COLUMNS, "rows": rows })
}

/// Canonical JSON bytes of a block body: the single input hashed both
/// for proof-of-work (combined with the proof/index term) and, paired
/// with the header, for block-to-block chaining.
pub fn canonical_bytes_body(body: &BlockBody) -> Vec<u8> {
    let value = json!({
        "contract_header": contract_header_table(&body.contract_header),
        "events": events_table(&body.events),
        "identity_policies": serde_json::to_value(&body.identity_policies)
            .expect("BlockBody::identity_policies is always serializable"),
        "resource_policies": serde_json::to_value(&body.resource_policies)
            .expect("BlockBody::resource_policies is always serializable"),
    });
    serde_json::to_vec(&value).expect("canonical Value is always serializable")
}

/// Canonical JSON bytes of a block header.
pub fn canonical_bytes_header(header: &BlockHeader) -> Vec<u8> {
    let value = serde_json::to_value(header).expect("BlockHeader is always serializable");
    serde_json::to_vec(&value).expect("canonical Value is always serializable")
}

/// The proof-of-work digest: `str(prev_proof^2 - next_proof^2 + index)`
/// concatenated with the candidate body's canonical bytes. Widened to
/// `i128` so the subtraction never panics the way naive `u64` math
/// would for a large `next_proof`.
pub fn pow_digest(prev_proof: u64, next_proof: u64, index: u64, body: &BlockBody) -> Vec<u8> {
    let math_term = (prev_proof as i128).pow(2) - (next_proof as i128).pow(2) + index as i128;
    let mut out = math_term.to_string().into_bytes();
    out.extend(canonical_bytes_body(body));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::BlockBody;

    #[test]
    fn empty_body_canonicalizes_deterministically() {
        let body = BlockBody::default();
        let a = canonical_bytes_body(&body);
        let b = canonical_bytes_body(&body);
        assert_eq!(a, b);
    }

    #[test]
    fn canonical_bytes_have_no_whitespace() {
        let body = BlockBody::default();
        let bytes = canonical_bytes_body(&body);
        let text = String::from_utf8(bytes).unwrap();
        assert!(!text.contains(' '));
    }

    #[test]
    fn pow_digest_changes_with_proof() {
        let body = BlockBody::default();
        let d1 = pow_digest(10, 0, 1, &body);
        let d2 = pow_digest(10, 1, 1, &body);
        assert_ne!(d1, d2);
    }
}
