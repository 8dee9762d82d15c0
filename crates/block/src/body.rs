use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use ac_policy::{IdentityPolicy, ResourcePolicy};

/// A row of the block's contract header table: one entry per
/// smart contract introduced by genesis or by a subsequent block's
/// mining.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContractHeaderRow {
    pub timestamp: DateTime<Utc>,
    pub contract_name: String,
    pub contract_address: String,
    pub contract_description: String,
    #[serde(with = "hex_bytes")]
    pub contract_bytecode: Vec<u8>,
}

impl ContractHeaderRow {
    pub const COLUMNS: [&'static str; 5] = [
        "contract_address",
        "contract_bytecode",
        "contract_description",
        "contract_name",
        "timestamp",
    ];
}

/// A row of the block's append-only events table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventRow {
    pub timestamp: DateTime<Utc>,
    pub requester_id: String,
    pub requester_pk: String,
    pub transaction_type: String,
}

impl EventRow {
    pub const COLUMNS: [&'static str; 4] =
        ["requester_id", "requester_pk", "timestamp", "transaction_type"];
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(d)?;
        hex::decode(s).map_err(serde::de::Error::custom)
    }
}

/// Block body: the mutable part of the ledger's per-block state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockBody {
    #[serde(default)]
    pub resource_policies: IndexMap<String, ResourcePolicy>,
    /// principal_id -> (policy_id -> policy)
    #[serde(default)]
    pub identity_policies: IndexMap<String, IndexMap<String, IdentityPolicy>>,
    #[serde(default)]
    pub contract_header: Vec<ContractHeaderRow>,
    #[serde(default)]
    pub events: Vec<EventRow>,
}
