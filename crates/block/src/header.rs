use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Block header. `index` is monotonic starting at 0; `previous_hash` is
/// `"0"` only for genesis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub index: u64,
    pub timestamp: DateTime<Utc>,
    pub previous_hash: String,
    #[serde(default)]
    pub proof: u64,
}

impl BlockHeader {
    pub fn genesis(timestamp: DateTime<Utc>) -> Self {
        BlockHeader {
            index: 0,
            timestamp,
            previous_hash: "0".to_string(),
            proof: 0,
        }
    }
}
