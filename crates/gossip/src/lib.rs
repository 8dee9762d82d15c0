//! Best-effort peer broadcast (spec §4.4). Failures are logged and
//! never rolled back; a peer that answers non-2xx is not retried in
//! the same cycle.

use ac_block::Block;
use ac_policy::Policy;

/// POST a newly-admitted policy to every known peer's `/add-policy`.
pub async fn broadcast_policy(client: &reqwest::Client, peers: &[String], policy: &Policy) {
    for peer in peers {
        let url = format!("http://{peer}/add-policy");
        match client.post(&url).json(policy).send().await {
            Ok(resp) if resp.status().is_success() => {}
            Ok(resp) => {
                tracing::warn!(peer, status = %resp.status(), "peer rejected gossiped policy");
            }
            Err(err) => {
                tracing::warn!(peer, error = %err, "could not reach peer to gossip policy");
            }
        }
    }
}

/// Announce a freshly-mined block to every known peer's `/add-block`.
/// Called only when the local chain survived the post-mine consensus
/// round (spec §4.7), so a fork is never announced.
pub async fn announce_block(client: &reqwest::Client, peers: &[String], block: &Block) {
    for peer in peers {
        let url = format!("http://{peer}/add-block");
        match client.post(&url).json(block).send().await {
            Ok(resp) if resp.status().is_success() => {}
            Ok(resp) => {
                tracing::warn!(peer, status = %resp.status(), "peer rejected announced block");
            }
            Err(err) => {
                tracing::warn!(peer, error = %err, "could not reach peer to announce block");
            }
        }
    }
}
