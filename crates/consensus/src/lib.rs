//! Longest-chain consensus (spec §4.7): crash-tolerant, not
//! Byzantine-fault-tolerant. A peer fetch that exceeds its deadline or
//! fails to connect is skipped, not retried.
//!
//! Split into a network phase (`fetch_best`, no lock held) and a tiny
//! synchronous apply phase (`apply`) so callers never hold a chain lock
//! across an `.await`.

use std::time::Duration;

use ac_chain::{Chain, ChainSnapshot};
use serde::Serialize;

const PER_PEER_DEADLINE: Duration = Duration::from_millis(2500);

#[derive(Debug, Serialize)]
pub struct ConsensusResult {
    pub replaced: bool,
}

/// Poll every peer's `GET /` and return the longest chain strictly
/// longer than `local_len`, if any (ties keep the local chain).
pub async fn fetch_best(
    client: &reqwest::Client,
    peers: &[String],
    local_len: usize,
) -> Option<ChainSnapshot> {
    let mut best: Option<ChainSnapshot> = None;

    for peer in peers {
        let url = format!("http://{peer}/");
        let fetch = client.get(&url).send();
        let response = match tokio::time::timeout(PER_PEER_DEADLINE, fetch).await {
            Ok(Ok(resp)) if resp.status().is_success() => resp,
            Ok(Ok(resp)) => {
                tracing::warn!(peer, status = %resp.status(), "peer returned non-2xx during consensus");
                continue;
            }
            Ok(Err(err)) => {
                tracing::warn!(peer, error = %err, "could not reach peer during consensus");
                continue;
            }
            Err(_) => {
                tracing::warn!(peer, "peer timed out during consensus");
                continue;
            }
        };
        let snapshot: ChainSnapshot = match response.json().await {
            Ok(s) => s,
            Err(err) => {
                tracing::warn!(peer, error = %err, "peer returned an unparsable chain");
                continue;
            }
        };
        let candidate_len = snapshot.chain.len();
        let is_longer = candidate_len > local_len
            && best.as_ref().map_or(true, |b| candidate_len > b.chain.len());
        if is_longer {
            best = Some(snapshot);
        }
    }

    best
}

/// Apply a fetched candidate chain to `chain`, if any. Synchronous: safe
/// to call while holding the chain's write lock.
pub fn apply(chain: &mut Chain, candidate: Option<ChainSnapshot>) -> ConsensusResult {
    let Some(candidate) = candidate else {
        return ConsensusResult { replaced: false };
    };
    let difficulty = candidate.difficulty;
    if chain.create_blockchain_from_request(candidate.chain) {
        chain.difficulty = difficulty;
        ConsensusResult { replaced: true }
    } else {
        ConsensusResult { replaced: false }
    }
}

/// Convenience wrapper combining `fetch_best` and `apply` for callers
/// that don't need to avoid holding the lock (e.g. tests without a
/// Send-future constraint).
pub async fn run(client: &reqwest::Client, peers: &[String], chain: &mut Chain) -> ConsensusResult {
    let candidate = fetch_best(client, peers, chain.len()).await;
    apply(chain, candidate)
}
