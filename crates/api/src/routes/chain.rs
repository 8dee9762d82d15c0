use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::ApiError;
use crate::state::SharedState;

/// `GET /` — the chain snapshot consensus and peers rely on.
pub async fn get_chain(State(state): State<SharedState>) -> Json<ac_chain::ChainSnapshot> {
    Json(state.chain.read().snapshot())
}

/// `GET /update-cache` — rebuild the materialized view from the current
/// chain from scratch.
pub async fn update_cache(State(state): State<SharedState>) -> impl IntoResponse {
    state.refresh_view();
    (axum::http::StatusCode::OK, "cache refreshed")
}

/// `GET /mine` — mine a block, then run consensus before announcing, so
/// a fork is never announced (spec §4.7). The network phase of
/// consensus never holds the chain lock (spec §5).
pub async fn mine(State(state): State<SharedState>) -> Result<String, ApiError> {
    let mined_index = {
        let mut chain = state.chain.write();
        let block = chain.mine()?;
        block.index()
    };
    state.refresh_view();

    let peers = state.peers.read().clone();
    let local_len = state.chain.read().len();
    let candidate = ac_consensus::fetch_best(&state.http_client, &peers, local_len).await;
    let result = ac_consensus::apply(&mut state.chain.write(), candidate);
    if result.replaced {
        state.refresh_view();
    } else {
        let announced = state.chain.read().last_block().clone();
        ac_gossip::announce_block(&state.http_client, &peers, &announced).await;
    }

    Ok(format!("Block #{mined_index} has been mined!"))
}

/// `GET /consensus` — poll peers and adopt the longest valid chain.
pub async fn consensus(State(state): State<SharedState>) -> Json<ac_consensus::ConsensusResult> {
    let peers = state.peers.read().clone();
    let local_len = state.chain.read().len();
    let candidate = ac_consensus::fetch_best(&state.http_client, &peers, local_len).await;
    let result = ac_consensus::apply(&mut state.chain.write(), candidate);
    if result.replaced {
        state.refresh_view();
    }
    Json(result)
}

/// `POST /add-block` — validate and append a single announced block.
pub async fn add_block(
    State(state): State<SharedState>,
    Json(block): Json<ac_block::Block>,
) -> Result<impl IntoResponse, ApiError> {
    state.chain.write().add_block(block)?;
    state.refresh_view();
    Ok((axum::http::StatusCode::CREATED, "block added successfully"))
}
