use axum::extract::{ConnectInfo, State};
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use crate::error::ApiError;
use crate::state::SharedState;

#[derive(Serialize, Deserialize)]
struct RegisterPeerResponse {
    chain: Vec<ac_block::Block>,
    difficulty: usize,
    peers: Vec<String>,
}

/// `GET /register-peer` — add the caller's observed address to this
/// node's peer set and hand back the current chain view plus the
/// now-updated peer list. Dedup is by exact `ip:port` match, same as
/// the source this is grounded on — a second request from the same
/// host on a fresh ephemeral port is treated as a distinct peer.
pub async fn register_peer(
    State(state): State<SharedState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<impl IntoResponse, ApiError> {
    let peer = addr.to_string();
    let mut peers = state.peers.write();
    if peers.iter().any(|p| p == &peer) {
        return Err(ApiError::BadRequest(format!(
            "peer {peer} is already registered"
        )));
    }
    peers.push(peer);
    let snapshot = state.chain.read().snapshot();
    Ok(axum::Json(RegisterPeerResponse {
        chain: snapshot.chain,
        difficulty: snapshot.difficulty,
        peers: peers.clone(),
    }))
}

#[derive(Deserialize)]
pub struct RegisterWithNodeRequest {
    pub node_address: String,
    pub node_port: u16,
}

/// `POST /register-with-node` — register with a remote node's
/// `/register-peer`, adopt its reported peers, and sync to its chain.
pub async fn register_with_node(
    State(state): State<SharedState>,
    axum::Json(req): axum::Json<RegisterWithNodeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let target = format!("{}:{}", req.node_address, req.node_port);
    if state.peers.read().iter().any(|p| p == &target) {
        return Err(ApiError::BadRequest(format!(
            "already registered with {target}"
        )));
    }

    let url = format!("http://{target}/register-peer");
    let response = state
        .http_client
        .get(&url)
        .send()
        .await
        .map_err(|e| ApiError::BadRequest(format!("could not reach node at {target}: {e}")))?;
    if !response.status().is_success() {
        return Err(ApiError::BadRequest(format!(
            "node at {target} rejected registration: {}",
            response.status()
        )));
    }
    let body: RegisterPeerResponse = response
        .json()
        .await
        .map_err(|e| ApiError::BadRequest(format!("malformed response from {target}: {e}")))?;

    {
        let mut peers = state.peers.write();
        for peer in body.peers {
            if !peers.iter().any(|p| p == &peer) {
                peers.push(peer);
            }
        }
        if !peers.iter().any(|p| p == &target) {
            peers.push(target.clone());
        }
    }
    state
        .chain
        .write()
        .create_blockchain_from_request(body.chain);
    state.refresh_view();

    Ok((
        axum::http::StatusCode::OK,
        format!("registered with node at {target}"),
    ))
}
