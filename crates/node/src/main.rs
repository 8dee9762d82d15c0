mod config;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use ac_crypto::Keypair;
use config::{Config, NodeRole};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    if config.node_role == NodeRole::Light {
        tracing::info!("starting in light role: no publisher HTTP surface will be bound");
        // The light role only ever acts as a consensus/gossip client of
        // a publisher node (spec §9(b)); there is nothing further for
        // this binary to serve.
        return Ok(());
    }

    let keypair = Keypair::generate(config.key_size)?;
    tracing::info!(key_size = config.key_size, "generated node RSA keypair");

    let state = Arc::new(ac_api::AppState::new(
        config.chain_difficulty,
        keypair.private,
        keypair.public,
        config.nonce_size,
        config.nonce_exp_min,
        config.nonce_exp_s,
    ));
    *state.peers.write() = config.peers.clone();

    // Startup consensus has a global 5s deadline; a slow or unreachable
    // peer set is not allowed to hold up boot, and the node falls back
    // to the local chain it already built above.
    let local_len = state.chain.read().len();
    let fetch = ac_consensus::fetch_best(&state.http_client, &config.peers, local_len);
    match tokio::time::timeout(Duration::from_secs(5), fetch).await {
        Ok(candidate) => {
            let result = ac_consensus::apply(&mut state.chain.write(), candidate);
            if result.replaced {
                state.refresh_view();
                tracing::info!("adopted longest chain from a peer during startup consensus");
            }
        }
        Err(_) => {
            tracing::warn!("consensus during startup timed out, node will init with a local chain");
        }
    }

    let app = ac_api::build_router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(%addr, peers = ?config.peers, "starting node");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
