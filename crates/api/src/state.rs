use std::sync::Arc;

use ac_auth::NonceStore;
use ac_chain::Chain;
use ac_materializer::MaterializedView;
use parking_lot::RwLock;
use rsa::{RsaPrivateKey, RsaPublicKey};

/// Shared node state. `chain` is the exclusive-lock-on-mutation resource
/// (spec §5): mining, admission, chain replacement, and materialization
/// all take the write lock; `GET /` and consensus reads take the read
/// lock. `view` is cached separately and refreshed explicitly via
/// `/update-cache` and implicitly on every accepted block.
pub struct AppState {
    pub chain: RwLock<Chain>,
    pub view: RwLock<MaterializedView>,
    pub nonce_store: NonceStore,
    pub peers: RwLock<Vec<String>>,
    pub http_client: reqwest::Client,
    pub node_private_key: RsaPrivateKey,
    pub node_public_key: RsaPublicKey,
    pub nonce_size: usize,
    pub nonce_exp_min: i64,
    pub nonce_exp_s: i64,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(
        difficulty: usize,
        node_private_key: RsaPrivateKey,
        node_public_key: RsaPublicKey,
        nonce_size: usize,
        nonce_exp_min: i64,
        nonce_exp_s: i64,
    ) -> Self {
        let chain = Chain::new(difficulty);
        let view = chain.materialized_view();
        AppState {
            chain: RwLock::new(chain),
            view: RwLock::new(view),
            nonce_store: NonceStore::new(),
            peers: RwLock::new(Vec::new()),
            http_client: reqwest::Client::new(),
            node_private_key,
            node_public_key,
            nonce_size,
            nonce_exp_min,
            nonce_exp_s,
        }
    }

    pub fn refresh_view(&self) {
        let snapshot = self.chain.read().materialized_view();
        *self.view.write() = snapshot;
    }
}
