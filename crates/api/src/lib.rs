//! HTTP surface (spec §6): axum router wiring the chain, policy,
//! authentication, authorization, consensus and peer-registration
//! endpoints onto a single shared [`AppState`].

mod error;
mod routes;
mod state;

pub use error::ApiError;
pub use state::{AppState, SharedState};

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

/// Build the publisher-role router (spec §6's endpoint table). The
/// `light` node role never binds this router at all (spec §9(b));
/// that distinction lives in `ac-node`, not here.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(routes::chain::get_chain))
        .route("/add-policy", post(routes::policy::add_policy))
        .route("/update-cache", get(routes::chain::update_cache))
        .route("/mine", get(routes::chain::mine))
        .route("/consensus", get(routes::chain::consensus))
        .route("/add-block", post(routes::chain::add_block))
        .route("/register-peer", get(routes::peers::register_peer))
        .route("/register-with-node", post(routes::peers::register_with_node))
        .route("/auth", post(routes::auth::auth))
        .route("/check-auth", post(routes::auth::check_auth))
        .route("/authZ", post(routes::authz::authorize))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
