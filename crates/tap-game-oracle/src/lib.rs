//! Tap Game Oracle Service
//!
//! HTTP service that attests game winners, verifies submitted attestations,
//! and settles each game at most once.

pub mod auth;
pub mod config;
pub mod handlers;
pub mod state;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use handlers::*;
pub use config::{ConfigError, OracleConfig};
pub use state::OracleState;

/// Issuance is operator-only and gets no CORS headers; the read and
/// verification routes are open to any origin.
pub fn create_router(state: Arc<OracleState>) -> Router {
    let operator = Router::new()
        .route("/api/attestations", post(create_attestation))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_operator_token,
        ));

    let public = Router::new()
        .route("/api/health", get(health))
        .route("/api/signer", get(get_signer))
        .route("/api/attestations/verify", post(verify_attestation))
        .route("/api/settlements", post(settle))
        .route("/api/settlements/:game_id", get(get_settlement))
        .layer(CorsLayer::permissive());

    Router::new()
        .merge(operator)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
