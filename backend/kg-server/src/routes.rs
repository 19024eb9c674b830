use crate::{AppState, federated_login, health, login, logout, me, refresh, register};

use axum::{
    Router,
    routing::{get, post},
};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};

/// Argon2 hashing is memory hungry; cap concurrent requests accordingly
const MAX_IN_FLIGHT_REQUESTS: usize = 256;

/// Build the application router with all endpoints
pub fn build_router(state: AppState) -> Router {
    let mut auth = Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/logout", post(logout))
        .route("/me", get(me));

    if state.federation_secret.is_some() {
        auth = auth.route("/federated", post(federated_login));
    } else {
        log::info!("Federated login endpoint not mounted (no federation secret)");
    }

    Router::new()
        .nest("/api/v1/auth", auth)
        // Health check endpoints
        .route("/health", get(health::health_check))
        .route("/live", get(health::liveness_check))
        .route("/ready", get(health::readiness_check))
        .with_state(state)
        .layer(ConcurrencyLimitLayer::new(MAX_IN_FLIGHT_REQUESTS))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
