use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Unauthenticated endpoints: liveness plus the two credential exchanges.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for load balancers.
        .route("/health", get(|| async { "ok" }))
        // POST /register
        // Creates an account with role "user" or "admin".
        .route("/register", post(handlers::register))
        // POST /login
        // Verifies credentials and returns a bearer token.
        .route("/login", post(handlers::login))
}
