use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Admin Router Module
///
/// Nested under `/admin`. `create_router` wraps this router in both the
/// authentication gate and the role gate, so non-admins get 403 before any
/// handler runs.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /admin/todos
        // Every todo regardless of owner.
        .route("/todos", get(handlers::list_all_todos))
}
