use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Authenticated Router Module
///
/// Todo CRUD for any authenticated caller. Every handler receives the
/// `AuthUser` bound by the authentication gate and applies the ownership
/// policy itself after looking the todo up.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // POST /todos, GET /todos
        // Create a todo owned by the caller; list the todos the caller may see.
        .route(
            "/todos",
            post(handlers::create_todo).get(handlers::list_todos),
        )
        // GET/PUT/DELETE /todos/{id}
        // 404 when absent, 403 when neither owner nor admin.
        .route(
            "/todos/{id}",
            get(handlers::get_todo)
                .put(handlers::update_todo)
                .delete(handlers::delete_todo),
        )
}
