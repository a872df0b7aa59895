use crate::{
    AppState,
    auth::{AuthUser, policy},
    error::AppError,
    models::{
        AccountResponse, ErrorResponse, LoginRequest, MessageResponse, RegisterRequest, Todo,
        TodoRequest, TokenResponse,
    },
};
use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};

// --- Extraction Helpers ---

/// Unwraps a JSON body, reporting a malformed one as `InvalidInput` (400)
/// instead of Axum's default rejection.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::invalid_input(rejection.body_text()))
}

fn todo_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, AppError> {
    path.map(|Path(id)| id)
        .map_err(|_| AppError::invalid_input("invalid id"))
}

fn validated(req: TodoRequest) -> Result<TodoRequest, AppError> {
    if req.title.trim().is_empty() {
        return Err(AppError::invalid_input("title is required"));
    }
    Ok(req)
}

// --- Auth Handlers ---

/// register
///
/// [Public Route] Creates an account. The response never includes the
/// password or its digest.
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registered", body = AccountResponse),
        (status = 400, description = "Invalid input or username taken", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AccountResponse>), AppError> {
    let req = json_body(payload)?;
    let account = state
        .auth
        .register(&req.username, &req.password, &req.role)
        .await?;

    Ok((StatusCode::CREATED, Json(account.into())))
}

/// login
///
/// [Public Route] Exchanges credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Malformed body", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, AppError> {
    let req = json_body(payload)?;
    let token = state.auth.login(&req.username, &req.password).await?;
    Ok(Json(TokenResponse { token }))
}

// --- Todo Handlers ---
//
// Single-todo handlers follow the same order: parse input, fetch (404),
// ownership check (403), then act.

/// create_todo
///
/// [Authenticated Route] The owner is always the caller.
#[utoipa::path(
    post,
    path = "/todos",
    request_body = TodoRequest,
    responses(
        (status = 201, description = "Created", body = Todo),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Unauthenticated", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "todos"
)]
pub async fn create_todo(
    auth_user: AuthUser,
    State(state): State<AppState>,
    payload: Result<Json<TodoRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Todo>), AppError> {
    let req = validated(json_body(payload)?)?;
    let todo = state.todos.create_todo(auth_user.id, req).await?;

    tracing::debug!(todo_id = todo.id, owner = todo.user_id, "todo created");
    Ok((StatusCode::CREATED, Json(todo)))
}

/// get_todo
///
/// [Authenticated Route] Owners see their own todos, admins see any.
#[utoipa::path(
    get,
    path = "/todos/{id}",
    params(("id" = i64, Path, description = "Todo ID")),
    responses(
        (status = 200, description = "Found", body = Todo),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "todos"
)]
pub async fn get_todo(
    auth_user: AuthUser,
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Todo>, AppError> {
    let id = todo_id(path)?;
    let todo = state.todos.find_todo(id).await?;
    policy::authorize(&auth_user, todo.user_id)?;
    Ok(Json(todo))
}

/// list_todos
///
/// [Authenticated Route] Admins receive every todo, users only their own.
/// Also mounted at `/admin/todos` behind the role gate.
#[utoipa::path(
    get,
    path = "/todos",
    responses(
        (status = 200, description = "Todos visible to the caller", body = [Todo]),
        (status = 401, description = "Unauthenticated", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "todos"
)]
pub async fn list_todos(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Todo>>, AppError> {
    let todos = state.todos.find_todos(policy::list_scope(&auth_user)).await?;
    Ok(Json(todos))
}

/// list_all_todos
///
/// [Admin Route] Every todo in the system. The role gate in front of this
/// route guarantees the caller is an admin.
#[utoipa::path(
    get,
    path = "/admin/todos",
    responses(
        (status = 200, description = "All todos", body = [Todo]),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn list_all_todos(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Todo>>, AppError> {
    list_todos(auth_user, State(state)).await
}

/// update_todo
///
/// [Authenticated Route] Replaces title, description and completed.
#[utoipa::path(
    put,
    path = "/todos/{id}",
    params(("id" = i64, Path, description = "Todo ID")),
    request_body = TodoRequest,
    responses(
        (status = 200, description = "Updated", body = Todo),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "todos"
)]
pub async fn update_todo(
    auth_user: AuthUser,
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<TodoRequest>, JsonRejection>,
) -> Result<Json<Todo>, AppError> {
    let id = todo_id(path)?;
    let req = validated(json_body(payload)?)?;

    let existing = state.todos.find_todo(id).await?;
    policy::authorize(&auth_user, existing.user_id)?;

    let todo = state.todos.update_todo(id, req).await?;
    Ok(Json(todo))
}

/// delete_todo
///
/// [Authenticated Route] Removes a todo owned by the caller, or any todo for admins.
#[utoipa::path(
    delete,
    path = "/todos/{id}",
    params(("id" = i64, Path, description = "Todo ID")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "todos"
)]
pub async fn delete_todo(
    auth_user: AuthUser,
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = todo_id(path)?;

    let existing = state.todos.find_todo(id).await?;
    policy::authorize(&auth_user, existing.user_id)?;

    state.todos.delete_todo(id).await?;
    tracing::debug!(todo_id = id, by = auth_user.id, "todo deleted");

    Ok(Json(MessageResponse {
        message: "todo deleted".to_string(),
    }))
}
