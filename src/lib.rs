use axum::{
    Router,
    extract::FromRef,
    http::HeaderName,
    middleware,
};
use chrono::Duration;
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;

// Route groups (public, authenticated, admin).
pub mod routes;
use auth::{AuthService, TokenCodec, admin_middleware, auth_middleware};
use routes::{admin, authenticated, public};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use error::AppError;
pub use repository::{
    AccountRepositoryState, InMemoryRepository, PostgresRepository, TodoRepositoryState,
};

/// ApiDoc
///
/// OpenAPI document for every route, served at `/api-docs/openapi.json` and
/// browsable through Swagger UI.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::register, handlers::login, handlers::create_todo, handlers::get_todo,
        handlers::list_todos, handlers::update_todo, handlers::delete_todo,
        handlers::list_all_todos
    ),
    components(
        schemas(
            models::Role, models::Todo, models::TodoRequest, models::RegisterRequest,
            models::LoginRequest, models::AccountResponse, models::TokenResponse,
            models::MessageResponse, models::ErrorResponse,
        )
    ),
    modifiers(&BearerSecurity),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "todos", description = "Todo items, scoped to their owner"),
        (name = "admin", description = "Admin-only views")
    )
)]
struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by protected paths.
struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// AppState
///
/// Everything a request may touch, cloned per request. The signing secret
/// only exists inside `tokens`; nothing here is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub tokens: TokenCodec,
    pub todos: TodoRepositoryState,
}

impl AppState {
    /// Wires the token codec and auth service from the configuration and the
    /// given stores.
    pub fn new(
        config: AppConfig,
        accounts: AccountRepositoryState,
        todos: TodoRepositoryState,
    ) -> Self {
        let tokens = TokenCodec::new(&config.jwt_secret, Duration::hours(config.token_ttl_hours));
        let auth = AuthService::new(accounts, tokens.clone());

        Self {
            auth,
            tokens,
            todos,
        }
    }
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for TokenCodec {
    fn from_ref(app_state: &AppState) -> TokenCodec {
        app_state.tokens.clone()
    }
}

/// create_router
///
/// Assembles the routing structure, applies the auth gates per route group
/// and the observability layers around everything.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .merge(
            authenticated::authenticated_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        // The last route_layer added runs first: authenticate, then check the role.
        .nest(
            "/admin",
            admin::admin_routes()
                .route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    admin_middleware,
                ))
                .route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    auth_middleware,
                )),
        )
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span for each request, tagged with method, uri and the `x-request-id`
/// assigned by `SetRequestIdLayer`. Headers other than the request id are
/// not recorded, so bearer tokens never reach the logs.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
