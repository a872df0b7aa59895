use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use todo_api::{
    AppState,
    config::{AppConfig, Env},
    create_router,
    repository::{AccountRepositoryState, PostgresRepository, TodoRepositoryState},
};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Loads configuration, initialises logging, connects to Postgres, applies
/// migrations and serves the API.
#[tokio::main]
async fn main() {
    // 1. Configuration (fail-fast on missing secrets).
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging. RUST_LOG wins over the defaults.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "todo_api=debug,tower_http=info".into());

    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    // 3. Database.
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.db_url)
        .await
        .expect("FATAL: Failed to connect to Postgres. Check DATABASE_URL.");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("FATAL: Failed to run database migrations.");

    tracing::info!("Connected to Postgres, migrations applied.");

    let repo = Arc::new(PostgresRepository::new(pool));
    let accounts = repo.clone() as AccountRepositoryState;
    let todos = repo as TodoRepositoryState;

    // 4. State and router.
    let addr = format!("0.0.0.0:{}", config.port);
    let app = create_router(AppState::new(config, accounts, todos));

    let listener = TcpListener::bind(&addr)
        .await
        .expect("FATAL: Failed to bind the HTTP listener.");

    tracing::info!("Listening on {}", addr);
    tracing::info!("API Documentation (Swagger UI) available at: http://{}/swagger-ui", addr);

    axum::serve(listener, app)
        .await
        .expect("FATAL: HTTP server terminated unexpectedly.");
}
