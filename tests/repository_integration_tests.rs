//! Exercises `PostgresRepository` against a live database.
//!
//! These tests are ignored by default. Run them with
//! `DATABASE_URL=postgres://... cargo test -- --ignored`.

use sqlx::PgPool;
use todo_api::{
    models::{Role, TodoRequest},
    repository::{AccountRepository, PostgresRepository, StoreError, TodoRepository, TodoScope},
};
use uuid::Uuid;

// --- Test Context and Setup ---

struct DbTestContext {
    pool: PgPool,
}

impl DbTestContext {
    async fn setup() -> Self {
        dotenv::dotenv().ok();

        let db_url = std::env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set to run integration tests");

        let pool = PgPool::connect(&db_url)
            .await
            .expect("Failed to connect to database for integration tests.");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run database migrations.");

        DbTestContext { pool }
    }

    fn repository(&self) -> PostgresRepository {
        PostgresRepository::new(self.pool.clone())
    }
}

/// Usernames are unique across runs so the tests never collide with old rows.
fn unique_username(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}

fn todo_request(title: &str) -> TodoRequest {
    TodoRequest {
        title: title.to_string(),
        ..TodoRequest::default()
    }
}

// --- Account Tests ---

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_create_and_find_account() {
    let ctx = DbTestContext::setup().await;
    let repo = ctx.repository();
    let username = unique_username("alice");

    let created = repo
        .create_account(&username, "digest", Role::Admin)
        .await
        .expect("Failed to create account");
    let found = repo.find_by_username(&username).await.unwrap();

    assert_eq!(found.id, created.id);
    assert_eq!(found.role, Role::Admin);
    assert_eq!(found.password_hash, "digest");
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_duplicate_username_is_conflict() {
    let ctx = DbTestContext::setup().await;
    let repo = ctx.repository();
    let username = unique_username("dup");

    repo.create_account(&username, "a", Role::User).await.unwrap();
    let err = repo
        .create_account(&username, "b", Role::Admin)
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::Conflict));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_unknown_username_is_not_found() {
    let ctx = DbTestContext::setup().await;

    let err = ctx
        .repository()
        .find_by_username(&unique_username("ghost"))
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::NotFound(_)));
}

// --- Todo Tests ---

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_todo_crud_cycle() {
    let ctx = DbTestContext::setup().await;
    let repo = ctx.repository();
    let owner = repo
        .create_account(&unique_username("owner"), "digest", Role::User)
        .await
        .unwrap();

    let created = repo.create_todo(owner.id, todo_request("first")).await.unwrap();
    assert_eq!(created.user_id, owner.id);
    assert!(!created.completed);

    let updated = repo
        .update_todo(
            created.id,
            TodoRequest {
                title: "first, edited".to_string(),
                description: "now with notes".to_string(),
                completed: true,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.user_id, owner.id);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.completed);

    assert_eq!(repo.find_todo(created.id).await.unwrap(), updated);

    repo.delete_todo(created.id).await.unwrap();
    assert!(matches!(
        repo.find_todo(created.id).await,
        Err(StoreError::NotFound(_))
    ));
    assert!(matches!(
        repo.delete_todo(created.id).await,
        Err(StoreError::NotFound(_))
    ));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_find_todos_respects_scope() {
    let ctx = DbTestContext::setup().await;
    let repo = ctx.repository();
    let alice = repo
        .create_account(&unique_username("alice"), "digest", Role::User)
        .await
        .unwrap();
    let bob = repo
        .create_account(&unique_username("bob"), "digest", Role::User)
        .await
        .unwrap();

    let a = repo.create_todo(alice.id, todo_request("a")).await.unwrap();
    let b = repo.create_todo(bob.id, todo_request("b")).await.unwrap();

    let mine = repo.find_todos(TodoScope::Owner(alice.id)).await.unwrap();
    assert_eq!(mine, vec![a.clone()]);

    let all = repo.find_todos(TodoScope::All).await.unwrap();
    assert!(all.contains(&a));
    assert!(all.contains(&b));
    assert!(all.windows(2).all(|pair| pair[0].id < pair[1].id));
}
