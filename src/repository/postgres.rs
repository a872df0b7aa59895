use async_trait::async_trait;
use sqlx::PgPool;

use super::{AccountRepository, StoreError, TodoRepository, TodoScope};
use crate::models::{Account, Role, Todo, TodoRequest};

const TODO_COLUMNS: &str = "id, title, description, completed, user_id, created_at";

/// PostgresRepository
///
/// Implements both repository traits over a shared connection pool. The pool
/// owns connection concurrency and backpressure.
#[derive(Clone)]
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Maps a unique-constraint violation to `Conflict`, anything else to `Database`.
fn classify(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Conflict,
        _ => StoreError::Database(err),
    }
}

#[async_trait]
impl AccountRepository for PostgresRepository {
    async fn find_by_username(&self, username: &str) -> Result<Account, StoreError> {
        sqlx::query_as::<_, Account>(
            "SELECT id, username, password_hash, role, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound("account"))
    }

    /// create_account
    ///
    /// Relies on the `users_username_key` unique index as the authority on
    /// username uniqueness; a concurrent duplicate insert comes back as `Conflict`.
    async fn create_account(
        &self,
        username: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<Account, StoreError> {
        sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO users (username, password_hash, role)
            VALUES ($1, $2, $3)
            RETURNING id, username, password_hash, role, created_at
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(classify)
    }
}

#[async_trait]
impl TodoRepository for PostgresRepository {
    async fn create_todo(&self, owner_id: i64, req: TodoRequest) -> Result<Todo, StoreError> {
        let query = format!(
            "INSERT INTO todos (title, description, completed, user_id) \
             VALUES ($1, $2, $3, $4) RETURNING {TODO_COLUMNS}"
        );
        sqlx::query_as::<_, Todo>(&query)
            .bind(req.title)
            .bind(req.description)
            .bind(req.completed)
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await
            .map_err(classify)
    }

    async fn find_todo(&self, id: i64) -> Result<Todo, StoreError> {
        let query = format!("SELECT {TODO_COLUMNS} FROM todos WHERE id = $1");
        sqlx::query_as::<_, Todo>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound("todo"))
    }

    async fn find_todos(&self, scope: TodoScope) -> Result<Vec<Todo>, StoreError> {
        let todos = match scope {
            TodoScope::All => {
                let query = format!("SELECT {TODO_COLUMNS} FROM todos ORDER BY id");
                sqlx::query_as::<_, Todo>(&query)
                    .fetch_all(&self.pool)
                    .await?
            }
            TodoScope::Owner(owner_id) => {
                let query =
                    format!("SELECT {TODO_COLUMNS} FROM todos WHERE user_id = $1 ORDER BY id");
                sqlx::query_as::<_, Todo>(&query)
                    .bind(owner_id)
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(todos)
    }

    async fn update_todo(&self, id: i64, req: TodoRequest) -> Result<Todo, StoreError> {
        let query = format!(
            "UPDATE todos SET title = $1, description = $2, completed = $3 \
             WHERE id = $4 RETURNING {TODO_COLUMNS}"
        );
        sqlx::query_as::<_, Todo>(&query)
            .bind(req.title)
            .bind(req.description)
            .bind(req.completed)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound("todo"))
    }

    async fn delete_todo(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("todo"));
        }
        Ok(())
    }
}
