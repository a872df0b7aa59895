use crate::models::{Account, Role, Todo, TodoRequest};
use async_trait::async_trait;
use std::sync::Arc;

mod memory;
mod postgres;

pub use memory::InMemoryRepository;
pub use postgres::PostgresRepository;

/// StoreError
///
/// Failures reported by a repository. `Conflict` is raised when the store's
/// own uniqueness constraint rejects a write, independently of any
/// existence check the caller may have done first.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("uniqueness constraint violated")]
    Conflict,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// TodoScope
///
/// Which todos a listing covers: every owner, or a single one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoScope {
    All,
    Owner(i64),
}

/// AccountRepository
///
/// The account directory. Usernames are unique and case-sensitive.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Looks up an account by exact username. `NotFound` when absent.
    async fn find_by_username(&self, username: &str) -> Result<Account, StoreError>;

    /// Inserts an account, assigning `id` and `created_at`.
    /// `Conflict` when the username is already taken.
    async fn create_account(
        &self,
        username: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<Account, StoreError>;
}

/// TodoRepository
///
/// Plain persistence for todos. Performs no authorization: callers apply the
/// ownership policy before invoking the mutating methods.
#[async_trait]
pub trait TodoRepository: Send + Sync {
    async fn create_todo(&self, owner_id: i64, req: TodoRequest) -> Result<Todo, StoreError>;

    /// `NotFound` when no todo has this id.
    async fn find_todo(&self, id: i64) -> Result<Todo, StoreError>;

    /// Todos in the scope, ordered by id.
    async fn find_todos(&self, scope: TodoScope) -> Result<Vec<Todo>, StoreError>;

    /// Replaces title, description and completed. Owner and creation time are kept.
    async fn update_todo(&self, id: i64, req: TodoRequest) -> Result<Todo, StoreError>;

    async fn delete_todo(&self, id: i64) -> Result<(), StoreError>;
}

pub type AccountRepositoryState = Arc<dyn AccountRepository>;
pub type TodoRepositoryState = Arc<dyn TodoRepository>;
