use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{AccountRepository, StoreError, TodoRepository, TodoScope};
use crate::models::{Account, Role, Todo, TodoRequest};

/// InMemoryRepository
///
/// A process-local store implementing both repository traits, used by the
/// test suites in place of Postgres. Usernames are checked for uniqueness on
/// insert just as the Postgres index does.
#[derive(Default)]
pub struct InMemoryRepository {
    accounts: RwLock<Accounts>,
    todos: RwLock<Todos>,
}

#[derive(Default)]
struct Accounts {
    next_id: i64,
    by_username: HashMap<String, Account>,
}

#[derive(Default)]
struct Todos {
    next_id: i64,
    by_id: BTreeMap<i64, Todo>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for InMemoryRepository {
    async fn find_by_username(&self, username: &str) -> Result<Account, StoreError> {
        self.accounts
            .read()
            .await
            .by_username
            .get(username)
            .cloned()
            .ok_or(StoreError::NotFound("account"))
    }

    async fn create_account(
        &self,
        username: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<Account, StoreError> {
        let mut accounts = self.accounts.write().await;
        if accounts.by_username.contains_key(username) {
            return Err(StoreError::Conflict);
        }

        accounts.next_id += 1;
        let account = Account {
            id: accounts.next_id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            role,
            created_at: Utc::now(),
        };
        accounts
            .by_username
            .insert(account.username.clone(), account.clone());
        Ok(account)
    }
}

#[async_trait]
impl TodoRepository for InMemoryRepository {
    async fn create_todo(&self, owner_id: i64, req: TodoRequest) -> Result<Todo, StoreError> {
        let mut todos = self.todos.write().await;
        todos.next_id += 1;
        let todo = Todo {
            id: todos.next_id,
            title: req.title,
            description: req.description,
            completed: req.completed,
            user_id: owner_id,
            created_at: Utc::now(),
        };
        todos.by_id.insert(todo.id, todo.clone());
        Ok(todo)
    }

    async fn find_todo(&self, id: i64) -> Result<Todo, StoreError> {
        self.todos
            .read()
            .await
            .by_id
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound("todo"))
    }

    async fn find_todos(&self, scope: TodoScope) -> Result<Vec<Todo>, StoreError> {
        let todos = self.todos.read().await;
        Ok(todos
            .by_id
            .values()
            .filter(|todo| match scope {
                TodoScope::All => true,
                TodoScope::Owner(owner_id) => todo.user_id == owner_id,
            })
            .cloned()
            .collect())
    }

    async fn update_todo(&self, id: i64, req: TodoRequest) -> Result<Todo, StoreError> {
        let mut todos = self.todos.write().await;
        let todo = todos
            .by_id
            .get_mut(&id)
            .ok_or(StoreError::NotFound("todo"))?;

        todo.title = req.title;
        todo.description = req.description;
        todo.completed = req.completed;
        Ok(todo.clone())
    }

    async fn delete_todo(&self, id: i64) -> Result<(), StoreError> {
        self.todos
            .write()
            .await
            .by_id
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound("todo"))
    }
}
