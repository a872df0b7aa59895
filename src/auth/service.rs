//! Registration and login.

use crate::{
    auth::{
        password::{hash_password, verify_password},
        token::TokenCodec,
    },
    error::AppError,
    models::{Account, Role},
    repository::{AccountRepositoryState, StoreError},
};

/// AuthService
///
/// Orchestrates registration and login over the account directory. Both
/// collaborators are injected so tests can substitute stores and secrets.
#[derive(Clone)]
pub struct AuthService {
    accounts: AccountRepositoryState,
    tokens: TokenCodec,
}

impl AuthService {
    pub fn new(accounts: AccountRepositoryState, tokens: TokenCodec) -> Self {
        Self { accounts, tokens }
    }

    /// register
    ///
    /// Creates an account. The existence lookup is only a fast path: the
    /// store's uniqueness constraint decides, and its `Conflict` is reported
    /// as `UsernameTaken` as well.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        role: &str,
    ) -> Result<Account, AppError> {
        if username.is_empty() || password.is_empty() {
            return Err(AppError::invalid_input("username and password are required"));
        }
        let role = Role::parse(role).map_err(|e| AppError::invalid_input(e.to_string()))?;

        match self.accounts.find_by_username(username).await {
            Ok(_) => return Err(AppError::UsernameTaken),
            Err(StoreError::NotFound(_)) => {}
            Err(e) => return Err(AppError::Persistence(e)),
        }

        let password_hash = hash_password(password).map_err(|e| AppError::Internal(e.to_string()))?;

        let account = self
            .accounts
            .create_account(username, &password_hash, role)
            .await
            .map_err(|e| match e {
                StoreError::Conflict => AppError::UsernameTaken,
                other => AppError::Persistence(other),
            })?;

        tracing::info!(account_id = account.id, role = %account.role, "account registered");
        Ok(account)
    }

    /// login
    ///
    /// Returns a signed access token. An unknown username and a wrong
    /// password produce the same `InvalidCredentials` error.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AppError> {
        let account = match self.accounts.find_by_username(username).await {
            Ok(account) => account,
            Err(StoreError::NotFound(_)) => {
                tracing::info!("login rejected");
                return Err(AppError::InvalidCredentials);
            }
            Err(e) => return Err(AppError::Persistence(e)),
        };

        if !verify_password(password, &account.password_hash) {
            tracing::info!(account_id = account.id, "login rejected");
            return Err(AppError::InvalidCredentials);
        }

        let token = self
            .tokens
            .issue(account.id, &account.username, account.role)
            .map_err(|e| AppError::Internal(e.to_string()))?;

        tracing::info!(account_id = account.id, "login succeeded");
        Ok(token)
    }
}
