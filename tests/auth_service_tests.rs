use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::sync::Arc;
use todo_api::{
    AppError,
    auth::{AuthService, TokenCodec},
    models::{Account, Role},
    repository::{AccountRepository, InMemoryRepository, StoreError},
};

const TEST_JWT_SECRET: &str = "test-secret-value-1234567890";

fn codec() -> TokenCodec {
    TokenCodec::new(TEST_JWT_SECRET, Duration::hours(1))
}

fn service() -> AuthService {
    AuthService::new(Arc::new(InMemoryRepository::new()), codec())
}

// --- Mock Repositories ---

/// Simulates losing the check-then-insert race: the lookup sees no account,
/// but the insert hits the uniqueness constraint.
struct RacingRepo;

#[async_trait]
impl AccountRepository for RacingRepo {
    async fn find_by_username(&self, _username: &str) -> Result<Account, StoreError> {
        Err(StoreError::NotFound("account"))
    }
    async fn create_account(
        &self,
        _username: &str,
        _password_hash: &str,
        _role: Role,
    ) -> Result<Account, StoreError> {
        Err(StoreError::Conflict)
    }
}

/// Every call fails as if the database were unreachable.
struct BrokenRepo;

#[async_trait]
impl AccountRepository for BrokenRepo {
    async fn find_by_username(&self, _username: &str) -> Result<Account, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }
    async fn create_account(
        &self,
        _username: &str,
        _password_hash: &str,
        _role: Role,
    ) -> Result<Account, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }
}

/// Returns an account whose stored digest is not a PHC string.
struct CorruptDigestRepo;

#[async_trait]
impl AccountRepository for CorruptDigestRepo {
    async fn find_by_username(&self, username: &str) -> Result<Account, StoreError> {
        Ok(Account {
            id: 1,
            username: username.to_string(),
            password_hash: "plaintext-password".to_string(),
            role: Role::User,
            created_at: Utc::now(),
        })
    }
    async fn create_account(
        &self,
        _username: &str,
        _password_hash: &str,
        _role: Role,
    ) -> Result<Account, StoreError> {
        Err(StoreError::Conflict)
    }
}

// --- Registration ---

#[tokio::test]
async fn test_register_then_login_for_both_roles() {
    let auth = service();

    for (username, role) in [("alice", "user"), ("root", "admin")] {
        let account = auth.register(username, "pw123", role).await.unwrap();
        assert_eq!(account.username, username);
        assert_eq!(account.role.as_str(), role);

        let token = auth.login(username, "pw123").await.unwrap();
        let claims = codec().verify(&token).unwrap();
        assert_eq!(claims.sub, account.id);
        assert_eq!(claims.username, username);
        assert_eq!(claims.role, account.role);
    }
}

#[tokio::test]
async fn test_register_stores_a_digest_not_the_password() {
    let account = service().register("alice", "pw123", "user").await.unwrap();

    assert_ne!(account.password_hash, "pw123");
    assert!(account.password_hash.starts_with("$argon2id$"));
}

#[tokio::test]
async fn test_register_rejects_empty_fields() {
    let auth = service();

    for (username, password) in [("", "pw"), ("alice", ""), ("", "")] {
        let err = auth.register(username, password, "user").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}

#[tokio::test]
async fn test_register_rejects_unknown_roles() {
    let auth = service();

    for role in ["", "Admin", "superuser", "USER"] {
        let err = auth.register("alice", "pw123", role).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)), "role {role:?}");
    }
}

#[tokio::test]
async fn test_duplicate_username_is_taken_regardless_of_password_or_role() {
    let auth = service();
    auth.register("alice", "pw123", "user").await.unwrap();

    for (password, role) in [("pw123", "user"), ("pw456", "admin"), ("other", "user")] {
        let err = auth.register("alice", password, role).await.unwrap_err();
        assert!(matches!(err, AppError::UsernameTaken));
    }

    // The original credentials still work.
    assert!(auth.login("alice", "pw123").await.is_ok());
}

#[tokio::test]
async fn test_store_conflict_is_reported_as_username_taken() {
    let auth = AuthService::new(Arc::new(RacingRepo), codec());

    let err = auth.register("alice", "pw123", "user").await.unwrap_err();
    assert!(matches!(err, AppError::UsernameTaken));
}

#[tokio::test]
async fn test_store_failure_is_a_persistence_error() {
    let auth = AuthService::new(Arc::new(BrokenRepo), codec());

    let err = auth.register("alice", "pw123", "user").await.unwrap_err();
    assert!(matches!(err, AppError::Persistence(_)));

    let err = auth.login("alice", "pw123").await.unwrap_err();
    assert!(matches!(err, AppError::Persistence(_)));
}

// --- Login ---

#[tokio::test]
async fn test_unknown_user_and_wrong_password_fail_identically() {
    let auth = service();
    auth.register("alice", "pw123", "user").await.unwrap();

    let unknown = auth.login("nobody", "pw123").await.unwrap_err();
    let wrong = auth.login("alice", "wrong").await.unwrap_err();

    assert!(matches!(unknown, AppError::InvalidCredentials));
    assert!(matches!(wrong, AppError::InvalidCredentials));
    assert_eq!(unknown.to_string(), wrong.to_string());
    assert_eq!(unknown.status(), wrong.status());
}

#[tokio::test]
async fn test_login_is_case_sensitive_on_username() {
    let auth = service();
    auth.register("alice", "pw123", "user").await.unwrap();

    let err = auth.login("Alice", "pw123").await.unwrap_err();
    assert!(matches!(err, AppError::InvalidCredentials));
}

#[tokio::test]
async fn test_corrupt_stored_digest_is_invalid_credentials() {
    let auth = AuthService::new(Arc::new(CorruptDigestRepo), codec());

    let err = auth.login("alice", "plaintext-password").await.unwrap_err();
    assert!(matches!(err, AppError::InvalidCredentials));
}
