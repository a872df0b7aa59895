use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

// --- Roles ---

/// Role
///
/// The closed set of account roles. Stored as lowercase text in the
/// `users.role` column and carried in the `role` claim of access tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

/// Error returned when text does not name one of the two roles.
#[derive(Debug, thiserror::Error)]
#[error("role must be either \"user\" or \"admin\"")]
pub struct ParseRoleError;

impl Role {
    /// Parses the wire representation. Matching is exact: `"Admin"` is rejected.
    pub fn parse(s: &str) -> Result<Self, ParseRoleError> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            _ => Err(ParseRoleError),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Role {
    type Error = ParseRoleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Role::parse(&value)
    }
}

// --- Stored Records ---

/// Account
///
/// A registered identity from the `users` table. The password digest is
/// kept for verification only and is skipped by serde, so an `Account` can
/// never leak it through a JSON response.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Account {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Todo
///
/// A todo item from the `todos` table. `user_id` is the owning account and is
/// always taken from the authenticated identity, never from the request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, FromRow)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub completed: bool,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

// --- Request Payloads ---

/// RegisterRequest
///
/// Body of `POST /register`. `role` is kept as text here and validated by the
/// auth service so an unknown role is reported as a 400 like any other bad field.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "pw123")]
    pub password: String,
    #[schema(example = "user")]
    pub role: String,
}

/// LoginRequest
///
/// Body of `POST /login`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// TodoRequest
///
/// Body of `POST /todos` and `PUT /todos/{id}`. An update replaces all three
/// fields. Any owner or id sent by the client is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct TodoRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
}

// --- Responses ---

/// AccountResponse
///
/// The outward projection of an `Account`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AccountResponse {
    pub id: i64,
    pub username: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            username: account.username,
            role: account.role,
            created_at: account.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}
