//! Access token issuance and verification.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::models::Role;

/// Claims
///
/// The payload of an access token. Everything the authentication gate needs
/// is carried here, so verification never touches the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the account id.
    pub sub: i64,
    pub username: String,
    pub role: Role,
    /// Issued at (unix seconds).
    pub iat: i64,
    /// Expiration (unix seconds).
    pub exp: i64,
    /// Unique token id.
    pub jti: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Covers malformed tokens, bad signatures and expired tokens alike.
    #[error("invalid token")]
    Invalid,
    /// `iat + ttl` does not fit in a timestamp.
    #[error("token lifetime overflows the expiry timestamp")]
    Lifetime,
    #[error("token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// TokenCodec
///
/// Signs and verifies HS256 access tokens with the process-wide secret.
/// Built once from `AppConfig` and cloned into the application state.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenCodec {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    /// Mints a token for the account, expiring `ttl` from now.
    pub fn issue(&self, account_id: i64, username: &str, role: Role) -> Result<String, TokenError> {
        let now = Utc::now();
        let expires_at = now.checked_add_signed(self.ttl).ok_or(TokenError::Lifetime)?;
        let claims = Claims {
            sub: account_id,
            username: username.to_string(),
            role,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?)
    }

    /// Checks signature and expiry. The caller only ever sees
    /// `TokenError::Invalid`; the specific cause goes to the debug log.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(reason = ?e.kind(), "token rejected");
                TokenError::Invalid
            })
    }
}
