use axum::{
    extract::{FromRef, FromRequestParts, Request},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::{auth::token::TokenCodec, error::AppError, models::Role};

/// AuthUser
///
/// The verified identity of the caller. Produced from the bearer token and
/// bound into the request extensions by `auth_middleware`; handlers take it
/// as an extractor and never read identity from the request body.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// AuthUser Extractor Implementation
///
/// Reuses the identity already bound by `auth_middleware` when present.
/// Otherwise it verifies the `Authorization: Bearer <token>` header itself:
/// 1. Header present and valid UTF-8.
/// 2. `Bearer ` prefix followed by a non-empty token, taken verbatim.
/// 3. Signature and expiry checked by the `TokenCodec` from state.
///
/// Rejection: `AppError::Unauthenticated` (401) on any failure, without
/// saying which step failed.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    TokenCodec: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(bound) = parts.extensions.get::<AuthUser>() {
            return Ok(bound.clone());
        }

        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .filter(|token| !token.is_empty())
            .ok_or(AppError::Unauthenticated)?;

        let claims = TokenCodec::from_ref(state)
            .verify(token)
            .map_err(|_| AppError::Unauthenticated)?;

        Ok(AuthUser {
            id: claims.sub,
            username: claims.username,
            role: claims.role,
        })
    }
}

/// auth_middleware
///
/// Authentication gate for protected route groups. Extracting `AuthUser`
/// rejects unauthenticated requests with 401 before the handler runs; on
/// success the identity is stored in the request extensions for everything
/// downstream.
pub async fn auth_middleware(auth_user: AuthUser, mut request: Request, next: Next) -> Response {
    tracing::debug!(user_id = auth_user.id, role = %auth_user.role, "request authenticated");
    request.extensions_mut().insert(auth_user);
    next.run(request).await
}

/// admin_middleware
///
/// Role gate for admin-only routes. Layer it inside `auth_middleware` so it
/// reads the identity bound there; a non-admin caller gets 403.
pub async fn admin_middleware(
    auth_user: AuthUser,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !auth_user.is_admin() {
        tracing::info!(user_id = auth_user.id, "admin route refused");
        return Err(AppError::Forbidden);
    }
    Ok(next.run(request).await)
}
