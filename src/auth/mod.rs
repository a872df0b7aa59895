//! Authentication and authorization.
//!
//! - [`password`]: argon2 hashing and verification
//! - [`TokenCodec`]: HS256 access tokens
//! - [`AuthService`]: registration and login
//! - [`AuthUser`], [`auth_middleware`], [`admin_middleware`]: request gates
//! - [`policy`]: owner-or-admin rules for todos

mod guard;
pub mod password;
pub mod policy;
mod service;
mod token;

pub use guard::{AuthUser, admin_middleware, auth_middleware};
pub use service::AuthService;
pub use token::{Claims, TokenCodec, TokenError};
