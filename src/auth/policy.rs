//! Ownership rules for todos.

use crate::{auth::AuthUser, error::AppError, repository::TodoScope};

/// A todo is reachable by its owner and by any admin.
///
/// Call only after the todo has been fetched, so a missing id is reported as
/// 404 before ownership is considered.
pub fn authorize(identity: &AuthUser, owner_id: i64) -> Result<(), AppError> {
    if identity.is_admin() || identity.id == owner_id {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Admins list every todo; everyone else lists their own.
pub fn list_scope(identity: &AuthUser) -> TodoScope {
    if identity.is_admin() {
        TodoScope::All
    } else {
        TodoScope::Owner(identity.id)
    }
}
