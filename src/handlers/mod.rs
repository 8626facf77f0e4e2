//! Thin HTTP controllers: build a command or query from the request,
//! dispatch it, map the typed response to JSON. Business rules live in
//! the handlers behind the dispatcher, not here.

pub mod auth;
pub mod conversations;
pub mod extensions;
pub mod files;
pub mod settings;
pub mod usages;
pub mod users;

use crate::error::ApiError;
use crate::middleware::AuthUser;

/// Admin-only endpoints call this first, mirroring a route guard.
pub fn ensure_admin(auth: &AuthUser) -> Result<(), ApiError> {
    if auth.is_admin {
        Ok(())
    } else {
        Err(ApiError::forbidden("Administrator access required"))
    }
}
