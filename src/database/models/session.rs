use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A login session. The row id is the SHA-256 fingerprint of the bearer
/// token; the raw token only ever leaves the server once, at login.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    pub id: String,
    /// Serialized [`crate::auth::SessionValue`].
    pub value: String,
}
