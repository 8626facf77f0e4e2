use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const BUILTIN_USER_GROUP_ADMIN: &str = "admin";
pub const BUILTIN_USER_GROUP_DEFAULT: &str = "default";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserGroup {
    pub id: String,
    pub name: String,
    #[sqlx(rename = "isAdmin")]
    pub is_admin: bool,
    #[sqlx(rename = "isBuiltIn")]
    pub is_built_in: bool,
    /// Monthly token budget for the whole group; `None` means unlimited.
    #[sqlx(rename = "monthlyTokens")]
    pub monthly_tokens: Option<i32>,
    /// Monthly token budget per member; `None` means unlimited.
    #[sqlx(rename = "monthlyUserTokens")]
    pub monthly_user_tokens: Option<i32>,
    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[sqlx(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}
