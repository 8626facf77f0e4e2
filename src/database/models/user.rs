use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[sqlx(rename = "apiKey")]
    pub api_key: Option<String>,
    #[sqlx(rename = "passwordHash")]
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,
    #[sqlx(rename = "userGroupId")]
    pub user_group_id: Option<String>,
    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[sqlx(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}
