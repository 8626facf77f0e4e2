use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

pub const CONVERSATION_RATINGS: &[&str] = &["good", "bad", "unrated"];

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: i32,
    pub name: Option<String>,
    #[sqlx(rename = "isNameSetManually")]
    pub is_name_set_manually: bool,
    pub llm: Option<String>,
    pub rating: Option<String>,
    #[sqlx(rename = "configurationId")]
    pub configuration_id: i32,
    #[sqlx(rename = "userId")]
    pub user_id: String,
    pub context: Option<Value>,
    #[sqlx(rename = "extensionUserArguments")]
    pub extension_user_arguments: Option<Value>,
    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[sqlx(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}
