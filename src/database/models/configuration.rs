use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    pub id: i32,
    pub name: String,
    pub enabled: bool,
    #[sqlx(rename = "agentName")]
    pub agent_name: Option<String>,
    #[sqlx(rename = "chatFooter")]
    pub chat_footer: Option<String>,
    #[sqlx(rename = "chatSuggestions")]
    pub chat_suggestions: Option<Value>,
    #[sqlx(rename = "executorEndpoint")]
    pub executor_endpoint: Option<String>,
    #[sqlx(rename = "executorHeaders")]
    pub executor_headers: Option<String>,
    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[sqlx(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Per-user configuration assignment with user-supplied extension values.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationUser {
    pub id: i32,
    #[sqlx(rename = "configurationId")]
    pub configuration_id: i32,
    #[sqlx(rename = "userId")]
    pub user_id: String,
    #[sqlx(rename = "isDefault")]
    pub is_default: bool,
    pub values: Value,
}
