use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Extension {
    pub id: i32,
    pub name: String,
    pub enabled: bool,
    pub values: Value,
    #[sqlx(rename = "externalId")]
    pub external_id: Option<String>,
    #[sqlx(rename = "configurationId")]
    pub configuration_id: i32,
    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[sqlx(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}
