use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

pub const MESSAGE_TYPES: &[&str] = &["human", "ai"];
pub const MESSAGE_RATINGS: &[&str] = &["good", "bad", "unrated"];

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: i32,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub message_type: String,
    pub data: Value,
    pub rating: Option<String>,
    pub error: Option<String>,
    pub tools: Option<Value>,
    pub debug: Option<Value>,
    pub sources: Option<Value>,
    #[sqlx(rename = "conversationId")]
    pub conversation_id: i32,
    #[sqlx(rename = "parentId")]
    pub parent_id: Option<i32>,
    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[sqlx(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}
