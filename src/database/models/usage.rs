use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Aggregated per-day usage counter, e.g. tokens consumed by chat.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    pub date: DateTime<Utc>,
    #[sqlx(rename = "userId")]
    pub user_id: String,
    #[sqlx(rename = "userGroup")]
    pub user_group: String,
    pub counter: String,
    pub key: String,
    #[sqlx(rename = "subKey")]
    pub sub_key: String,
    pub count: i32,
}
