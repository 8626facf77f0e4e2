use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    pub id: String,
    /// MIME type served back with the bytes.
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub content_type: String,
    #[serde(skip_serializing, default)]
    pub buffer: Vec<u8>,
    #[sqlx(rename = "fileId")]
    pub file_id: Option<i32>,
    pub category: Option<String>,
}
