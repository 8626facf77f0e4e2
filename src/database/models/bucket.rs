use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    pub id: i32,
    pub name: String,
    pub endpoint: String,
    pub headers: Option<String>,
    /// The default bucket holds user-managed uploads.
    #[sqlx(rename = "isDefault")]
    pub is_default: bool,
    #[sqlx(rename = "perUserQuota")]
    pub per_user_quota: i32,
    #[sqlx(rename = "allowedFileNameExtensions")]
    pub allowed_file_name_extensions: Option<Vec<String>>,
    /// Size caps in MB by file kind, keyed by extension with a "general"
    /// fallback.
    #[sqlx(rename = "fileSizeLimits")]
    pub file_size_limits: Option<Value>,
    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[sqlx(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Bucket {
    /// Effective size cap in bytes for a file name extension.
    pub fn size_limit_bytes(&self, extension: &str, fallback_bytes: usize) -> usize {
        let limits = match &self.file_size_limits {
            Some(Value::Object(map)) => map,
            _ => return fallback_bytes,
        };

        let key = extension.trim_start_matches('.');
        let mb = limits
            .get(key)
            .or_else(|| limits.get("general"))
            .and_then(Value::as_u64);

        match mb {
            Some(mb) => (mb as usize) * 1024 * 1024,
            None => fallback_bytes,
        }
    }
}
