use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct File {
    pub id: i32,
    #[sqlx(rename = "mimeType")]
    pub mime_type: String,
    #[sqlx(rename = "fileSize")]
    pub file_size: i32,
    #[sqlx(rename = "fileName")]
    pub file_name: String,
    #[sqlx(rename = "userId")]
    pub user_id: Option<String>,
    #[sqlx(rename = "bucketId")]
    pub bucket_id: Option<i32>,
    #[sqlx(rename = "extensionId")]
    pub extension_id: Option<i32>,
    #[sqlx(rename = "conversationId")]
    pub conversation_id: Option<i32>,
    #[sqlx(rename = "uploadStatus")]
    pub upload_status: String,
    #[sqlx(rename = "docId")]
    pub doc_id: Option<i32>,
    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[sqlx(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl File {
    /// The file name suffix including the leading dot, lower-cased.
    pub fn name_extension(file_name: &str) -> Option<String> {
        let index = file_name.rfind('.')?;
        if index == 0 || index == file_name.len() - 1 {
            return None;
        }
        Some(file_name[index..].to_ascii_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_name_extensions() {
        assert_eq!(File::name_extension("report.PDF"), Some(".pdf".to_string()));
        assert_eq!(File::name_extension("archive.tar.gz"), Some(".gz".to_string()));
        assert_eq!(File::name_extension("README"), None);
        assert_eq!(File::name_extension(".env"), None);
        assert_eq!(File::name_extension("trailing."), None);
    }
}
