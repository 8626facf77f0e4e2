use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::config;
use crate::database::models::{Blob, File, User};
use crate::dispatch::{Handler, Request};
use crate::domain::files::{BlobStore, BucketStore, FileStore, NewFile};
use crate::domain::{DomainError, DomainResult};

/// Stores an upload in the default bucket: one blob row for the bytes,
/// one file row for the metadata.
pub struct UploadFile {
    pub user: User,
    pub file_name: String,
    pub mime_type: String,
    pub buffer: Vec<u8>,
}

impl Request for UploadFile {
    type Response = UploadFileResponse;
}

pub struct UploadFileResponse {
    pub file: File,
}

pub struct UploadFileHandler {
    buckets: Arc<dyn BucketStore>,
    files: Arc<dyn FileStore>,
    blobs: Arc<dyn BlobStore>,
}

impl UploadFileHandler {
    pub fn new(
        buckets: Arc<dyn BucketStore>,
        files: Arc<dyn FileStore>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            buckets,
            files,
            blobs,
        }
    }
}

#[async_trait]
impl Handler<UploadFile> for UploadFileHandler {
    async fn handle(&self, command: UploadFile) -> DomainResult<UploadFileResponse> {
        let UploadFile { user, file_name, mime_type, buffer } = command;

        if buffer.is_empty() {
            return Err(DomainError::validation("File is empty."));
        }

        let bucket = self
            .buckets
            .find_default()
            .await?
            .ok_or_else(|| DomainError::validation("No default bucket is configured."))?;

        let extension = File::name_extension(&file_name)
            .ok_or_else(|| DomainError::validation("File name has no extension."))?;

        if let Some(allowed) = &bucket.allowed_file_name_extensions {
            if !allowed.iter().any(|e| e.eq_ignore_ascii_case(&extension)) {
                return Err(DomainError::validation(format!(
                    "Files of type '{extension}' are not allowed in this bucket."
                )));
            }
        }

        let limit =
            bucket.size_limit_bytes(&extension, config::config().uploads.max_file_size_bytes);
        if buffer.len() > limit {
            return Err(DomainError::validation(format!(
                "File exceeds the size limit of {limit} bytes."
            )));
        }

        let used = self
            .files
            .count_for_user_in_bucket(&user.id, bucket.id)
            .await?;
        if used >= bucket.per_user_quota as i64 {
            return Err(DomainError::validation(
                "Upload quota for this user is exhausted.",
            ));
        }

        let file = self
            .files
            .insert(NewFile {
                file_name,
                mime_type: mime_type.clone(),
                file_size: buffer.len() as i32,
                user_id: Some(user.id),
                bucket_id: Some(bucket.id),
                extension_id: None,
                conversation_id: None,
            })
            .await?;

        self.blobs
            .save(&Blob {
                id: Uuid::new_v4().to_string(),
                content_type: mime_type,
                buffer,
                file_id: Some(file.id),
                category: Some("file".to_string()),
            })
            .await?;

        Ok(UploadFileResponse { file })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::domain::files::NewBucket;
    use crate::testing::{fake_user, InMemoryBlobStore, InMemoryBucketStore, InMemoryFileStore};

    async fn default_bucket(buckets: &InMemoryBucketStore, quota: i32) {
        buckets
            .insert(NewBucket {
                name: "default".to_string(),
                endpoint: "https://rag.internal".to_string(),
                headers: None,
                is_default: true,
                per_user_quota: quota,
                allowed_file_name_extensions: Some(vec![".pdf".to_string(), ".txt".to_string()]),
                file_size_limits: Some(json!({"general": 1})),
            })
            .await
            .unwrap();
    }

    fn handler(
        buckets: Arc<InMemoryBucketStore>,
        files: Arc<InMemoryFileStore>,
    ) -> UploadFileHandler {
        UploadFileHandler::new(buckets, files, Arc::new(InMemoryBlobStore::default()))
    }

    #[tokio::test]
    async fn disallowed_extension_is_rejected() {
        let buckets = Arc::new(InMemoryBucketStore::default());
        let files = Arc::new(InMemoryFileStore::default());
        default_bucket(&buckets, 20).await;

        let result = handler(buckets, files)
            .handle(UploadFile {
                user: fake_user("u1"),
                file_name: "tool.exe".to_string(),
                mime_type: "application/octet-stream".to_string(),
                buffer: vec![1, 2, 3],
            })
            .await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn oversized_file_is_rejected() {
        let buckets = Arc::new(InMemoryBucketStore::default());
        let files = Arc::new(InMemoryFileStore::default());
        default_bucket(&buckets, 20).await;

        let result = handler(buckets, files)
            .handle(UploadFile {
                user: fake_user("u1"),
                file_name: "big.pdf".to_string(),
                mime_type: "application/pdf".to_string(),
                buffer: vec![0; 2 * 1024 * 1024],
            })
            .await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn exhausted_quota_is_rejected() {
        let buckets = Arc::new(InMemoryBucketStore::default());
        let files = Arc::new(InMemoryFileStore::default());
        default_bucket(&buckets, 1).await;
        let handler = handler(buckets, files);

        handler
            .handle(UploadFile {
                user: fake_user("u1"),
                file_name: "one.txt".to_string(),
                mime_type: "text/plain".to_string(),
                buffer: b"hello".to_vec(),
            })
            .await
            .unwrap();

        let result = handler
            .handle(UploadFile {
                user: fake_user("u1"),
                file_name: "two.txt".to_string(),
                mime_type: "text/plain".to_string(),
                buffer: b"world".to_vec(),
            })
            .await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn stores_file_metadata_and_blob() {
        let buckets = Arc::new(InMemoryBucketStore::default());
        let files = Arc::new(InMemoryFileStore::default());
        let blobs = Arc::new(InMemoryBlobStore::default());
        default_bucket(&buckets, 20).await;
        let handler = UploadFileHandler::new(buckets, files.clone(), blobs.clone());

        let response = handler
            .handle(UploadFile {
                user: fake_user("u1"),
                file_name: "notes.txt".to_string(),
                mime_type: "text/plain".to_string(),
                buffer: b"hello".to_vec(),
            })
            .await
            .unwrap();

        assert_eq!(response.file.file_size, 5);
        assert_eq!(blobs.count().await, 1);
    }
}
