use std::sync::Arc;

use async_trait::async_trait;

use crate::database::models::Blob;
use crate::dispatch::{Handler, Request};
use crate::domain::files::BlobStore;
use crate::domain::{DomainError, DomainResult};

/// Stores an appearance asset (logo, background, avatar) under a fixed id.
pub struct UploadBlob {
    pub id: String,
    pub buffer: Vec<u8>,
    pub mime_type: String,
}

impl Request for UploadBlob {
    type Response = UploadBlobResponse;
}

pub struct UploadBlobResponse;

pub struct UploadBlobHandler {
    blobs: Arc<dyn BlobStore>,
}

impl UploadBlobHandler {
    pub fn new(blobs: Arc<dyn BlobStore>) -> Self {
        Self { blobs }
    }
}

#[async_trait]
impl Handler<UploadBlob> for UploadBlobHandler {
    async fn handle(&self, command: UploadBlob) -> DomainResult<UploadBlobResponse> {
        let UploadBlob { id, buffer, mime_type } = command;

        if buffer.is_empty() {
            return Err(DomainError::validation("Blob is empty."));
        }

        self.blobs
            .save(&Blob {
                id,
                content_type: mime_type,
                buffer,
                file_id: None,
                category: Some("setting".to_string()),
            })
            .await?;

        Ok(UploadBlobResponse)
    }
}

pub struct GetBlob {
    pub id: String,
}

impl Request for GetBlob {
    type Response = GetBlobResponse;
}

pub struct GetBlobResponse {
    pub blob: Blob,
}

pub struct GetBlobHandler {
    blobs: Arc<dyn BlobStore>,
}

impl GetBlobHandler {
    pub fn new(blobs: Arc<dyn BlobStore>) -> Self {
        Self { blobs }
    }
}

#[async_trait]
impl Handler<GetBlob> for GetBlobHandler {
    async fn handle(&self, query: GetBlob) -> DomainResult<GetBlobResponse> {
        let GetBlob { id } = query;

        let blob = self
            .blobs
            .find(&id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Blob '{id}' was not found")))?;

        Ok(GetBlobResponse { blob })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryBlobStore;

    #[tokio::test]
    async fn round_trips_a_blob() {
        let blobs = Arc::new(InMemoryBlobStore::default());
        let upload = UploadBlobHandler::new(blobs.clone());
        let get = GetBlobHandler::new(blobs);

        upload
            .handle(UploadBlob {
                id: "logo".to_string(),
                buffer: vec![1, 2, 3],
                mime_type: "image/png".to_string(),
            })
            .await
            .unwrap();

        let response = get.handle(GetBlob { id: "logo".to_string() }).await.unwrap();
        assert_eq!(response.blob.buffer, vec![1, 2, 3]);
        assert_eq!(response.blob.content_type, "image/png");
    }

    #[tokio::test]
    async fn missing_blob_is_not_found() {
        let blobs = Arc::new(InMemoryBlobStore::default());
        let handler = GetBlobHandler::new(blobs);

        let result = handler.handle(GetBlob { id: "nope".to_string() }).await;
        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }
}
