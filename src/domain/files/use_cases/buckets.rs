use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::database::models::Bucket;
use crate::dispatch::{Handler, Request};
use crate::domain::files::{BucketStore, NewBucket};
use crate::domain::{DomainError, DomainResult};

pub struct GetBuckets;

impl Request for GetBuckets {
    type Response = GetBucketsResponse;
}

pub struct GetBucketsResponse {
    pub buckets: Vec<Bucket>,
}

pub struct GetBucketsHandler {
    buckets: Arc<dyn BucketStore>,
}

impl GetBucketsHandler {
    pub fn new(buckets: Arc<dyn BucketStore>) -> Self {
        Self { buckets }
    }
}

#[async_trait]
impl Handler<GetBuckets> for GetBucketsHandler {
    async fn handle(&self, _query: GetBuckets) -> DomainResult<GetBucketsResponse> {
        let buckets = self.buckets.list().await?;

        Ok(GetBucketsResponse { buckets })
    }
}

pub struct BucketValues {
    pub name: String,
    pub endpoint: String,
    pub headers: Option<String>,
    pub is_default: bool,
    pub per_user_quota: i32,
    pub allowed_file_name_extensions: Option<Vec<String>>,
    pub file_size_limits: Option<Value>,
}

impl BucketValues {
    fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("Name must not be empty."));
        }
        if self.per_user_quota < 0 {
            return Err(DomainError::validation("Quota must not be negative."));
        }
        if let Some(extensions) = &self.allowed_file_name_extensions {
            if extensions.iter().any(|e| !e.starts_with('.')) {
                return Err(DomainError::validation(
                    "File name extensions must start with a dot.",
                ));
            }
        }
        Ok(())
    }
}

pub struct CreateBucket {
    pub values: BucketValues,
}

impl Request for CreateBucket {
    type Response = CreateBucketResponse;
}

pub struct CreateBucketResponse {
    pub bucket: Bucket,
}

pub struct CreateBucketHandler {
    buckets: Arc<dyn BucketStore>,
}

impl CreateBucketHandler {
    pub fn new(buckets: Arc<dyn BucketStore>) -> Self {
        Self { buckets }
    }
}

#[async_trait]
impl Handler<CreateBucket> for CreateBucketHandler {
    async fn handle(&self, command: CreateBucket) -> DomainResult<CreateBucketResponse> {
        let values = command.values;
        values.validate()?;

        // Only one bucket may hold the user-managed uploads.
        if values.is_default && self.buckets.find_default().await?.is_some() {
            return Err(DomainError::conflict("A default bucket already exists."));
        }

        let bucket = self
            .buckets
            .insert(NewBucket {
                name: values.name,
                endpoint: values.endpoint,
                headers: values.headers,
                is_default: values.is_default,
                per_user_quota: values.per_user_quota,
                allowed_file_name_extensions: values.allowed_file_name_extensions,
                file_size_limits: values.file_size_limits,
            })
            .await?;

        Ok(CreateBucketResponse { bucket })
    }
}

pub struct UpdateBucket {
    pub id: i32,
    pub values: BucketValues,
}

impl Request for UpdateBucket {
    type Response = UpdateBucketResponse;
}

pub struct UpdateBucketResponse {
    pub bucket: Bucket,
}

pub struct UpdateBucketHandler {
    buckets: Arc<dyn BucketStore>,
}

impl UpdateBucketHandler {
    pub fn new(buckets: Arc<dyn BucketStore>) -> Self {
        Self { buckets }
    }
}

#[async_trait]
impl Handler<UpdateBucket> for UpdateBucketHandler {
    async fn handle(&self, command: UpdateBucket) -> DomainResult<UpdateBucketResponse> {
        let UpdateBucket { id, values } = command;
        values.validate()?;

        let mut entity = self
            .buckets
            .find(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Bucket {id} was not found")))?;

        if values.is_default {
            if let Some(existing) = self.buckets.find_default().await? {
                if existing.id != entity.id {
                    return Err(DomainError::conflict("A default bucket already exists."));
                }
            }
        }

        entity.name = values.name;
        entity.endpoint = values.endpoint;
        entity.headers = values.headers;
        entity.is_default = values.is_default;
        entity.per_user_quota = values.per_user_quota;
        entity.allowed_file_name_extensions = values.allowed_file_name_extensions;
        entity.file_size_limits = values.file_size_limits;

        let bucket = self.buckets.update(&entity).await?;

        Ok(UpdateBucketResponse { bucket })
    }
}

pub struct DeleteBucket {
    pub id: i32,
}

impl Request for DeleteBucket {
    type Response = DeleteBucketResponse;
}

pub struct DeleteBucketResponse;

pub struct DeleteBucketHandler {
    buckets: Arc<dyn BucketStore>,
}

impl DeleteBucketHandler {
    pub fn new(buckets: Arc<dyn BucketStore>) -> Self {
        Self { buckets }
    }
}

#[async_trait]
impl Handler<DeleteBucket> for DeleteBucketHandler {
    async fn handle(&self, command: DeleteBucket) -> DomainResult<DeleteBucketResponse> {
        let DeleteBucket { id } = command;

        let entity = self
            .buckets
            .find(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Bucket {id} was not found")))?;

        self.buckets.delete(entity.id).await?;

        Ok(DeleteBucketResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryBucketStore;

    fn values(name: &str, is_default: bool) -> BucketValues {
        BucketValues {
            name: name.to_string(),
            endpoint: "https://rag.internal".to_string(),
            headers: None,
            is_default,
            per_user_quota: 20,
            allowed_file_name_extensions: None,
            file_size_limits: None,
        }
    }

    #[tokio::test]
    async fn a_second_default_bucket_is_a_conflict() {
        let buckets = Arc::new(InMemoryBucketStore::default());
        let handler = CreateBucketHandler::new(buckets);

        handler
            .handle(CreateBucket { values: values("first", true) })
            .await
            .unwrap();
        let result = handler
            .handle(CreateBucket { values: values("second", true) })
            .await;

        assert!(matches!(result, Err(DomainError::Conflict(_))));
    }

    #[tokio::test]
    async fn extensions_without_a_leading_dot_are_rejected() {
        let buckets = Arc::new(InMemoryBucketStore::default());
        let handler = CreateBucketHandler::new(buckets);

        let mut bad = values("bucket", false);
        bad.allowed_file_name_extensions = Some(vec!["pdf".to_string()]);

        let result = handler.handle(CreateBucket { values: bad }).await;
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }
}
