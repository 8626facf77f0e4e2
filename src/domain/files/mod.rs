use async_trait::async_trait;
use serde_json::Value;

use crate::database::models::{Blob, Bucket, File};
use crate::domain::DomainResult;

pub mod use_cases;

pub struct NewBucket {
    pub name: String,
    pub endpoint: String,
    pub headers: Option<String>,
    pub is_default: bool,
    pub per_user_quota: i32,
    pub allowed_file_name_extensions: Option<Vec<String>>,
    pub file_size_limits: Option<Value>,
}

#[async_trait]
pub trait BucketStore: Send + Sync {
    async fn find(&self, id: i32) -> DomainResult<Option<Bucket>>;

    /// The bucket holding user-managed uploads, if one is marked default.
    async fn find_default(&self) -> DomainResult<Option<Bucket>>;

    async fn list(&self) -> DomainResult<Vec<Bucket>>;

    async fn insert(&self, bucket: NewBucket) -> DomainResult<Bucket>;

    async fn update(&self, bucket: &Bucket) -> DomainResult<Bucket>;

    async fn delete(&self, id: i32) -> DomainResult<()>;
}

pub struct NewFile {
    pub file_name: String,
    pub mime_type: String,
    pub file_size: i32,
    pub user_id: Option<String>,
    pub bucket_id: Option<i32>,
    pub extension_id: Option<i32>,
    pub conversation_id: Option<i32>,
}

pub struct FilePage {
    pub items: Vec<File>,
    pub total: i64,
}

#[async_trait]
pub trait FileStore: Send + Sync {
    async fn find(&self, id: i32) -> DomainResult<Option<File>>;

    /// Files owned by one user, newest first.
    async fn list_for_user(
        &self,
        user_id: &str,
        page: i64,
        page_size: i64,
    ) -> DomainResult<FilePage>;

    async fn count_for_user_in_bucket(&self, user_id: &str, bucket_id: i32) -> DomainResult<i64>;

    async fn insert(&self, file: NewFile) -> DomainResult<File>;

    async fn delete(&self, id: i32) -> DomainResult<()>;
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn find(&self, id: &str) -> DomainResult<Option<Blob>>;

    /// Inserts or replaces the blob with this id.
    async fn save(&self, blob: &Blob) -> DomainResult<()>;

    async fn delete(&self, id: &str) -> DomainResult<()>;
}
