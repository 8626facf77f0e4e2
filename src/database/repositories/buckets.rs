use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::models::Bucket;
use crate::domain::files::{BucketStore, NewBucket};
use crate::domain::DomainResult;

pub struct PgBucketStore {
    pool: PgPool,
}

impl PgBucketStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BucketStore for PgBucketStore {
    async fn find(&self, id: i32) -> DomainResult<Option<Bucket>> {
        let row = sqlx::query_as::<_, Bucket>(r#"SELECT * FROM "bucket" WHERE "id" = $1"#)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn find_default(&self) -> DomainResult<Option<Bucket>> {
        let row = sqlx::query_as::<_, Bucket>(
            r#"SELECT * FROM "bucket" WHERE "isDefault" = true LIMIT 1"#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn list(&self) -> DomainResult<Vec<Bucket>> {
        let rows = sqlx::query_as::<_, Bucket>(r#"SELECT * FROM "bucket" ORDER BY "id" ASC"#)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn insert(&self, bucket: NewBucket) -> DomainResult<Bucket> {
        let row = sqlx::query_as::<_, Bucket>(
            r#"INSERT INTO "bucket"
                   ("name", "endpoint", "headers", "isDefault", "perUserQuota",
                    "allowedFileNameExtensions", "fileSizeLimits")
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING *"#,
        )
        .bind(bucket.name)
        .bind(bucket.endpoint)
        .bind(bucket.headers)
        .bind(bucket.is_default)
        .bind(bucket.per_user_quota)
        .bind(bucket.allowed_file_name_extensions)
        .bind(bucket.file_size_limits)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update(&self, bucket: &Bucket) -> DomainResult<Bucket> {
        let row = sqlx::query_as::<_, Bucket>(
            r#"UPDATE "bucket"
               SET "name" = $2,
                   "endpoint" = $3,
                   "headers" = $4,
                   "isDefault" = $5,
                   "perUserQuota" = $6,
                   "allowedFileNameExtensions" = $7,
                   "fileSizeLimits" = $8,
                   "updatedAt" = now()
               WHERE "id" = $1
               RETURNING *"#,
        )
        .bind(bucket.id)
        .bind(&bucket.name)
        .bind(&bucket.endpoint)
        .bind(&bucket.headers)
        .bind(bucket.is_default)
        .bind(bucket.per_user_quota)
        .bind(&bucket.allowed_file_name_extensions)
        .bind(&bucket.file_size_limits)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        sqlx::query(r#"DELETE FROM "bucket" WHERE "id" = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
