use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::models::Blob;
use crate::domain::files::BlobStore;
use crate::domain::DomainResult;

pub struct PgBlobStore {
    pool: PgPool,
}

impl PgBlobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BlobStore for PgBlobStore {
    async fn find(&self, id: &str) -> DomainResult<Option<Blob>> {
        let row = sqlx::query_as::<_, Blob>(r#"SELECT * FROM "blobs" WHERE "id" = $1"#)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn save(&self, blob: &Blob) -> DomainResult<()> {
        sqlx::query(
            r#"INSERT INTO "blobs" ("id", "type", "buffer", "fileId", "category")
               VALUES ($1, $2, $3, $4, $5)
               ON CONFLICT ("id") DO UPDATE
               SET "type" = EXCLUDED."type",
                   "buffer" = EXCLUDED."buffer",
                   "fileId" = EXCLUDED."fileId",
                   "category" = EXCLUDED."category""#,
        )
        .bind(&blob.id)
        .bind(&blob.content_type)
        .bind(&blob.buffer)
        .bind(blob.file_id)
        .bind(&blob.category)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        sqlx::query(r#"DELETE FROM "blobs" WHERE "id" = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
