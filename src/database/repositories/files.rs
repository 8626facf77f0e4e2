use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::models::File;
use crate::domain::files::{FilePage, FileStore, NewFile};
use crate::domain::DomainResult;

pub struct PgFileStore {
    pool: PgPool,
}

impl PgFileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileStore for PgFileStore {
    async fn find(&self, id: i32) -> DomainResult<Option<File>> {
        let row = sqlx::query_as::<_, File>(r#"SELECT * FROM "files" WHERE "id" = $1"#)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn list_for_user(
        &self,
        user_id: &str,
        page: i64,
        page_size: i64,
    ) -> DomainResult<FilePage> {
        let items = sqlx::query_as::<_, File>(
            r#"SELECT * FROM "files"
               WHERE "userId" = $1
               ORDER BY "id" DESC
               LIMIT $2 OFFSET $3"#,
        )
        .bind(user_id)
        .bind(page_size)
        .bind(page * page_size)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM "files" WHERE "userId" = $1"#)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(FilePage { items, total })
    }

    async fn count_for_user_in_bucket(&self, user_id: &str, bucket_id: i32) -> DomainResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"SELECT COUNT(*) FROM "files" WHERE "userId" = $1 AND "bucketId" = $2"#,
        )
        .bind(user_id)
        .bind(bucket_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn insert(&self, file: NewFile) -> DomainResult<File> {
        // docId defaults to the row id via the insert trigger.
        let row = sqlx::query_as::<_, File>(
            r#"INSERT INTO "files"
                   ("fileName", "mimeType", "fileSize", "userId", "bucketId",
                    "extensionId", "conversationId")
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING *"#,
        )
        .bind(file.file_name)
        .bind(file.mime_type)
        .bind(file.file_size)
        .bind(file.user_id)
        .bind(file.bucket_id)
        .bind(file.extension_id)
        .bind(file.conversation_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        sqlx::query(r#"DELETE FROM "files" WHERE "id" = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
