use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::models::Message;
use crate::domain::chat::{MessageStore, NewMessage};
use crate::domain::DomainResult;

pub struct PgMessageStore {
    pool: PgPool,
}

impl PgMessageStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageStore for PgMessageStore {
    async fn find(&self, id: i32) -> DomainResult<Option<Message>> {
        let row = sqlx::query_as::<_, Message>(r#"SELECT * FROM "messages" WHERE "id" = $1"#)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn list_for_conversation(
        &self,
        conversation_id: i32,
        limit: i64,
    ) -> DomainResult<Vec<Message>> {
        let rows = sqlx::query_as::<_, Message>(
            r#"SELECT * FROM "messages"
               WHERE "conversationId" = $1
               ORDER BY "id" ASC
               LIMIT $2"#,
        )
        .bind(conversation_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn count_for_conversation(&self, conversation_id: i32) -> DomainResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"SELECT COUNT(*) FROM "messages" WHERE "conversationId" = $1"#,
        )
        .bind(conversation_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn insert(&self, message: NewMessage) -> DomainResult<Message> {
        let row = sqlx::query_as::<_, Message>(
            r#"INSERT INTO "messages"
                   ("conversationId", "type", "data", "error", "sources", "parentId")
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING *"#,
        )
        .bind(message.conversation_id)
        .bind(message.message_type)
        .bind(message.data)
        .bind(message.error)
        .bind(message.sources)
        .bind(message.parent_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn set_rating(&self, id: i32, rating: &str) -> DomainResult<Message> {
        let row = sqlx::query_as::<_, Message>(
            r#"UPDATE "messages" SET "rating" = $2, "updatedAt" = now() WHERE "id" = $1 RETURNING *"#,
        )
        .bind(id)
        .bind(rating)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn copy_to_conversation(&self, from: i32, to: i32) -> DomainResult<u64> {
        // parentId is dropped: the copied rows get fresh ids and the old
        // parents would dangle.
        let result = sqlx::query(
            r#"INSERT INTO "messages"
                   ("conversationId", "type", "data", "rating", "error", "tools", "debug", "sources")
               SELECT $2, "type", "data", "rating", "error", "tools", "debug", "sources"
               FROM "messages"
               WHERE "conversationId" = $1
               ORDER BY "id" ASC"#,
        )
        .bind(from)
        .bind(to)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
