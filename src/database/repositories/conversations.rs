use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::models::Conversation;
use crate::domain::chat::{ConversationStore, NewConversation};
use crate::domain::DomainResult;

pub struct PgConversationStore {
    pool: PgPool,
}

impl PgConversationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConversationStore for PgConversationStore {
    async fn find(&self, id: i32) -> DomainResult<Option<Conversation>> {
        let row = sqlx::query_as::<_, Conversation>(
            r#"SELECT * FROM "conversations" WHERE "id" = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn list_for_user(&self, user_id: &str, limit: i64) -> DomainResult<Vec<Conversation>> {
        let rows = sqlx::query_as::<_, Conversation>(
            r#"SELECT * FROM "conversations"
               WHERE "userId" = $1 AND "name" IS NOT NULL AND "name" <> ''
               ORDER BY "updatedAt" DESC
               LIMIT $2"#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn insert(&self, conversation: NewConversation) -> DomainResult<Conversation> {
        let row = sqlx::query_as::<_, Conversation>(
            r#"INSERT INTO "conversations"
                   ("userId", "configurationId", "name", "llm", "context", "extensionUserArguments")
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING *"#,
        )
        .bind(conversation.user_id)
        .bind(conversation.configuration_id)
        .bind(conversation.name)
        .bind(conversation.llm)
        .bind(conversation.context)
        .bind(conversation.extension_user_arguments)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update(&self, conversation: &Conversation) -> DomainResult<Conversation> {
        let row = sqlx::query_as::<_, Conversation>(
            r#"UPDATE "conversations"
               SET "name" = $2,
                   "isNameSetManually" = $3,
                   "llm" = $4,
                   "rating" = $5,
                   "configurationId" = $6,
                   "context" = $7,
                   "extensionUserArguments" = $8,
                   "updatedAt" = now()
               WHERE "id" = $1
               RETURNING *"#,
        )
        .bind(conversation.id)
        .bind(&conversation.name)
        .bind(conversation.is_name_set_manually)
        .bind(&conversation.llm)
        .bind(&conversation.rating)
        .bind(conversation.configuration_id)
        .bind(&conversation.context)
        .bind(&conversation.extension_user_arguments)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        sqlx::query(r#"DELETE FROM "conversations" WHERE "id" = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_for_user(&self, user_id: &str) -> DomainResult<u64> {
        let result = sqlx::query(r#"DELETE FROM "conversations" WHERE "userId" = $1"#)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
