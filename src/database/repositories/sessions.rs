use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::models::Session;
use crate::domain::users::SessionStore;
use crate::domain::DomainResult;

pub struct PgSessionStore {
    pool: PgPool,
}

impl PgSessionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn find(&self, id: &str) -> DomainResult<Option<Session>> {
        let row = sqlx::query_as::<_, Session>(r#"SELECT * FROM "sessions" WHERE "id" = $1"#)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn insert(&self, session: &Session) -> DomainResult<()> {
        sqlx::query(r#"INSERT INTO "sessions" ("id", "value") VALUES ($1, $2)"#)
            .bind(&session.id)
            .bind(&session.value)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        sqlx::query(r#"DELETE FROM "sessions" WHERE "id" = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
