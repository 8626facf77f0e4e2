use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::models::Extension;
use crate::domain::extensions::{ExtensionStore, NewExtension};
use crate::domain::DomainResult;

pub struct PgExtensionStore {
    pool: PgPool,
}

impl PgExtensionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExtensionStore for PgExtensionStore {
    async fn find(&self, id: i32) -> DomainResult<Option<Extension>> {
        let row = sqlx::query_as::<_, Extension>(r#"SELECT * FROM "extensions" WHERE "id" = $1"#)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn list_for_configuration(&self, configuration_id: i32) -> DomainResult<Vec<Extension>> {
        let rows = sqlx::query_as::<_, Extension>(
            r#"SELECT * FROM "extensions" WHERE "configurationId" = $1 ORDER BY "id" ASC"#,
        )
        .bind(configuration_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn insert(&self, extension: NewExtension) -> DomainResult<Extension> {
        // externalId is filled by the insert trigger.
        let row = sqlx::query_as::<_, Extension>(
            r#"INSERT INTO "extensions" ("configurationId", "name", "enabled", "values")
               VALUES ($1, $2, $3, $4)
               RETURNING *"#,
        )
        .bind(extension.configuration_id)
        .bind(extension.name)
        .bind(extension.enabled)
        .bind(extension.values)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update(&self, extension: &Extension) -> DomainResult<Extension> {
        let row = sqlx::query_as::<_, Extension>(
            r#"UPDATE "extensions"
               SET "name" = $2, "enabled" = $3, "values" = $4, "updatedAt" = now()
               WHERE "id" = $1
               RETURNING *"#,
        )
        .bind(extension.id)
        .bind(&extension.name)
        .bind(extension.enabled)
        .bind(&extension.values)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        sqlx::query(r#"DELETE FROM "extensions" WHERE "id" = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
