use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

use crate::database::models::{Configuration, ConfigurationUser};
use crate::domain::extensions::{ConfigurationStore, ConfigurationUserStore, NewConfiguration};
use crate::domain::DomainResult;

pub struct PgConfigurationStore {
    pool: PgPool,
}

impl PgConfigurationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConfigurationStore for PgConfigurationStore {
    async fn find(&self, id: i32) -> DomainResult<Option<Configuration>> {
        let row = sqlx::query_as::<_, Configuration>(
            r#"SELECT * FROM "configurations" WHERE "id" = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn list(&self) -> DomainResult<Vec<Configuration>> {
        let rows = sqlx::query_as::<_, Configuration>(
            r#"SELECT * FROM "configurations" ORDER BY "id" ASC"#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn insert(&self, configuration: NewConfiguration) -> DomainResult<Configuration> {
        let row = sqlx::query_as::<_, Configuration>(
            r#"INSERT INTO "configurations"
                   ("name", "enabled", "agentName", "chatFooter", "chatSuggestions",
                    "executorEndpoint", "executorHeaders")
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING *"#,
        )
        .bind(configuration.name)
        .bind(configuration.enabled)
        .bind(configuration.agent_name)
        .bind(configuration.chat_footer)
        .bind(configuration.chat_suggestions)
        .bind(configuration.executor_endpoint)
        .bind(configuration.executor_headers)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update(&self, configuration: &Configuration) -> DomainResult<Configuration> {
        let row = sqlx::query_as::<_, Configuration>(
            r#"UPDATE "configurations"
               SET "name" = $2,
                   "enabled" = $3,
                   "agentName" = $4,
                   "chatFooter" = $5,
                   "chatSuggestions" = $6,
                   "executorEndpoint" = $7,
                   "executorHeaders" = $8,
                   "updatedAt" = now()
               WHERE "id" = $1
               RETURNING *"#,
        )
        .bind(configuration.id)
        .bind(&configuration.name)
        .bind(configuration.enabled)
        .bind(&configuration.agent_name)
        .bind(&configuration.chat_footer)
        .bind(&configuration.chat_suggestions)
        .bind(&configuration.executor_endpoint)
        .bind(&configuration.executor_headers)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        sqlx::query(r#"DELETE FROM "configurations" WHERE "id" = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn group_ids(&self, configuration_id: i32) -> DomainResult<Vec<String>> {
        let rows: Vec<String> = sqlx::query_scalar(
            r#"SELECT "userGroupsId" FROM "configurations_user_groups_user-groups"
               WHERE "configurationsId" = $1"#,
        )
        .bind(configuration_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn set_group_ids(
        &self,
        configuration_id: i32,
        group_ids: &[String],
    ) -> DomainResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"DELETE FROM "configurations_user_groups_user-groups" WHERE "configurationsId" = $1"#,
        )
        .bind(configuration_id)
        .execute(&mut *tx)
        .await?;

        for group_id in group_ids {
            sqlx::query(
                r#"INSERT INTO "configurations_user_groups_user-groups"
                       ("configurationsId", "userGroupsId")
                   VALUES ($1, $2)"#,
            )
            .bind(configuration_id)
            .bind(group_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

pub struct PgConfigurationUserStore {
    pool: PgPool,
}

impl PgConfigurationUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConfigurationUserStore for PgConfigurationUserStore {
    async fn find(
        &self,
        configuration_id: i32,
        user_id: &str,
    ) -> DomainResult<Option<ConfigurationUser>> {
        let row = sqlx::query_as::<_, ConfigurationUser>(
            r#"SELECT * FROM "configurations_users"
               WHERE "configurationId" = $1 AND "userId" = $2"#,
        )
        .bind(configuration_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn upsert_values(
        &self,
        configuration_id: i32,
        user_id: &str,
        values: Value,
    ) -> DomainResult<ConfigurationUser> {
        if let Some(existing) = self.find(configuration_id, user_id).await? {
            let row = sqlx::query_as::<_, ConfigurationUser>(
                r#"UPDATE "configurations_users" SET "values" = $2 WHERE "id" = $1 RETURNING *"#,
            )
            .bind(existing.id)
            .bind(values)
            .fetch_one(&self.pool)
            .await?;

            return Ok(row);
        }

        let row = sqlx::query_as::<_, ConfigurationUser>(
            r#"INSERT INTO "configurations_users" ("configurationId", "userId", "values")
               VALUES ($1, $2, $3)
               RETURNING *"#,
        )
        .bind(configuration_id)
        .bind(user_id)
        .bind(values)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }
}
