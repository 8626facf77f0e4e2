use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::models::UserGroup;
use crate::domain::users::{NewUserGroup, UserGroupStore};
use crate::domain::DomainResult;

pub struct PgUserGroupStore {
    pool: PgPool,
}

impl PgUserGroupStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserGroupStore for PgUserGroupStore {
    async fn find(&self, id: &str) -> DomainResult<Option<UserGroup>> {
        let row = sqlx::query_as::<_, UserGroup>(r#"SELECT * FROM "user-groups" WHERE "id" = $1"#)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn list(&self) -> DomainResult<Vec<UserGroup>> {
        let rows =
            sqlx::query_as::<_, UserGroup>(r#"SELECT * FROM "user-groups" ORDER BY "name" ASC"#)
                .fetch_all(&self.pool)
                .await?;

        Ok(rows)
    }

    async fn insert(&self, group: NewUserGroup) -> DomainResult<UserGroup> {
        let row = sqlx::query_as::<_, UserGroup>(
            r#"INSERT INTO "user-groups"
                   ("id", "name", "isAdmin", "isBuiltIn", "monthlyTokens", "monthlyUserTokens")
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING *"#,
        )
        .bind(group.id)
        .bind(group.name)
        .bind(group.is_admin)
        .bind(group.is_built_in)
        .bind(group.monthly_tokens)
        .bind(group.monthly_user_tokens)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update(&self, group: &UserGroup) -> DomainResult<UserGroup> {
        let row = sqlx::query_as::<_, UserGroup>(
            r#"UPDATE "user-groups"
               SET "name" = $2,
                   "isAdmin" = $3,
                   "monthlyTokens" = $4,
                   "monthlyUserTokens" = $5,
                   "updatedAt" = now()
               WHERE "id" = $1
               RETURNING *"#,
        )
        .bind(&group.id)
        .bind(&group.name)
        .bind(group.is_admin)
        .bind(group.monthly_tokens)
        .bind(group.monthly_user_tokens)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        sqlx::query(r#"DELETE FROM "user-groups" WHERE "id" = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
