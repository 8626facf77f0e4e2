use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::models::User;
use crate::domain::users::{NewUser, UserPage, UserStore};
use crate::domain::DomainResult;

pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find(&self, id: &str) -> DomainResult<Option<User>> {
        let row = sqlx::query_as::<_, User>(r#"SELECT * FROM "users" WHERE "id" = $1"#)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let row = sqlx::query_as::<_, User>(r#"SELECT * FROM "users" WHERE "email" = $1"#)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn find_by_api_key(&self, api_key: &str) -> DomainResult<Option<User>> {
        let row = sqlx::query_as::<_, User>(r#"SELECT * FROM "users" WHERE "apiKey" = $1"#)
            .bind(api_key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn list(&self, page: i64, page_size: i64) -> DomainResult<UserPage> {
        let items = sqlx::query_as::<_, User>(
            r#"SELECT * FROM "users" ORDER BY "createdAt" ASC LIMIT $1 OFFSET $2"#,
        )
        .bind(page_size)
        .bind(page * page_size)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM "users""#)
            .fetch_one(&self.pool)
            .await?;

        Ok(UserPage { items, total })
    }

    async fn insert(&self, user: NewUser) -> DomainResult<User> {
        let row = sqlx::query_as::<_, User>(
            r#"INSERT INTO "users" ("id", "name", "email", "apiKey", "passwordHash", "userGroupId")
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING *"#,
        )
        .bind(user.id)
        .bind(user.name)
        .bind(user.email)
        .bind(user.api_key)
        .bind(user.password_hash)
        .bind(user.user_group_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update(&self, user: &User) -> DomainResult<User> {
        let row = sqlx::query_as::<_, User>(
            r#"UPDATE "users"
               SET "name" = $2,
                   "email" = $3,
                   "apiKey" = $4,
                   "passwordHash" = $5,
                   "userGroupId" = $6,
                   "updatedAt" = now()
               WHERE "id" = $1
               RETURNING *"#,
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.api_key)
        .bind(&user.password_hash)
        .bind(&user.user_group_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn count_in_group(&self, user_group_id: &str) -> DomainResult<i64> {
        let count: i64 =
            sqlx::query_scalar(r#"SELECT COUNT(*) FROM "users" WHERE "userGroupId" = $1"#)
                .bind(user_group_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}
