use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::database::models::Usage;
use crate::domain::usages::UsageStore;
use crate::domain::DomainResult;

pub struct PgUsageStore {
    pool: PgPool,
}

impl PgUsageStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UsageStore for PgUsageStore {
    async fn add(
        &self,
        user_id: &str,
        user_group: &str,
        counter: &str,
        key: &str,
        sub_key: &str,
        count: i32,
    ) -> DomainResult<()> {
        sqlx::query(
            r#"INSERT INTO "usages" ("date", "userId", "userGroup", "counter", "key", "subKey", "count")
               VALUES (date_trunc('day', now()), $1, $2, $3, $4, $5, $6)
               ON CONFLICT ("date", "userId", "userGroup", "counter", "key", "subKey")
               DO UPDATE SET "count" = "usages"."count" + EXCLUDED."count""#,
        )
        .bind(user_id)
        .bind(user_group)
        .bind(counter)
        .bind(key)
        .bind(sub_key)
        .bind(count)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn total_for_user_month(
        &self,
        user_id: &str,
        counter: &str,
        at: DateTime<Utc>,
    ) -> DomainResult<i64> {
        let total: Option<i64> = sqlx::query_scalar(
            r#"SELECT SUM("count")::bigint FROM "usages"
               WHERE "userId" = $1
                 AND "counter" = $2
                 AND date_trunc('month', "date") = date_trunc('month', $3::timestamptz)"#,
        )
        .bind(user_id)
        .bind(counter)
        .bind(at)
        .fetch_one(&self.pool)
        .await?;

        Ok(total.unwrap_or(0))
    }

    async fn total_for_group_month(
        &self,
        user_group: &str,
        counter: &str,
        at: DateTime<Utc>,
    ) -> DomainResult<i64> {
        let total: Option<i64> = sqlx::query_scalar(
            r#"SELECT SUM("count")::bigint FROM "usages"
               WHERE "userGroup" = $1
                 AND "counter" = $2
                 AND date_trunc('month', "date") = date_trunc('month', $3::timestamptz)"#,
        )
        .bind(user_group)
        .bind(counter)
        .bind(at)
        .fetch_one(&self.pool)
        .await?;

        Ok(total.unwrap_or(0))
    }

    async fn list_for_user(
        &self,
        user_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DomainResult<Vec<Usage>> {
        let rows = sqlx::query_as::<_, Usage>(
            r#"SELECT * FROM "usages"
               WHERE "userId" = $1 AND "date" >= $2 AND "date" <= $3
               ORDER BY "date" ASC"#,
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
