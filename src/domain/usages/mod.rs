use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::database::models::Usage;
use crate::domain::DomainResult;

pub mod use_cases;

pub const COUNTER_TOKENS: &str = "tokens";
pub const COUNTER_FILES: &str = "files";

#[async_trait]
pub trait UsageStore: Send + Sync {
    /// Adds `count` to today's counter row, creating it if absent.
    async fn add(
        &self,
        user_id: &str,
        user_group: &str,
        counter: &str,
        key: &str,
        sub_key: &str,
        count: i32,
    ) -> DomainResult<()>;

    /// Counter total for one user in the calendar month containing `at`.
    async fn total_for_user_month(
        &self,
        user_id: &str,
        counter: &str,
        at: DateTime<Utc>,
    ) -> DomainResult<i64>;

    /// Counter total for a whole group in the calendar month containing `at`.
    async fn total_for_group_month(
        &self,
        user_group: &str,
        counter: &str,
        at: DateTime<Utc>,
    ) -> DomainResult<i64>;

    async fn list_for_user(
        &self,
        user_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DomainResult<Vec<Usage>>;
}
