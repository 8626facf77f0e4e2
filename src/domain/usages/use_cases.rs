use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::database::models::{Usage, User};
use crate::dispatch::{Handler, Request};
use crate::domain::usages::{UsageStore, COUNTER_TOKENS};
use crate::domain::DomainResult;

/// Usage counters of the acting user in a date range, plus the month's
/// token total.
pub struct GetUsage {
    pub user: User,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl Request for GetUsage {
    type Response = GetUsageResponse;
}

pub struct GetUsageResponse {
    pub usages: Vec<Usage>,
    pub month_tokens: i64,
}

pub struct GetUsageHandler {
    usages: Arc<dyn UsageStore>,
}

impl GetUsageHandler {
    pub fn new(usages: Arc<dyn UsageStore>) -> Self {
        Self { usages }
    }
}

#[async_trait]
impl Handler<GetUsage> for GetUsageHandler {
    async fn handle(&self, query: GetUsage) -> DomainResult<GetUsageResponse> {
        let GetUsage { user, from, to } = query;

        let usages = self.usages.list_for_user(&user.id, from, to).await?;
        let month_tokens = self
            .usages
            .total_for_user_month(&user.id, COUNTER_TOKENS, Utc::now())
            .await?;

        Ok(GetUsageResponse { usages, month_tokens })
    }
}
