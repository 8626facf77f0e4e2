use axum::{
    extract::{Query, State},
    response::Json,
    Extension,
};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::domain::usages::use_cases::GetUsage;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UsageQuery {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// GET /api/usages - usage counters of the authenticated user
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<UsageQuery>,
) -> Result<Json<Value>, ApiError> {
    let to = query.to.unwrap_or_else(Utc::now);
    let from = query.from.unwrap_or(to - Duration::days(30));

    if from > to {
        return Err(ApiError::bad_request("'from' must not be after 'to'"));
    }

    let response = state
        .dispatcher
        .dispatch(GetUsage {
            user: auth.user,
            from,
            to,
        })
        .await?;

    Ok(Json(json!({
        "items": response.usages,
        "monthTokens": response.month_tokens,
    })))
}
