use axum::{
    extract::{Path, Query, State},
    response::Json,
    Extension,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::domain::users::use_cases::{
    CreateUser, CreateUserGroup, DeleteUserGroup, GetUserGroups, GetUsers, UpdateUser,
    UpdateUserGroup, UserGroupValues, UserUpdateValues, UserValues,
};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;

use super::ensure_admin;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    #[serde(default)]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

fn default_page_size() -> i64 {
    50
}

/// GET /api/users - admin only
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Value>, ApiError> {
    ensure_admin(&auth)?;

    let response = state
        .dispatcher
        .dispatch(GetUsers {
            page: query.page,
            page_size: query.page_size,
        })
        .await?;

    Ok(Json(json!({ "items": response.users, "total": response.total })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserBody {
    pub name: String,
    pub email: String,
    pub password: Option<String>,
    pub api_key: Option<String>,
    pub user_group_id: Option<String>,
}

/// POST /api/users - admin only
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<UserBody>,
) -> Result<Json<Value>, ApiError> {
    ensure_admin(&auth)?;

    let response = state
        .dispatcher
        .dispatch(CreateUser {
            values: UserValues {
                name: body.name,
                email: body.email,
                password: body.password,
                api_key: body.api_key,
                user_group_id: body.user_group_id,
            },
        })
        .await?;

    Ok(Json(json!(response.user)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdateBody {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub api_key: Option<String>,
    pub user_group_id: Option<String>,
}

/// PUT /api/users/:id - admin only
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(body): Json<UserUpdateBody>,
) -> Result<Json<Value>, ApiError> {
    ensure_admin(&auth)?;

    let response = state
        .dispatcher
        .dispatch(UpdateUser {
            id,
            values: UserUpdateValues {
                name: body.name,
                email: body.email,
                password: body.password,
                api_key: body.api_key,
                user_group_id: body.user_group_id,
            },
        })
        .await?;

    Ok(Json(json!(response.user)))
}

/// GET /api/user-groups - admin only
pub async fn list_groups(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Value>, ApiError> {
    ensure_admin(&auth)?;

    let response = state.dispatcher.dispatch(GetUserGroups).await?;

    Ok(Json(json!({ "items": response.user_groups })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserGroupBody {
    pub name: String,
    #[serde(default)]
    pub is_admin: bool,
    pub monthly_tokens: Option<i32>,
    pub monthly_user_tokens: Option<i32>,
}

impl From<UserGroupBody> for UserGroupValues {
    fn from(body: UserGroupBody) -> Self {
        UserGroupValues {
            name: body.name,
            is_admin: body.is_admin,
            monthly_tokens: body.monthly_tokens,
            monthly_user_tokens: body.monthly_user_tokens,
        }
    }
}

/// POST /api/user-groups - admin only
pub async fn create_group(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<UserGroupBody>,
) -> Result<Json<Value>, ApiError> {
    ensure_admin(&auth)?;

    let response = state
        .dispatcher
        .dispatch(CreateUserGroup { values: body.into() })
        .await?;

    Ok(Json(json!(response.user_group)))
}

/// PUT /api/user-groups/:id - admin only
pub async fn update_group(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(body): Json<UserGroupBody>,
) -> Result<Json<Value>, ApiError> {
    ensure_admin(&auth)?;

    let response = state
        .dispatcher
        .dispatch(UpdateUserGroup { id, values: body.into() })
        .await?;

    Ok(Json(json!(response.user_group)))
}

/// DELETE /api/user-groups/:id - admin only
pub async fn delete_group(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    ensure_admin(&auth)?;

    state.dispatcher.dispatch(DeleteUserGroup { id }).await?;

    Ok(Json(json!({ "deleted": true })))
}
