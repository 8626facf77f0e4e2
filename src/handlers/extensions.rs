use axum::{
    extract::{Path, Query, State},
    response::Json,
    Extension,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::domain::extensions::use_cases::{
    ConfigurationValues, CreateConfiguration, CreateExtension, DeleteConfiguration,
    DeleteExtension, DuplicateConfiguration, ExtensionValues, GetConfigurationUserValues,
    GetConfigurations, GetExtensions, UpdateConfiguration, UpdateConfigurationUserValues,
    UpdateExtension,
};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;

use super::ensure_admin;

#[derive(Debug, Deserialize)]
pub struct ConfigurationsQuery {
    /// `assigned=true` restricts the list to enabled configurations the
    /// user's group may use; everything else requires admin access.
    #[serde(default)]
    pub assigned: bool,
}

/// GET /api/configurations
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<ConfigurationsQuery>,
) -> Result<Json<Value>, ApiError> {
    if !query.assigned {
        ensure_admin(&auth)?;
    }

    let response = state
        .dispatcher
        .dispatch(GetConfigurations {
            user: auth.user,
            assigned_only: query.assigned,
        })
        .await?;

    Ok(Json(json!({ "items": response.configurations })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationBody {
    pub name: String,
    #[serde(default)]
    pub enabled: bool,
    pub agent_name: Option<String>,
    pub chat_footer: Option<String>,
    pub chat_suggestions: Option<Value>,
    pub executor_endpoint: Option<String>,
    pub executor_headers: Option<String>,
    #[serde(default)]
    pub user_group_ids: Vec<String>,
}

impl From<ConfigurationBody> for ConfigurationValues {
    fn from(body: ConfigurationBody) -> Self {
        ConfigurationValues {
            name: body.name,
            enabled: body.enabled,
            agent_name: body.agent_name,
            chat_footer: body.chat_footer,
            chat_suggestions: body.chat_suggestions,
            executor_endpoint: body.executor_endpoint,
            executor_headers: body.executor_headers,
            user_group_ids: body.user_group_ids,
        }
    }
}

/// POST /api/configurations - admin only
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<ConfigurationBody>,
) -> Result<Json<Value>, ApiError> {
    ensure_admin(&auth)?;

    let response = state
        .dispatcher
        .dispatch(CreateConfiguration { values: body.into() })
        .await?;

    Ok(Json(json!(response.configuration)))
}

/// PUT /api/configurations/:id - admin only
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i32>,
    Json(body): Json<ConfigurationBody>,
) -> Result<Json<Value>, ApiError> {
    ensure_admin(&auth)?;

    let response = state
        .dispatcher
        .dispatch(UpdateConfiguration { id, values: body.into() })
        .await?;

    Ok(Json(json!(response.configuration)))
}

/// DELETE /api/configurations/:id - admin only
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    ensure_admin(&auth)?;

    state.dispatcher.dispatch(DeleteConfiguration { id }).await?;

    Ok(Json(json!({ "deleted": true })))
}

/// POST /api/configurations/:id/duplicate - admin only
pub async fn duplicate(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    ensure_admin(&auth)?;

    let response = state
        .dispatcher
        .dispatch(DuplicateConfiguration { id })
        .await?;

    Ok(Json(json!(response.configuration)))
}

/// GET /api/configurations/:id/extensions - admin only
pub async fn list_extensions(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    ensure_admin(&auth)?;

    let response = state
        .dispatcher
        .dispatch(GetExtensions { configuration_id: id })
        .await?;

    Ok(Json(json!({ "items": response.extensions })))
}

#[derive(Debug, Deserialize)]
pub struct ExtensionBody {
    pub name: String,
    #[serde(default)]
    pub enabled: bool,
    pub values: Value,
}

impl From<ExtensionBody> for ExtensionValues {
    fn from(body: ExtensionBody) -> Self {
        ExtensionValues {
            name: body.name,
            enabled: body.enabled,
            values: body.values,
        }
    }
}

/// POST /api/configurations/:id/extensions - admin only
pub async fn create_extension(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i32>,
    Json(body): Json<ExtensionBody>,
) -> Result<Json<Value>, ApiError> {
    ensure_admin(&auth)?;

    let response = state
        .dispatcher
        .dispatch(CreateExtension {
            configuration_id: id,
            values: body.into(),
        })
        .await?;

    Ok(Json(json!(response.extension)))
}

/// PUT /api/extensions/:id - admin only
pub async fn update_extension(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i32>,
    Json(body): Json<ExtensionBody>,
) -> Result<Json<Value>, ApiError> {
    ensure_admin(&auth)?;

    let response = state
        .dispatcher
        .dispatch(UpdateExtension { id, values: body.into() })
        .await?;

    Ok(Json(json!(response.extension)))
}

/// DELETE /api/extensions/:id - admin only
pub async fn delete_extension(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    ensure_admin(&auth)?;

    state.dispatcher.dispatch(DeleteExtension { id }).await?;

    Ok(Json(json!({ "deleted": true })))
}

/// GET /api/configurations/:id/user-values
pub async fn get_user_values(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let response = state
        .dispatcher
        .dispatch(GetConfigurationUserValues {
            configuration_id: id,
            user: auth.user,
        })
        .await?;

    Ok(Json(json!({ "values": response.values })))
}

#[derive(Debug, Deserialize)]
pub struct UserValuesBody {
    pub values: Value,
}

/// PUT /api/configurations/:id/user-values
pub async fn update_user_values(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i32>,
    Json(body): Json<UserValuesBody>,
) -> Result<Json<Value>, ApiError> {
    let response = state
        .dispatcher
        .dispatch(UpdateConfigurationUserValues {
            configuration_id: id,
            user: auth.user,
            values: body.values,
        })
        .await?;

    Ok(Json(json!({ "values": response.values })))
}
