use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    Extension,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::domain::settings::use_cases::{
    GetBlob, GetSettings, SettingValues, UpdateSettings, UploadBlob,
};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;

use super::ensure_admin;

/// GET /settings - public, the login page needs the theme
pub async fn get_settings(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let response = state.dispatcher.dispatch(GetSettings).await?;

    Ok(Json(json!(response.settings)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsBody {
    pub language: Option<String>,
    pub name: Option<String>,
    pub primary_color: Option<String>,
    pub primary_content_color: Option<String>,
    pub welcome_text: Option<String>,
    pub custom_css: Option<String>,
    pub agent_name: Option<String>,
    pub chat_footer: Option<String>,
    pub chat_suggestions: Option<Value>,
    pub site_links: Option<Value>,
    pub logo: Option<String>,
    pub background_logo: Option<String>,
    pub avatar_logo: Option<String>,
}

/// PUT /api/settings - admin only
pub async fn update_settings(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<SettingsBody>,
) -> Result<Json<Value>, ApiError> {
    ensure_admin(&auth)?;

    let response = state
        .dispatcher
        .dispatch(UpdateSettings {
            values: SettingValues {
                language: body.language,
                name: body.name,
                primary_color: body.primary_color,
                primary_content_color: body.primary_content_color,
                welcome_text: body.welcome_text,
                custom_css: body.custom_css,
                agent_name: body.agent_name,
                chat_footer: body.chat_footer,
                chat_suggestions: body.chat_suggestions,
                site_links: body.site_links,
                logo: body.logo,
                background_logo: body.background_logo,
                avatar_logo: body.avatar_logo,
            },
        })
        .await?;

    Ok(Json(json!(response.settings)))
}

/// GET /blobs/:id - public, serves logos and other appearance assets
pub async fn get_blob(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let response = state.dispatcher.dispatch(GetBlob { id }).await?;
    let blob = response.blob;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, blob.content_type)],
        blob.buffer,
    )
        .into_response())
}

/// PUT /api/blobs/:id - admin only, raw request body upload
pub async fn upload_blob(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    ensure_admin(&auth)?;

    let mime_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();

    state
        .dispatcher
        .dispatch(UploadBlob {
            id,
            buffer: body.to_vec(),
            mime_type,
        })
        .await?;

    Ok(Json(json!({ "uploaded": true })))
}
