use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::HeaderMap,
    response::Json,
    Extension,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::domain::files::use_cases::{
    BucketValues, CreateBucket, DeleteBucket, DeleteFile, GetBuckets, GetFiles, UpdateBucket,
    UploadFile,
};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;

use super::ensure_admin;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilesQuery {
    #[serde(default)]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

fn default_page_size() -> i64 {
    50
}

/// GET /api/files - files of the authenticated user
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<FilesQuery>,
) -> Result<Json<Value>, ApiError> {
    let response = state
        .dispatcher
        .dispatch(GetFiles {
            user: auth.user,
            page: query.page,
            page_size: query.page_size,
        })
        .await?;

    Ok(Json(json!({ "items": response.files, "total": response.total })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadQuery {
    pub file_name: String,
}

/// POST /api/files?fileName=... - raw request body upload
pub async fn upload(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<UploadQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let mime_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();

    let response = state
        .dispatcher
        .dispatch(UploadFile {
            user: auth.user,
            file_name: query.file_name,
            mime_type,
            buffer: body.to_vec(),
        })
        .await?;

    Ok(Json(json!(response.file)))
}

/// DELETE /api/files/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    state
        .dispatcher
        .dispatch(DeleteFile { id, user: auth.user })
        .await?;

    Ok(Json(json!({ "deleted": true })))
}

/// GET /api/buckets - admin only
pub async fn list_buckets(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Value>, ApiError> {
    ensure_admin(&auth)?;

    let response = state.dispatcher.dispatch(GetBuckets).await?;

    Ok(Json(json!({ "items": response.buckets })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketBody {
    pub name: String,
    pub endpoint: String,
    pub headers: Option<String>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default = "default_quota")]
    pub per_user_quota: i32,
    pub allowed_file_name_extensions: Option<Vec<String>>,
    pub file_size_limits: Option<Value>,
}

fn default_quota() -> i32 {
    20
}

impl From<BucketBody> for BucketValues {
    fn from(body: BucketBody) -> Self {
        BucketValues {
            name: body.name,
            endpoint: body.endpoint,
            headers: body.headers,
            is_default: body.is_default,
            per_user_quota: body.per_user_quota,
            allowed_file_name_extensions: body.allowed_file_name_extensions,
            file_size_limits: body.file_size_limits,
        }
    }
}

/// POST /api/buckets - admin only
pub async fn create_bucket(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<BucketBody>,
) -> Result<Json<Value>, ApiError> {
    ensure_admin(&auth)?;

    let response = state
        .dispatcher
        .dispatch(CreateBucket { values: body.into() })
        .await?;

    Ok(Json(json!(response.bucket)))
}

/// PUT /api/buckets/:id - admin only
pub async fn update_bucket(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i32>,
    Json(body): Json<BucketBody>,
) -> Result<Json<Value>, ApiError> {
    ensure_admin(&auth)?;

    let response = state
        .dispatcher
        .dispatch(UpdateBucket { id, values: body.into() })
        .await?;

    Ok(Json(json!(response.bucket)))
}

/// DELETE /api/buckets/:id - admin only
pub async fn delete_bucket(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    ensure_admin(&auth)?;

    state.dispatcher.dispatch(DeleteBucket { id }).await?;

    Ok(Json(json!({ "deleted": true })))
}
