use axum::{
    extract::{Path, State},
    response::Json,
    Extension,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::domain::chat::use_cases::{
    ConversationValues, DeleteConversation, DeleteConversations, DuplicateConversation,
    GetConversation, GetConversations, GetHistory, RateMessage, SendMessage, StartConversation,
    StartConversationValues, UpdateConversation,
};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;

/// GET /api/conversations - recent named conversations of the user
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Value>, ApiError> {
    let response = state
        .dispatcher
        .dispatch(GetConversations::new(auth.user))
        .await?;

    Ok(Json(json!({ "items": response.conversations })))
}

/// GET /api/conversations/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let response = state
        .dispatcher
        .dispatch(GetConversation { id, user: auth.user })
        .await?;

    Ok(Json(json!(response.conversation)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConversationBody {
    pub configuration_id: Option<i32>,
    pub name: Option<String>,
    pub llm: Option<String>,
    pub context: Option<Value>,
    pub extension_user_arguments: Option<Value>,
}

/// POST /api/conversations
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<CreateConversationBody>,
) -> Result<Json<Value>, ApiError> {
    let response = state
        .dispatcher
        .dispatch(StartConversation {
            user: auth.user,
            values: StartConversationValues {
                configuration_id: body.configuration_id,
                name: body.name,
                llm: body.llm,
                context: body.context,
                extension_user_arguments: body.extension_user_arguments,
            },
        })
        .await?;

    Ok(Json(json!(response.conversation)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateConversationBody {
    pub name: Option<String>,
    pub is_name_set_manually: Option<bool>,
    pub llm: Option<String>,
    pub rating: Option<String>,
    pub configuration_id: Option<i32>,
    pub context: Option<Value>,
    pub extension_user_arguments: Option<Value>,
}

/// PATCH /api/conversations/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i32>,
    Json(body): Json<UpdateConversationBody>,
) -> Result<Json<Value>, ApiError> {
    let response = state
        .dispatcher
        .dispatch(UpdateConversation {
            id,
            user: auth.user,
            values: ConversationValues {
                name: body.name,
                is_name_set_manually: body.is_name_set_manually,
                llm: body.llm,
                rating: body.rating,
                configuration_id: body.configuration_id,
                context: body.context,
                extension_user_arguments: body.extension_user_arguments,
            },
        })
        .await?;

    Ok(Json(json!(response.conversation)))
}

/// DELETE /api/conversations/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    state
        .dispatcher
        .dispatch(DeleteConversation { id, user: auth.user })
        .await?;

    Ok(Json(json!({ "deleted": true })))
}

/// DELETE /api/conversations - all conversations of the user
pub async fn delete_all(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Value>, ApiError> {
    let response = state
        .dispatcher
        .dispatch(DeleteConversations { user: auth.user })
        .await?;

    Ok(Json(json!({ "deleted": response.deleted })))
}

/// POST /api/conversations/:id/duplicate
pub async fn duplicate(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let response = state
        .dispatcher
        .dispatch(DuplicateConversation { id, user: auth.user })
        .await?;

    Ok(Json(json!(response.conversation)))
}

/// GET /api/conversations/:id/messages
pub async fn messages(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let response = state
        .dispatcher
        .dispatch(GetHistory {
            conversation_id: id,
            user: auth.user,
            limit: 1000,
        })
        .await?;

    Ok(Json(json!({ "items": response.messages })))
}

#[derive(Debug, Deserialize)]
pub struct SendMessageBody {
    pub query: String,
}

/// POST /api/conversations/:id/messages
pub async fn send_message(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i32>,
    Json(body): Json<SendMessageBody>,
) -> Result<Json<Value>, ApiError> {
    let response = state
        .dispatcher
        .dispatch(SendMessage {
            conversation_id: id,
            user: auth.user,
            query: body.query,
        })
        .await?;

    Ok(Json(json!({
        "userMessage": response.user_message,
        "message": response.message,
    })))
}

#[derive(Debug, Deserialize)]
pub struct RateMessageBody {
    pub rating: String,
}

/// POST /api/conversations/:id/messages/:message_id/rate
pub async fn rate_message(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((id, message_id)): Path<(i32, i32)>,
    Json(body): Json<RateMessageBody>,
) -> Result<Json<Value>, ApiError> {
    let response = state
        .dispatcher
        .dispatch(RateMessage {
            conversation_id: id,
            message_id,
            user: auth.user,
            rating: body.rating,
        })
        .await?;

    Ok(Json(json!(response.message)))
}
