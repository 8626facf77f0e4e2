use axum::{extract::State, http::HeaderMap, response::Json, Extension};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth;
use crate::error::ApiError;
use crate::middleware::{auth::session_token, AuthUser};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

/// POST /auth/login - exchange email + password for a session token
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginBody>,
) -> Result<Json<Value>, ApiError> {
    let user = state.users.find_by_email(&body.email).await?;

    // One error for both failure modes so the endpoint does not confirm
    // which emails exist.
    let invalid = || ApiError::unauthorized("Invalid email or password");

    let user = user.ok_or_else(invalid)?;
    let hash = user.password_hash.clone().ok_or_else(invalid)?;

    if !auth::verify_password(&body.password, &hash) {
        return Err(invalid());
    }

    let token = auth::issue_session(state.sessions.as_ref(), &user).await?;

    Ok(Json(json!({ "token": token, "user": user })))
}

/// POST /auth/logout - drop the current session
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    if let Some(token) = session_token(&headers) {
        auth::drop_session(state.sessions.as_ref(), &token).await?;
    }

    Ok(Json(json!({ "loggedOut": true })))
}

/// GET /api/auth/me - the authenticated principal
pub async fn me(Extension(auth): Extension<AuthUser>) -> Json<Value> {
    Json(json!({ "user": auth.user, "isAdmin": auth.is_admin }))
}
