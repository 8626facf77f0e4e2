use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth;
use crate::database::models::User;
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated principal, injected into the request extensions.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user: User,
    pub is_admin: bool,
}

enum Credentials {
    Session(String),
    ApiKey(String),
}

/// Resolves the session token (bearer header or cookie) or API key to a
/// user and injects it as an [`AuthUser`] extension. Requests without a
/// valid principal are rejected.
pub async fn session_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let credentials = extract_credentials(request.headers())
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    let user = match credentials {
        Credentials::Session(token) => {
            auth::resolve_session(state.sessions.as_ref(), state.users.as_ref(), &token).await?
        }
        Credentials::ApiKey(key) => state.users.find_by_api_key(&key).await?,
    };

    let user = user.ok_or_else(|| ApiError::unauthorized("Invalid or expired credentials"))?;

    let is_admin = match &user.user_group_id {
        Some(group_id) => state
            .user_groups
            .find(group_id)
            .await?
            .map(|group| group.is_admin)
            .unwrap_or(false),
        None => false,
    };

    request.extensions_mut().insert(AuthUser { user, is_admin });

    Ok(next.run(request).await)
}

fn extract_credentials(headers: &HeaderMap) -> Option<Credentials> {
    if let Some(value) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
        if let Some(token) = value.strip_prefix("Bearer ") {
            let token = token.trim();
            if !token.is_empty() {
                return Some(Credentials::Session(token.to_string()));
            }
        }
    }

    if let Some(key) = headers.get("x-api-key").and_then(|v| v.to_str().ok()) {
        if !key.trim().is_empty() {
            return Some(Credentials::ApiKey(key.trim().to_string()));
        }
    }

    session_cookie(headers).map(Credentials::Session)
}

/// The raw token from the `session` cookie, if present.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
        if let Some(token) = value.strip_prefix("Bearer ") {
            let token = token.trim();
            if !token.is_empty() {
                return Some(token.to_string());
            }
        }
    }

    session_cookie(headers)
}

fn session_cookie(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get("cookie").and_then(|v| v.to_str().ok())?;

    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == "session" && !value.is_empty() {
            Some(value.to_string())
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn finds_the_session_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "cookie",
            HeaderValue::from_static("theme=dark; session=abc123; lang=en"),
        );
        assert_eq!(session_cookie(&headers), Some("abc123".to_string()));
    }

    #[test]
    fn bearer_token_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer tok"));
        headers.insert("cookie", HeaderValue::from_static("session=other"));
        assert_eq!(session_token(&headers), Some("tok".to_string()));
    }
}
