//! Session-based authentication.
//!
//! Login exchanges email + password for an opaque bearer token. Only the
//! SHA-256 fingerprint of the token is stored (as the `sessions` row id),
//! so a leaked sessions table does not leak usable tokens.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config;
use crate::database::models::{Session, User};
use crate::domain::users::{SessionStore, UserStore};
use crate::domain::{DomainError, DomainResult};

pub fn hash_password(plain: &str) -> DomainResult<String> {
    bcrypt::hash(plain, config::config().auth.bcrypt_cost)
        .map_err(|e| DomainError::internal(format!("failed to hash password: {e}")))
}

pub fn verify_password(plain: &str, hash: &str) -> bool {
    bcrypt::verify(plain, hash).unwrap_or(false)
}

/// SHA-256 hex fingerprint of a bearer token.
pub fn token_fingerprint(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionValue {
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

/// Creates a session row and returns the raw bearer token.
pub async fn issue_session(sessions: &dyn SessionStore, user: &User) -> DomainResult<String> {
    let token = Uuid::new_v4().simple().to_string();

    let value = SessionValue {
        user_id: user.id.clone(),
        created_at: Utc::now(),
    };
    let session = Session {
        id: token_fingerprint(&token),
        value: serde_json::to_string(&value)
            .map_err(|e| DomainError::internal(format!("failed to serialize session: {e}")))?,
    };

    sessions.insert(&session).await?;

    Ok(token)
}

/// Resolves a bearer token to its user. Expired or malformed sessions are
/// removed and treated as absent.
pub async fn resolve_session(
    sessions: &dyn SessionStore,
    users: &dyn UserStore,
    token: &str,
) -> DomainResult<Option<User>> {
    let id = token_fingerprint(token);

    let session = match sessions.find(&id).await? {
        Some(session) => session,
        None => return Ok(None),
    };

    let value: SessionValue = match serde_json::from_str(&session.value) {
        Ok(value) => value,
        Err(_) => {
            sessions.delete(&id).await?;
            return Ok(None);
        }
    };

    let ttl = Duration::hours(config::config().auth.session_ttl_hours as i64);
    if Utc::now() - value.created_at > ttl {
        sessions.delete(&id).await?;
        return Ok(None);
    }

    users.find(&value.user_id).await
}

pub async fn drop_session(sessions: &dyn SessionStore, token: &str) -> DomainResult<()> {
    sessions.delete(&token_fingerprint(token)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{InMemorySessionStore, InMemoryUserStore};

    #[test]
    fn password_hashes_verify_and_differ_from_plaintext() {
        let hash = hash_password("secret").unwrap();
        assert_ne!(hash, "secret");
        assert!(verify_password("secret", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn fingerprint_is_stable_and_opaque() {
        let a = token_fingerprint("token");
        let b = token_fingerprint("token");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, "token");
    }

    #[tokio::test]
    async fn issued_sessions_resolve_to_their_user() {
        let sessions = InMemorySessionStore::default();
        let users = InMemoryUserStore::default();
        let user = users.seed("u1", "jo@example.com", None).await;

        let token = issue_session(&sessions, &user).await.unwrap();
        let resolved = resolve_session(&sessions, &users, &token).await.unwrap();

        assert_eq!(resolved.map(|u| u.id), Some("u1".to_string()));
    }

    #[tokio::test]
    async fn dropped_sessions_stop_resolving() {
        let sessions = InMemorySessionStore::default();
        let users = InMemoryUserStore::default();
        let user = users.seed("u1", "jo@example.com", None).await;

        let token = issue_session(&sessions, &user).await.unwrap();
        drop_session(&sessions, &token).await.unwrap();

        let resolved = resolve_session(&sessions, &users, &token).await.unwrap();
        assert!(resolved.is_none());
    }

    #[tokio::test]
    async fn unknown_tokens_resolve_to_none() {
        let sessions = InMemorySessionStore::default();
        let users = InMemoryUserStore::default();

        let resolved = resolve_session(&sessions, &users, "bogus").await.unwrap();
        assert!(resolved.is_none());
    }
}
