use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::auth;
use crate::database::models::User;
use crate::dispatch::{Handler, Request};
use crate::domain::users::{NewUser, UserStore};
use crate::domain::{DomainError, DomainResult};

pub struct UserValues {
    pub name: String,
    pub email: String,
    pub password: Option<String>,
    pub api_key: Option<String>,
    pub user_group_id: Option<String>,
}

pub struct CreateUser {
    pub values: UserValues,
}

impl Request for CreateUser {
    type Response = CreateUserResponse;
}

pub struct CreateUserResponse {
    pub user: User,
}

pub struct CreateUserHandler {
    users: Arc<dyn UserStore>,
}

impl CreateUserHandler {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl Handler<CreateUser> for CreateUserHandler {
    async fn handle(&self, command: CreateUser) -> DomainResult<CreateUserResponse> {
        let UserValues { name, email, password, api_key, user_group_id } = command.values;

        if name.trim().is_empty() {
            return Err(DomainError::validation("Name must not be empty."));
        }
        if !email.contains('@') {
            return Err(DomainError::validation("Email is not valid."));
        }

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(DomainError::conflict("A user with this email already exists."));
        }

        let password_hash = match password {
            Some(password) => Some(auth::hash_password(&password)?),
            None => None,
        };

        let user = self
            .users
            .insert(NewUser {
                id: Uuid::new_v4().to_string(),
                name,
                email,
                api_key,
                password_hash,
                user_group_id,
            })
            .await?;

        Ok(CreateUserResponse { user })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryUserStore;

    fn values(email: &str) -> UserValues {
        UserValues {
            name: "Jo".to_string(),
            email: email.to_string(),
            password: Some("secret".to_string()),
            api_key: None,
            user_group_id: None,
        }
    }

    #[tokio::test]
    async fn creates_a_user_with_a_hashed_password() {
        let users = Arc::new(InMemoryUserStore::default());
        let handler = CreateUserHandler::new(users.clone());

        let response = handler
            .handle(CreateUser { values: values("jo@example.com") })
            .await
            .unwrap();

        let stored = users.find(&response.user.id).await.unwrap().unwrap();
        let hash = stored.password_hash.expect("password must be hashed");
        assert_ne!(hash, "secret");
        assert!(auth::verify_password("secret", &hash));
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let users = Arc::new(InMemoryUserStore::default());
        let handler = CreateUserHandler::new(users);

        handler
            .handle(CreateUser { values: values("jo@example.com") })
            .await
            .unwrap();
        let result = handler
            .handle(CreateUser { values: values("jo@example.com") })
            .await;

        assert!(matches!(result, Err(DomainError::Conflict(_))));
    }
}
