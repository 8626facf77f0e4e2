use std::sync::Arc;

use async_trait::async_trait;

use crate::auth;
use crate::database::models::User;
use crate::dispatch::{Handler, Request};
use crate::domain::users::UserStore;
use crate::domain::{DomainError, DomainResult};

#[derive(Default)]
pub struct UserUpdateValues {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub api_key: Option<String>,
    pub user_group_id: Option<String>,
}

pub struct UpdateUser {
    pub id: String,
    pub values: UserUpdateValues,
}

impl Request for UpdateUser {
    type Response = UpdateUserResponse;
}

pub struct UpdateUserResponse {
    pub user: User,
}

pub struct UpdateUserHandler {
    users: Arc<dyn UserStore>,
}

impl UpdateUserHandler {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl Handler<UpdateUser> for UpdateUserHandler {
    async fn handle(&self, command: UpdateUser) -> DomainResult<UpdateUserResponse> {
        let UpdateUser { id, values } = command;

        let mut entity = self
            .users
            .find(&id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User {id} was not found")))?;

        if let Some(email) = &values.email {
            if !email.contains('@') {
                return Err(DomainError::validation("Email is not valid."));
            }
            match self.users.find_by_email(email).await? {
                Some(existing) if existing.id != entity.id => {
                    return Err(DomainError::conflict("A user with this email already exists."));
                }
                _ => entity.email = email.clone(),
            }
        }

        if let Some(name) = values.name {
            entity.name = name;
        }
        if let Some(password) = values.password {
            entity.password_hash = Some(auth::hash_password(&password)?);
        }
        if let Some(api_key) = values.api_key {
            entity.api_key = Some(api_key);
        }
        if let Some(user_group_id) = values.user_group_id {
            entity.user_group_id = Some(user_group_id);
        }

        let user = self.users.update(&entity).await?;

        Ok(UpdateUserResponse { user })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryUserStore;

    #[tokio::test]
    async fn missing_user_is_not_found() {
        let users = Arc::new(InMemoryUserStore::default());
        let handler = UpdateUserHandler::new(users);

        let result = handler
            .handle(UpdateUser {
                id: "missing".to_string(),
                values: UserUpdateValues::default(),
            })
            .await;

        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn claiming_another_users_email_is_a_conflict() {
        let users = Arc::new(InMemoryUserStore::default());
        users.seed("u1", "a@example.com", None).await;
        users.seed("u2", "b@example.com", None).await;

        let handler = UpdateUserHandler::new(users);
        let result = handler
            .handle(UpdateUser {
                id: "u2".to_string(),
                values: UserUpdateValues {
                    email: Some("a@example.com".to_string()),
                    ..Default::default()
                },
            })
            .await;

        assert!(matches!(result, Err(DomainError::Conflict(_))));
    }
}
