use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::database::models::UserGroup;
use crate::dispatch::{Handler, Request};
use crate::domain::users::{NewUserGroup, UserGroupStore, UserStore};
use crate::domain::{DomainError, DomainResult};

pub struct GetUserGroups;

impl Request for GetUserGroups {
    type Response = GetUserGroupsResponse;
}

pub struct GetUserGroupsResponse {
    pub user_groups: Vec<UserGroup>,
}

pub struct GetUserGroupsHandler {
    user_groups: Arc<dyn UserGroupStore>,
}

impl GetUserGroupsHandler {
    pub fn new(user_groups: Arc<dyn UserGroupStore>) -> Self {
        Self { user_groups }
    }
}

#[async_trait]
impl Handler<GetUserGroups> for GetUserGroupsHandler {
    async fn handle(&self, _query: GetUserGroups) -> DomainResult<GetUserGroupsResponse> {
        let user_groups = self.user_groups.list().await?;

        Ok(GetUserGroupsResponse { user_groups })
    }
}

pub struct UserGroupValues {
    pub name: String,
    pub is_admin: bool,
    pub monthly_tokens: Option<i32>,
    pub monthly_user_tokens: Option<i32>,
}

pub struct CreateUserGroup {
    pub values: UserGroupValues,
}

impl Request for CreateUserGroup {
    type Response = CreateUserGroupResponse;
}

pub struct CreateUserGroupResponse {
    pub user_group: UserGroup,
}

pub struct CreateUserGroupHandler {
    user_groups: Arc<dyn UserGroupStore>,
}

impl CreateUserGroupHandler {
    pub fn new(user_groups: Arc<dyn UserGroupStore>) -> Self {
        Self { user_groups }
    }
}

#[async_trait]
impl Handler<CreateUserGroup> for CreateUserGroupHandler {
    async fn handle(&self, command: CreateUserGroup) -> DomainResult<CreateUserGroupResponse> {
        let UserGroupValues { name, is_admin, monthly_tokens, monthly_user_tokens } =
            command.values;

        if name.trim().is_empty() {
            return Err(DomainError::validation("Name must not be empty."));
        }

        let user_group = self
            .user_groups
            .insert(NewUserGroup {
                id: Uuid::new_v4().to_string(),
                name,
                is_admin,
                is_built_in: false,
                monthly_tokens,
                monthly_user_tokens,
            })
            .await?;

        Ok(CreateUserGroupResponse { user_group })
    }
}

pub struct UpdateUserGroup {
    pub id: String,
    pub values: UserGroupValues,
}

impl Request for UpdateUserGroup {
    type Response = UpdateUserGroupResponse;
}

pub struct UpdateUserGroupResponse {
    pub user_group: UserGroup,
}

pub struct UpdateUserGroupHandler {
    user_groups: Arc<dyn UserGroupStore>,
}

impl UpdateUserGroupHandler {
    pub fn new(user_groups: Arc<dyn UserGroupStore>) -> Self {
        Self { user_groups }
    }
}

#[async_trait]
impl Handler<UpdateUserGroup> for UpdateUserGroupHandler {
    async fn handle(&self, command: UpdateUserGroup) -> DomainResult<UpdateUserGroupResponse> {
        let UpdateUserGroup { id, values } = command;

        let mut entity = self
            .user_groups
            .find(&id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User group {id} was not found")))?;

        if values.name.trim().is_empty() {
            return Err(DomainError::validation("Name must not be empty."));
        }

        // The admin flag of builtin groups is fixed.
        if entity.is_built_in && entity.is_admin != values.is_admin {
            return Err(DomainError::validation(
                "Cannot change the admin flag of a builtin user group.",
            ));
        }

        entity.name = values.name;
        entity.is_admin = values.is_admin;
        entity.monthly_tokens = values.monthly_tokens;
        entity.monthly_user_tokens = values.monthly_user_tokens;

        let user_group = self.user_groups.update(&entity).await?;

        Ok(UpdateUserGroupResponse { user_group })
    }
}

pub struct DeleteUserGroup {
    pub id: String,
}

impl Request for DeleteUserGroup {
    type Response = DeleteUserGroupResponse;
}

pub struct DeleteUserGroupResponse;

pub struct DeleteUserGroupHandler {
    user_groups: Arc<dyn UserGroupStore>,
    users: Arc<dyn UserStore>,
}

impl DeleteUserGroupHandler {
    pub fn new(user_groups: Arc<dyn UserGroupStore>, users: Arc<dyn UserStore>) -> Self {
        Self { user_groups, users }
    }
}

#[async_trait]
impl Handler<DeleteUserGroup> for DeleteUserGroupHandler {
    async fn handle(&self, command: DeleteUserGroup) -> DomainResult<DeleteUserGroupResponse> {
        let DeleteUserGroup { id } = command;

        let entity = self
            .user_groups
            .find(&id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User group {id} was not found")))?;

        if self.users.count_in_group(&entity.id).await? > 0 {
            return Err(DomainError::validation(
                "Cannot delete a user group with existing users.",
            ));
        }

        if entity.is_built_in {
            return Err(DomainError::validation("Cannot delete builtin user group."));
        }

        self.user_groups.delete(&entity.id).await?;

        Ok(DeleteUserGroupResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{InMemoryUserGroupStore, InMemoryUserStore};

    #[tokio::test]
    async fn deleting_a_builtin_group_is_rejected() {
        let user_groups = Arc::new(InMemoryUserGroupStore::default());
        let users = Arc::new(InMemoryUserStore::default());
        user_groups.seed("admin", "Admins", true, None, None).await;
        user_groups.mark_built_in("admin").await;

        let handler = DeleteUserGroupHandler::new(user_groups.clone(), users);
        let result = handler.handle(DeleteUserGroup { id: "admin".to_string() }).await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert!(user_groups.find("admin").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn deleting_a_populated_group_is_rejected() {
        let user_groups = Arc::new(InMemoryUserGroupStore::default());
        let users = Arc::new(InMemoryUserStore::default());
        user_groups.seed("g1", "Team", false, None, None).await;
        users.seed("u1", "a@example.com", Some("g1")).await;

        let handler = DeleteUserGroupHandler::new(user_groups, users);
        let result = handler.handle(DeleteUserGroup { id: "g1".to_string() }).await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn deleting_an_empty_custom_group_works() {
        let user_groups = Arc::new(InMemoryUserGroupStore::default());
        let users = Arc::new(InMemoryUserStore::default());
        user_groups.seed("g1", "Team", false, None, None).await;

        let handler = DeleteUserGroupHandler::new(user_groups.clone(), users);
        handler.handle(DeleteUserGroup { id: "g1".to_string() }).await.unwrap();

        assert!(user_groups.find("g1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn deleting_a_missing_group_is_not_found() {
        let user_groups = Arc::new(InMemoryUserGroupStore::default());
        let users = Arc::new(InMemoryUserStore::default());

        let handler = DeleteUserGroupHandler::new(user_groups, users);
        let result = handler.handle(DeleteUserGroup { id: "nope".to_string() }).await;

        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }
}
