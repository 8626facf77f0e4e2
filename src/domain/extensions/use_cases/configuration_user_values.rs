use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::database::models::User;
use crate::dispatch::{Handler, Request};
use crate::domain::extensions::{ConfigurationStore, ConfigurationUserStore};
use crate::domain::{DomainError, DomainResult};

/// Extension values the acting user stored for one configuration.
pub struct GetConfigurationUserValues {
    pub configuration_id: i32,
    pub user: User,
}

impl Request for GetConfigurationUserValues {
    type Response = GetConfigurationUserValuesResponse;
}

pub struct GetConfigurationUserValuesResponse {
    pub values: Option<Value>,
}

pub struct GetConfigurationUserValuesHandler {
    configurations: Arc<dyn ConfigurationStore>,
    configuration_users: Arc<dyn ConfigurationUserStore>,
}

impl GetConfigurationUserValuesHandler {
    pub fn new(
        configurations: Arc<dyn ConfigurationStore>,
        configuration_users: Arc<dyn ConfigurationUserStore>,
    ) -> Self {
        Self {
            configurations,
            configuration_users,
        }
    }
}

#[async_trait]
impl Handler<GetConfigurationUserValues> for GetConfigurationUserValuesHandler {
    async fn handle(
        &self,
        query: GetConfigurationUserValues,
    ) -> DomainResult<GetConfigurationUserValuesResponse> {
        let GetConfigurationUserValues { configuration_id, user } = query;

        self.configurations
            .find(configuration_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(format!("Configuration {configuration_id} was not found"))
            })?;

        let values = self
            .configuration_users
            .find(configuration_id, &user.id)
            .await?
            .map(|entry| entry.values);

        Ok(GetConfigurationUserValuesResponse { values })
    }
}

pub struct UpdateConfigurationUserValues {
    pub configuration_id: i32,
    pub user: User,
    pub values: Value,
}

impl Request for UpdateConfigurationUserValues {
    type Response = UpdateConfigurationUserValuesResponse;
}

pub struct UpdateConfigurationUserValuesResponse {
    pub values: Value,
}

pub struct UpdateConfigurationUserValuesHandler {
    configurations: Arc<dyn ConfigurationStore>,
    configuration_users: Arc<dyn ConfigurationUserStore>,
}

impl UpdateConfigurationUserValuesHandler {
    pub fn new(
        configurations: Arc<dyn ConfigurationStore>,
        configuration_users: Arc<dyn ConfigurationUserStore>,
    ) -> Self {
        Self {
            configurations,
            configuration_users,
        }
    }
}

#[async_trait]
impl Handler<UpdateConfigurationUserValues> for UpdateConfigurationUserValuesHandler {
    async fn handle(
        &self,
        command: UpdateConfigurationUserValues,
    ) -> DomainResult<UpdateConfigurationUserValuesResponse> {
        let UpdateConfigurationUserValues { configuration_id, user, values } = command;

        if !values.is_object() {
            return Err(DomainError::validation("Values must be an object."));
        }

        self.configurations
            .find(configuration_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(format!("Configuration {configuration_id} was not found"))
            })?;

        let entry = self
            .configuration_users
            .upsert_values(configuration_id, &user.id, values)
            .await?;

        Ok(UpdateConfigurationUserValuesResponse { values: entry.values })
    }
}
