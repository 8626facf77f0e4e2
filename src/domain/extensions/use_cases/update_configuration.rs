use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::database::models::Configuration;
use crate::dispatch::{Handler, Request};
use crate::domain::extensions::ConfigurationStore;
use crate::domain::{DomainError, DomainResult};

use super::ConfigurationValues;

pub struct UpdateConfiguration {
    pub id: i32,
    pub values: ConfigurationValues,
}

impl Request for UpdateConfiguration {
    type Response = UpdateConfigurationResponse;
}

pub struct UpdateConfigurationResponse {
    pub configuration: Configuration,
}

pub struct UpdateConfigurationHandler {
    configurations: Arc<dyn ConfigurationStore>,
}

impl UpdateConfigurationHandler {
    pub fn new(configurations: Arc<dyn ConfigurationStore>) -> Self {
        Self { configurations }
    }
}

#[async_trait]
impl Handler<UpdateConfiguration> for UpdateConfigurationHandler {
    async fn handle(
        &self,
        command: UpdateConfiguration,
    ) -> DomainResult<UpdateConfigurationResponse> {
        let UpdateConfiguration { id, values } = command;

        let mut entity = self
            .configurations
            .find(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Configuration {id} was not found")))?;

        if values.name.trim().is_empty() {
            return Err(DomainError::validation("Name must not be empty."));
        }

        if let Some(headers) = &values.executor_headers {
            if serde_json::from_str::<Value>(headers).is_err() {
                return Err(DomainError::validation(
                    "Executor headers must be a JSON object.",
                ));
            }
        }

        entity.name = values.name;
        entity.enabled = values.enabled;
        entity.agent_name = values.agent_name;
        entity.chat_footer = values.chat_footer;
        entity.chat_suggestions = values.chat_suggestions;
        entity.executor_endpoint = values.executor_endpoint;
        entity.executor_headers = values.executor_headers;

        let configuration = self.configurations.update(&entity).await?;

        self.configurations
            .set_group_ids(configuration.id, &values.user_group_ids)
            .await?;

        Ok(UpdateConfigurationResponse { configuration })
    }
}
