use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::database::models::Configuration;
use crate::dispatch::{Handler, Request};
use crate::domain::extensions::{ConfigurationStore, NewConfiguration};
use crate::domain::{DomainError, DomainResult};

pub struct ConfigurationValues {
    pub name: String,
    pub enabled: bool,
    pub agent_name: Option<String>,
    pub chat_footer: Option<String>,
    pub chat_suggestions: Option<Value>,
    pub executor_endpoint: Option<String>,
    pub executor_headers: Option<String>,
    pub user_group_ids: Vec<String>,
}

pub struct CreateConfiguration {
    pub values: ConfigurationValues,
}

impl Request for CreateConfiguration {
    type Response = CreateConfigurationResponse;
}

pub struct CreateConfigurationResponse {
    pub configuration: Configuration,
}

pub struct CreateConfigurationHandler {
    configurations: Arc<dyn ConfigurationStore>,
}

impl CreateConfigurationHandler {
    pub fn new(configurations: Arc<dyn ConfigurationStore>) -> Self {
        Self { configurations }
    }
}

#[async_trait]
impl Handler<CreateConfiguration> for CreateConfigurationHandler {
    async fn handle(
        &self,
        command: CreateConfiguration,
    ) -> DomainResult<CreateConfigurationResponse> {
        let ConfigurationValues {
            name,
            enabled,
            agent_name,
            chat_footer,
            chat_suggestions,
            executor_endpoint,
            executor_headers,
            user_group_ids,
        } = command.values;

        if name.trim().is_empty() {
            return Err(DomainError::validation("Name must not be empty."));
        }

        if let Some(headers) = &executor_headers {
            if serde_json::from_str::<Value>(headers).is_err() {
                return Err(DomainError::validation(
                    "Executor headers must be a JSON object.",
                ));
            }
        }

        let configuration = self
            .configurations
            .insert(NewConfiguration {
                name,
                enabled,
                agent_name,
                chat_footer,
                chat_suggestions,
                executor_endpoint,
                executor_headers,
            })
            .await?;

        self.configurations
            .set_group_ids(configuration.id, &user_group_ids)
            .await?;

        Ok(CreateConfigurationResponse { configuration })
    }
}
