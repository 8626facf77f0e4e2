use std::sync::Arc;

use async_trait::async_trait;

use crate::database::models::Configuration;
use crate::dispatch::{Handler, Request};
use crate::domain::extensions::{
    ConfigurationStore, ExtensionStore, NewConfiguration, NewExtension,
};
use crate::domain::{DomainError, DomainResult};

/// Copies a configuration together with its extensions and group
/// assignment. The copy starts disabled so it can be reviewed first.
pub struct DuplicateConfiguration {
    pub id: i32,
}

impl Request for DuplicateConfiguration {
    type Response = DuplicateConfigurationResponse;
}

pub struct DuplicateConfigurationResponse {
    pub configuration: Configuration,
}

pub struct DuplicateConfigurationHandler {
    configurations: Arc<dyn ConfigurationStore>,
    extensions: Arc<dyn ExtensionStore>,
}

impl DuplicateConfigurationHandler {
    pub fn new(
        configurations: Arc<dyn ConfigurationStore>,
        extensions: Arc<dyn ExtensionStore>,
    ) -> Self {
        Self {
            configurations,
            extensions,
        }
    }
}

#[async_trait]
impl Handler<DuplicateConfiguration> for DuplicateConfigurationHandler {
    async fn handle(
        &self,
        command: DuplicateConfiguration,
    ) -> DomainResult<DuplicateConfigurationResponse> {
        let DuplicateConfiguration { id } = command;

        let source = self
            .configurations
            .find(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Configuration {id} was not found")))?;

        let copy = self
            .configurations
            .insert(NewConfiguration {
                name: format!("{} (copy)", source.name),
                enabled: false,
                agent_name: source.agent_name.clone(),
                chat_footer: source.chat_footer.clone(),
                chat_suggestions: source.chat_suggestions.clone(),
                executor_endpoint: source.executor_endpoint.clone(),
                executor_headers: source.executor_headers.clone(),
            })
            .await?;

        let group_ids = self.configurations.group_ids(source.id).await?;
        self.configurations.set_group_ids(copy.id, &group_ids).await?;

        for extension in self.extensions.list_for_configuration(source.id).await? {
            self.extensions
                .insert(NewExtension {
                    configuration_id: copy.id,
                    name: extension.name.clone(),
                    enabled: extension.enabled,
                    values: extension.values.clone(),
                })
                .await?;
        }

        Ok(DuplicateConfigurationResponse { configuration: copy })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::testing::{InMemoryConfigurationStore, InMemoryExtensionStore};

    #[tokio::test]
    async fn copies_extensions_and_disables_the_copy() {
        let configurations = Arc::new(InMemoryConfigurationStore::default());
        let extensions = Arc::new(InMemoryExtensionStore::default());
        let source = configurations.seed("prod", true).await;
        extensions
            .insert(NewExtension {
                configuration_id: source.id,
                name: "search".to_string(),
                enabled: true,
                values: json!({"bucket": 1}),
            })
            .await
            .unwrap();

        let handler = DuplicateConfigurationHandler::new(configurations, extensions.clone());
        let response = handler
            .handle(DuplicateConfiguration { id: source.id })
            .await
            .unwrap();

        assert!(!response.configuration.enabled);
        assert_eq!(response.configuration.name, "prod (copy)");
        assert_eq!(
            extensions
                .list_for_configuration(response.configuration.id)
                .await
                .unwrap()
                .len(),
            1
        );
    }
}
