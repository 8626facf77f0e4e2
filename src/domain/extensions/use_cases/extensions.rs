use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::database::models::Extension;
use crate::dispatch::{Handler, Request};
use crate::domain::extensions::{ConfigurationStore, ExtensionStore, NewExtension};
use crate::domain::{DomainError, DomainResult};

pub struct GetExtensions {
    pub configuration_id: i32,
}

impl Request for GetExtensions {
    type Response = GetExtensionsResponse;
}

pub struct GetExtensionsResponse {
    pub extensions: Vec<Extension>,
}

pub struct GetExtensionsHandler {
    configurations: Arc<dyn ConfigurationStore>,
    extensions: Arc<dyn ExtensionStore>,
}

impl GetExtensionsHandler {
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
impl Handler<GetExtensions> for GetExtensionsHandler {
    async fn handle(&self, query: GetExtensions) -> DomainResult<GetExtensionsResponse> {
        let GetExtensions { configuration_id } = query;

        self.configurations
            .find(configuration_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(format!("Configuration {configuration_id} was not found"))
            })?;

        let extensions = self
            .extensions
            .list_for_configuration(configuration_id)
            .await?;

        Ok(GetExtensionsResponse { extensions })
    }
}

pub struct ExtensionValues {
    pub name: String,
    pub enabled: bool,
    pub values: Value,
}

pub struct CreateExtension {
    pub configuration_id: i32,
    pub values: ExtensionValues,
}

impl Request for CreateExtension {
    type Response = CreateExtensionResponse;
}

pub struct CreateExtensionResponse {
    pub extension: Extension,
}

pub struct CreateExtensionHandler {
    configurations: Arc<dyn ConfigurationStore>,
    extensions: Arc<dyn ExtensionStore>,
}

impl CreateExtensionHandler {
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
impl Handler<CreateExtension> for CreateExtensionHandler {
    async fn handle(&self, command: CreateExtension) -> DomainResult<CreateExtensionResponse> {
        let CreateExtension { configuration_id, values } = command;

        if values.name.trim().is_empty() {
            return Err(DomainError::validation("Name must not be empty."));
        }
        if !values.values.is_object() {
            return Err(DomainError::validation("Extension values must be an object."));
        }

        self.configurations
            .find(configuration_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(format!("Configuration {configuration_id} was not found"))
            })?;

        let extension = self
            .extensions
            .insert(NewExtension {
                configuration_id,
                name: values.name,
                enabled: values.enabled,
                values: values.values,
            })
            .await?;

        Ok(CreateExtensionResponse { extension })
    }
}

pub struct UpdateExtension {
    pub id: i32,
    pub values: ExtensionValues,
}

impl Request for UpdateExtension {
    type Response = UpdateExtensionResponse;
}

pub struct UpdateExtensionResponse {
    pub extension: Extension,
}

pub struct UpdateExtensionHandler {
    extensions: Arc<dyn ExtensionStore>,
}

impl UpdateExtensionHandler {
    pub fn new(extensions: Arc<dyn ExtensionStore>) -> Self {
        Self { extensions }
    }
}

#[async_trait]
impl Handler<UpdateExtension> for UpdateExtensionHandler {
    async fn handle(&self, command: UpdateExtension) -> DomainResult<UpdateExtensionResponse> {
        let UpdateExtension { id, values } = command;

        let mut entity = self
            .extensions
            .find(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Extension {id} was not found")))?;

        if values.name.trim().is_empty() {
            return Err(DomainError::validation("Name must not be empty."));
        }
        if !values.values.is_object() {
            return Err(DomainError::validation("Extension values must be an object."));
        }

        entity.name = values.name;
        entity.enabled = values.enabled;
        entity.values = values.values;

        let extension = self.extensions.update(&entity).await?;

        Ok(UpdateExtensionResponse { extension })
    }
}

pub struct DeleteExtension {
    pub id: i32,
}

impl Request for DeleteExtension {
    type Response = DeleteExtensionResponse;
}

pub struct DeleteExtensionResponse;

pub struct DeleteExtensionHandler {
    extensions: Arc<dyn ExtensionStore>,
}

impl DeleteExtensionHandler {
    pub fn new(extensions: Arc<dyn ExtensionStore>) -> Self {
        Self { extensions }
    }
}

#[async_trait]
impl Handler<DeleteExtension> for DeleteExtensionHandler {
    async fn handle(&self, command: DeleteExtension) -> DomainResult<DeleteExtensionResponse> {
        let DeleteExtension { id } = command;

        let entity = self
            .extensions
            .find(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Extension {id} was not found")))?;

        self.extensions.delete(entity.id).await?;

        Ok(DeleteExtensionResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::testing::{InMemoryConfigurationStore, InMemoryExtensionStore};

    #[tokio::test]
    async fn creating_against_a_missing_configuration_is_not_found() {
        let configurations = Arc::new(InMemoryConfigurationStore::default());
        let extensions = Arc::new(InMemoryExtensionStore::default());

        let handler = CreateExtensionHandler::new(configurations, extensions);
        let result = handler
            .handle(CreateExtension {
                configuration_id: 99,
                values: ExtensionValues {
                    name: "search".to_string(),
                    enabled: true,
                    values: json!({}),
                },
            })
            .await;

        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn non_object_values_are_rejected() {
        let configurations = Arc::new(InMemoryConfigurationStore::default());
        let extensions = Arc::new(InMemoryExtensionStore::default());
        let configuration = configurations.seed("cfg", true).await;

        let handler = CreateExtensionHandler::new(configurations, extensions);
        let result = handler
            .handle(CreateExtension {
                configuration_id: configuration.id,
                values: ExtensionValues {
                    name: "search".to_string(),
                    enabled: true,
                    values: json!([1, 2]),
                },
            })
            .await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }
}
