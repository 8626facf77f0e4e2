use std::sync::Arc;

use async_trait::async_trait;

use crate::dispatch::{Handler, Request};
use crate::domain::extensions::ConfigurationStore;
use crate::domain::{DomainError, DomainResult};

pub struct DeleteConfiguration {
    pub id: i32,
}

impl Request for DeleteConfiguration {
    type Response = DeleteConfigurationResponse;
}

pub struct DeleteConfigurationResponse;

pub struct DeleteConfigurationHandler {
    configurations: Arc<dyn ConfigurationStore>,
}

impl DeleteConfigurationHandler {
    pub fn new(configurations: Arc<dyn ConfigurationStore>) -> Self {
        Self { configurations }
    }
}

#[async_trait]
impl Handler<DeleteConfiguration> for DeleteConfigurationHandler {
    async fn handle(
        &self,
        command: DeleteConfiguration,
    ) -> DomainResult<DeleteConfigurationResponse> {
        let DeleteConfiguration { id } = command;

        let entity = self
            .configurations
            .find(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Configuration {id} was not found")))?;

        self.configurations.delete(entity.id).await?;

        Ok(DeleteConfigurationResponse)
    }
}
