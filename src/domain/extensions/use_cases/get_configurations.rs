use std::sync::Arc;

use async_trait::async_trait;

use crate::database::models::{Configuration, User};
use crate::dispatch::{Handler, Request};
use crate::domain::extensions::ConfigurationStore;
use crate::domain::DomainResult;

pub struct GetConfigurations {
    pub user: User,
    /// When set, only enabled configurations the user's group may use.
    pub assigned_only: bool,
}

impl Request for GetConfigurations {
    type Response = GetConfigurationsResponse;
}

pub struct GetConfigurationsResponse {
    pub configurations: Vec<Configuration>,
}

pub struct GetConfigurationsHandler {
    configurations: Arc<dyn ConfigurationStore>,
}

impl GetConfigurationsHandler {
    pub fn new(configurations: Arc<dyn ConfigurationStore>) -> Self {
        Self { configurations }
    }
}

#[async_trait]
impl Handler<GetConfigurations> for GetConfigurationsHandler {
    async fn handle(&self, query: GetConfigurations) -> DomainResult<GetConfigurationsResponse> {
        let GetConfigurations { user, assigned_only } = query;

        let all = self.configurations.list().await?;

        if !assigned_only {
            return Ok(GetConfigurationsResponse { configurations: all });
        }

        let mut configurations = Vec::new();
        for configuration in all {
            if !configuration.enabled {
                continue;
            }

            // No group assignment means visible to everyone.
            let group_ids = self.configurations.group_ids(configuration.id).await?;
            let visible = group_ids.is_empty()
                || user
                    .user_group_id
                    .as_ref()
                    .is_some_and(|id| group_ids.contains(id));

            if visible {
                configurations.push(configuration);
            }
        }

        Ok(GetConfigurationsResponse { configurations })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fake_user_in_group, InMemoryConfigurationStore};

    #[tokio::test]
    async fn assigned_only_respects_group_visibility() {
        let configurations = Arc::new(InMemoryConfigurationStore::default());
        let open = configurations.seed("open", true).await;
        let restricted = configurations.seed("restricted", true).await;
        let disabled = configurations.seed("disabled", false).await;
        configurations
            .set_group_ids(restricted.id, &["g2".to_string()])
            .await
            .unwrap();

        let handler = GetConfigurationsHandler::new(configurations);
        let response = handler
            .handle(GetConfigurations {
                user: fake_user_in_group("u1", Some("g1")),
                assigned_only: true,
            })
            .await
            .unwrap();

        let ids: Vec<i32> = response.configurations.iter().map(|c| c.id).collect();
        assert!(ids.contains(&open.id));
        assert!(!ids.contains(&restricted.id));
        assert!(!ids.contains(&disabled.id));
    }
}
