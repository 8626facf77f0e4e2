use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::database::models::{Conversation, User};
use crate::dispatch::{Handler, Request};
use crate::domain::chat::{ConversationStore, NewConversation};
use crate::domain::extensions::ConfigurationStore;
use crate::domain::{DomainError, DomainResult};

#[derive(Default)]
pub struct StartConversationValues {
    pub configuration_id: Option<i32>,
    pub name: Option<String>,
    pub llm: Option<String>,
    pub context: Option<Value>,
    pub extension_user_arguments: Option<Value>,
}

pub struct StartConversation {
    pub user: User,
    pub values: StartConversationValues,
}

impl Request for StartConversation {
    type Response = StartConversationResponse;
}

pub struct StartConversationResponse {
    pub conversation: Conversation,
}

pub struct StartConversationHandler {
    conversations: Arc<dyn ConversationStore>,
    configurations: Arc<dyn ConfigurationStore>,
}

impl StartConversationHandler {
    pub fn new(
        conversations: Arc<dyn ConversationStore>,
        configurations: Arc<dyn ConfigurationStore>,
    ) -> Self {
        Self {
            conversations,
            configurations,
        }
    }
}

#[async_trait]
impl Handler<StartConversation> for StartConversationHandler {
    async fn handle(&self, command: StartConversation) -> DomainResult<StartConversationResponse> {
        let StartConversation { user, values } = command;

        let configuration = match values.configuration_id {
            Some(id) => self
                .configurations
                .find(id)
                .await?
                .ok_or_else(|| DomainError::validation("Configuration does not exist."))?,
            // Without an explicit choice, the first enabled configuration wins.
            None => self
                .configurations
                .list()
                .await?
                .into_iter()
                .find(|c| c.enabled)
                .ok_or_else(|| DomainError::validation("No enabled configuration available."))?,
        };

        if !configuration.enabled {
            return Err(DomainError::validation("Configuration is not enabled."));
        }

        let conversation = self
            .conversations
            .insert(NewConversation {
                user_id: user.id,
                configuration_id: configuration.id,
                name: values.name,
                llm: values.llm,
                context: values.context,
                extension_user_arguments: values.extension_user_arguments,
            })
            .await?;

        Ok(StartConversationResponse { conversation })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fake_user, InMemoryConfigurationStore, InMemoryConversationStore};

    #[tokio::test]
    async fn starting_with_a_disabled_configuration_is_rejected() {
        let conversations = Arc::new(InMemoryConversationStore::default());
        let configurations = Arc::new(InMemoryConfigurationStore::default());
        let configuration = configurations.seed("test", false).await;

        let handler = StartConversationHandler::new(conversations, configurations);
        let result = handler
            .handle(StartConversation {
                user: fake_user("u1"),
                values: StartConversationValues {
                    configuration_id: Some(configuration.id),
                    ..Default::default()
                },
            })
            .await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn falls_back_to_the_first_enabled_configuration() {
        let conversations = Arc::new(InMemoryConversationStore::default());
        let configurations = Arc::new(InMemoryConfigurationStore::default());
        configurations.seed("off", false).await;
        let enabled = configurations.seed("on", true).await;

        let handler = StartConversationHandler::new(conversations, configurations);
        let response = handler
            .handle(StartConversation {
                user: fake_user("u1"),
                values: StartConversationValues::default(),
            })
            .await
            .unwrap();

        assert_eq!(response.conversation.configuration_id, enabled.id);
        assert_eq!(response.conversation.user_id, "u1");
    }
}
