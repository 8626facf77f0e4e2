use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::database::models::{Conversation, User, CONVERSATION_RATINGS};
use crate::dispatch::{Handler, Request};
use crate::domain::chat::{ConversationStore, MessageStore};
use crate::domain::extensions::ConfigurationStore;
use crate::domain::{DomainError, DomainResult};

/// Fields a client may change; `None` leaves the stored value untouched.
#[derive(Default)]
pub struct ConversationValues {
    pub name: Option<String>,
    pub is_name_set_manually: Option<bool>,
    pub llm: Option<String>,
    pub rating: Option<String>,
    pub configuration_id: Option<i32>,
    pub context: Option<Value>,
    pub extension_user_arguments: Option<Value>,
}

pub struct UpdateConversation {
    pub id: i32,
    pub user: User,
    pub values: ConversationValues,
}

impl Request for UpdateConversation {
    type Response = UpdateConversationResponse;
}

pub struct UpdateConversationResponse {
    pub conversation: Conversation,
}

pub struct UpdateConversationHandler {
    conversations: Arc<dyn ConversationStore>,
    messages: Arc<dyn MessageStore>,
    configurations: Arc<dyn ConfigurationStore>,
}

impl UpdateConversationHandler {
    pub fn new(
        conversations: Arc<dyn ConversationStore>,
        messages: Arc<dyn MessageStore>,
        configurations: Arc<dyn ConfigurationStore>,
    ) -> Self {
        Self {
            conversations,
            messages,
            configurations,
        }
    }
}

#[async_trait]
impl Handler<UpdateConversation> for UpdateConversationHandler {
    async fn handle(&self, command: UpdateConversation) -> DomainResult<UpdateConversationResponse> {
        let UpdateConversation { id, user, values } = command;

        // We need the actual conversation for the following validations.
        let mut entity = self
            .conversations
            .find(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Conversation {id} was not found")))?;

        if entity.user_id != user.id {
            return Err(DomainError::forbidden("Conversation belongs to another user"));
        }

        if let Some(rating) = &values.rating {
            if !CONVERSATION_RATINGS.contains(&rating.as_str()) {
                return Err(DomainError::validation(format!("Unknown rating '{rating}'")));
            }
        }

        if let Some(configuration_id) = values.configuration_id {
            let configuration = self
                .configurations
                .find(configuration_id)
                .await?
                .ok_or_else(|| DomainError::validation("Configuration does not exist."))?;

            if !configuration.enabled {
                return Err(DomainError::validation("Configuration is not enabled."));
            }

            let total_messages = self.messages.count_for_conversation(id).await?;

            if total_messages > 0 {
                return Err(DomainError::validation(
                    "Configuration ID cannot be changed after the conversation has been started.",
                ));
            }

            entity.configuration_id = configuration_id;
        }

        // Merge JSON objects key by key so partial context updates do not
        // wipe what other requests stored.
        if let Some(context) = values.context {
            entity.context = Some(merge_objects(entity.context.take(), context));
        }

        if let Some(arguments) = values.extension_user_arguments {
            entity.extension_user_arguments =
                Some(merge_objects(entity.extension_user_arguments.take(), arguments));
        }

        // Assign explicitly to avoid updating unexpected fields.
        if let Some(name) = values.name {
            entity.name = Some(name);
        }
        if let Some(manual) = values.is_name_set_manually {
            entity.is_name_set_manually = manual;
        }
        if let Some(llm) = values.llm {
            entity.llm = Some(llm);
        }
        if let Some(rating) = values.rating {
            entity.rating = Some(rating);
        }

        let conversation = self.conversations.update(&entity).await?;

        Ok(UpdateConversationResponse { conversation })
    }
}

fn merge_objects(existing: Option<Value>, incoming: Value) -> Value {
    match (existing, incoming) {
        (Some(Value::Object(mut base)), Value::Object(incoming)) => {
            for (key, value) in incoming {
                base.insert(key, value);
            }
            Value::Object(base)
        }
        (_, incoming) => incoming,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::domain::chat::NewMessage;
    use crate::testing::{
        fake_user, InMemoryConfigurationStore, InMemoryConversationStore, InMemoryMessageStore,
    };

    fn handler() -> (
        Arc<InMemoryConversationStore>,
        Arc<InMemoryMessageStore>,
        Arc<InMemoryConfigurationStore>,
        UpdateConversationHandler,
    ) {
        let conversations = Arc::new(InMemoryConversationStore::default());
        let messages = Arc::new(InMemoryMessageStore::default());
        let configurations = Arc::new(InMemoryConfigurationStore::default());
        let handler = UpdateConversationHandler::new(
            conversations.clone(),
            messages.clone(),
            configurations.clone(),
        );
        (conversations, messages, configurations, handler)
    }

    #[tokio::test]
    async fn rejects_configuration_change_once_messages_exist() {
        let (conversations, messages, configurations, handler) = handler();
        let conversation = conversations.seed("u1", 1, Some("chat")).await;
        let other = configurations.seed("other", true).await;
        messages
            .insert(NewMessage {
                conversation_id: conversation.id,
                message_type: "human".to_string(),
                data: json!({"content": "hi"}),
                error: None,
                sources: None,
                parent_id: None,
            })
            .await
            .unwrap();

        let result = handler
            .handle(UpdateConversation {
                id: conversation.id,
                user: fake_user("u1"),
                values: ConversationValues {
                    configuration_id: Some(other.id),
                    ..Default::default()
                },
            })
            .await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn merges_context_instead_of_replacing_it() {
        let (conversations, _messages, _configurations, handler) = handler();
        let mut conversation = conversations.seed("u1", 1, Some("chat")).await;
        conversation.context = Some(json!({"a": "1", "b": "2"}));
        conversations.update(&conversation).await.unwrap();

        let response = handler
            .handle(UpdateConversation {
                id: conversation.id,
                user: fake_user("u1"),
                values: ConversationValues {
                    context: Some(json!({"b": "3"})),
                    ..Default::default()
                },
            })
            .await
            .unwrap();

        assert_eq!(
            response.conversation.context,
            Some(json!({"a": "1", "b": "3"}))
        );
    }

    #[tokio::test]
    async fn foreign_conversation_is_forbidden() {
        let (conversations, _messages, _configurations, handler) = handler();
        let conversation = conversations.seed("u2", 1, Some("chat")).await;

        let result = handler
            .handle(UpdateConversation {
                id: conversation.id,
                user: fake_user("u1"),
                values: ConversationValues::default(),
            })
            .await;

        assert!(matches!(result, Err(DomainError::Forbidden(_))));
    }
}
