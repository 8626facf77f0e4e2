use std::sync::Arc;

use async_trait::async_trait;

use crate::database::models::{Conversation, User};
use crate::dispatch::{Handler, Request};
use crate::domain::chat::{ConversationStore, MessageStore, NewConversation};
use crate::domain::{DomainError, DomainResult};

/// Copies a conversation with its messages for the owning user.
pub struct DuplicateConversation {
    pub id: i32,
    pub user: User,
}

impl Request for DuplicateConversation {
    type Response = DuplicateConversationResponse;
}

pub struct DuplicateConversationResponse {
    pub conversation: Conversation,
}

pub struct DuplicateConversationHandler {
    conversations: Arc<dyn ConversationStore>,
    messages: Arc<dyn MessageStore>,
}

impl DuplicateConversationHandler {
    pub fn new(conversations: Arc<dyn ConversationStore>, messages: Arc<dyn MessageStore>) -> Self {
        Self {
            conversations,
            messages,
        }
    }
}

#[async_trait]
impl Handler<DuplicateConversation> for DuplicateConversationHandler {
    async fn handle(
        &self,
        command: DuplicateConversation,
    ) -> DomainResult<DuplicateConversationResponse> {
        let DuplicateConversation { id, user } = command;

        let source = self
            .conversations
            .find(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Conversation {id} was not found")))?;

        if source.user_id != user.id {
            return Err(DomainError::forbidden("Conversation belongs to another user"));
        }

        let copy = self
            .conversations
            .insert(NewConversation {
                user_id: source.user_id.clone(),
                configuration_id: source.configuration_id,
                name: source.name.clone(),
                llm: source.llm.clone(),
                context: source.context.clone(),
                extension_user_arguments: source.extension_user_arguments.clone(),
            })
            .await?;

        self.messages.copy_to_conversation(source.id, copy.id).await?;

        Ok(DuplicateConversationResponse { conversation: copy })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::domain::chat::NewMessage;
    use crate::testing::{fake_user, InMemoryConversationStore, InMemoryMessageStore};

    #[tokio::test]
    async fn copies_the_conversation_and_its_messages() {
        let conversations = Arc::new(InMemoryConversationStore::default());
        let messages = Arc::new(InMemoryMessageStore::default());
        let source = conversations.seed("u1", 1, Some("original")).await;
        for content in ["hi", "hello"] {
            messages
                .insert(NewMessage {
                    conversation_id: source.id,
                    message_type: "human".to_string(),
                    data: json!({ "content": content }),
                    error: None,
                    sources: None,
                    parent_id: None,
                })
                .await
                .unwrap();
        }

        let handler = DuplicateConversationHandler::new(conversations, messages.clone());
        let response = handler
            .handle(DuplicateConversation { id: source.id, user: fake_user("u1") })
            .await
            .unwrap();

        assert_ne!(response.conversation.id, source.id);
        assert_eq!(response.conversation.name.as_deref(), Some("original"));
        assert_eq!(
            messages
                .count_for_conversation(response.conversation.id)
                .await
                .unwrap(),
            2
        );
    }
}
