use std::sync::Arc;

use async_trait::async_trait;

use crate::database::models::{Message, User, MESSAGE_RATINGS};
use crate::dispatch::{Handler, Request};
use crate::domain::chat::{ConversationStore, MessageStore};
use crate::domain::{DomainError, DomainResult};

pub struct RateMessage {
    pub conversation_id: i32,
    pub message_id: i32,
    pub user: User,
    pub rating: String,
}

impl Request for RateMessage {
    type Response = RateMessageResponse;
}

pub struct RateMessageResponse {
    pub message: Message,
}

pub struct RateMessageHandler {
    conversations: Arc<dyn ConversationStore>,
    messages: Arc<dyn MessageStore>,
}

impl RateMessageHandler {
    pub fn new(conversations: Arc<dyn ConversationStore>, messages: Arc<dyn MessageStore>) -> Self {
        Self {
            conversations,
            messages,
        }
    }
}

#[async_trait]
impl Handler<RateMessage> for RateMessageHandler {
    async fn handle(&self, command: RateMessage) -> DomainResult<RateMessageResponse> {
        let RateMessage { conversation_id, message_id, user, rating } = command;

        if !MESSAGE_RATINGS.contains(&rating.as_str()) {
            return Err(DomainError::validation(format!("Unknown rating '{rating}'")));
        }

        let conversation = self.conversations.find(conversation_id).await?.ok_or_else(|| {
            DomainError::not_found(format!("Conversation {conversation_id} was not found"))
        })?;

        if conversation.user_id != user.id {
            return Err(DomainError::forbidden("Conversation belongs to another user"));
        }

        let message = self
            .messages
            .find(message_id)
            .await?
            .filter(|m| m.conversation_id == conversation_id)
            .ok_or_else(|| {
                DomainError::not_found(format!("Message {message_id} was not found"))
            })?;

        let message = self.messages.set_rating(message.id, &rating).await?;

        Ok(RateMessageResponse { message })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::domain::chat::NewMessage;
    use crate::testing::{fake_user, InMemoryConversationStore, InMemoryMessageStore};

    #[tokio::test]
    async fn rejects_a_message_from_another_conversation() {
        let conversations = Arc::new(InMemoryConversationStore::default());
        let messages = Arc::new(InMemoryMessageStore::default());
        let mine = conversations.seed("u1", 1, Some("mine")).await;
        let other = conversations.seed("u1", 1, Some("other")).await;
        let foreign_message = messages
            .insert(NewMessage {
                conversation_id: other.id,
                message_type: "ai".to_string(),
                data: json!({"content": "hi"}),
                error: None,
                sources: None,
                parent_id: None,
            })
            .await
            .unwrap();

        let handler = RateMessageHandler::new(conversations, messages);
        let result = handler
            .handle(RateMessage {
                conversation_id: mine.id,
                message_id: foreign_message.id,
                user: fake_user("u1"),
                rating: "good".to_string(),
            })
            .await;

        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn stores_a_valid_rating() {
        let conversations = Arc::new(InMemoryConversationStore::default());
        let messages = Arc::new(InMemoryMessageStore::default());
        let conversation = conversations.seed("u1", 1, Some("mine")).await;
        let message = messages
            .insert(NewMessage {
                conversation_id: conversation.id,
                message_type: "ai".to_string(),
                data: json!({"content": "hi"}),
                error: None,
                sources: None,
                parent_id: None,
            })
            .await
            .unwrap();

        let handler = RateMessageHandler::new(conversations, messages);
        let response = handler
            .handle(RateMessage {
                conversation_id: conversation.id,
                message_id: message.id,
                user: fake_user("u1"),
                rating: "good".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(response.message.rating.as_deref(), Some("good"));
    }
}
