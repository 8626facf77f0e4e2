use std::sync::Arc;

use async_trait::async_trait;

use crate::database::models::User;
use crate::dispatch::{Handler, Request};
use crate::domain::chat::ConversationStore;
use crate::domain::{DomainError, DomainResult};

pub struct DeleteConversation {
    pub id: i32,
    pub user: User,
}

impl Request for DeleteConversation {
    type Response = DeleteConversationResponse;
}

pub struct DeleteConversationResponse;

pub struct DeleteConversationHandler {
    conversations: Arc<dyn ConversationStore>,
}

impl DeleteConversationHandler {
    pub fn new(conversations: Arc<dyn ConversationStore>) -> Self {
        Self { conversations }
    }
}

#[async_trait]
impl Handler<DeleteConversation> for DeleteConversationHandler {
    async fn handle(&self, command: DeleteConversation) -> DomainResult<DeleteConversationResponse> {
        let DeleteConversation { id, user } = command;

        // Existence first, ownership second. The two errors must never be
        // conflated.
        let entity = self
            .conversations
            .find(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Conversation {id} was not found")))?;

        if entity.user_id != user.id {
            return Err(DomainError::forbidden("Conversation belongs to another user"));
        }

        self.conversations.delete(entity.id).await?;

        Ok(DeleteConversationResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fake_user, InMemoryConversationStore};

    #[tokio::test]
    async fn deletes_an_owned_conversation() {
        let conversations = Arc::new(InMemoryConversationStore::default());
        let user = fake_user("u1");
        let conversation = conversations.seed("u1", 1, Some("chat")).await;

        let handler = DeleteConversationHandler::new(conversations.clone());
        handler
            .handle(DeleteConversation { id: conversation.id, user })
            .await
            .unwrap();

        assert!(conversations.find(conversation.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn foreign_conversation_is_forbidden_and_kept() {
        let conversations = Arc::new(InMemoryConversationStore::default());
        let conversation = conversations.seed("u2", 1, Some("chat")).await;

        let handler = DeleteConversationHandler::new(conversations.clone());
        let result = handler
            .handle(DeleteConversation { id: conversation.id, user: fake_user("u1") })
            .await;

        assert!(matches!(result, Err(DomainError::Forbidden(_))));
        assert!(conversations.find(conversation.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn missing_conversation_is_not_found() {
        let conversations = Arc::new(InMemoryConversationStore::default());

        let handler = DeleteConversationHandler::new(conversations);
        let result = handler
            .handle(DeleteConversation { id: 999, user: fake_user("u1") })
            .await;

        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }
}
