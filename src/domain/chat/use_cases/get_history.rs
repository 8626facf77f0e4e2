use std::sync::Arc;

use async_trait::async_trait;

use crate::database::models::{Message, User};
use crate::dispatch::{Handler, Request};
use crate::domain::chat::{ConversationStore, MessageStore};
use crate::domain::{DomainError, DomainResult};

/// Messages of one owned conversation, oldest first.
pub struct GetHistory {
    pub conversation_id: i32,
    pub user: User,
    pub limit: i64,
}

impl Request for GetHistory {
    type Response = GetHistoryResponse;
}

pub struct GetHistoryResponse {
    pub messages: Vec<Message>,
}

pub struct GetHistoryHandler {
    conversations: Arc<dyn ConversationStore>,
    messages: Arc<dyn MessageStore>,
}

impl GetHistoryHandler {
    pub fn new(conversations: Arc<dyn ConversationStore>, messages: Arc<dyn MessageStore>) -> Self {
        Self {
            conversations,
            messages,
        }
    }
}

#[async_trait]
impl Handler<GetHistory> for GetHistoryHandler {
    async fn handle(&self, query: GetHistory) -> DomainResult<GetHistoryResponse> {
        let GetHistory { conversation_id, user, limit } = query;

        let conversation = self.conversations.find(conversation_id).await?.ok_or_else(|| {
            DomainError::not_found(format!("Conversation {conversation_id} was not found"))
        })?;

        if conversation.user_id != user.id {
            return Err(DomainError::forbidden("Conversation belongs to another user"));
        }

        let messages = self
            .messages
            .list_for_conversation(conversation_id, limit)
            .await?;

        Ok(GetHistoryResponse { messages })
    }
}
