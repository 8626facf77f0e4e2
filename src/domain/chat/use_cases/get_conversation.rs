use std::sync::Arc;

use async_trait::async_trait;

use crate::database::models::{Conversation, User};
use crate::dispatch::{Handler, Request};
use crate::domain::chat::ConversationStore;
use crate::domain::{DomainError, DomainResult};

pub struct GetConversation {
    pub id: i32,
    pub user: User,
}

impl Request for GetConversation {
    type Response = GetConversationResponse;
}

pub struct GetConversationResponse {
    pub conversation: Conversation,
}

pub struct GetConversationHandler {
    conversations: Arc<dyn ConversationStore>,
}

impl GetConversationHandler {
    pub fn new(conversations: Arc<dyn ConversationStore>) -> Self {
        Self { conversations }
    }
}

#[async_trait]
impl Handler<GetConversation> for GetConversationHandler {
    async fn handle(&self, query: GetConversation) -> DomainResult<GetConversationResponse> {
        let GetConversation { id, user } = query;

        let conversation = self
            .conversations
            .find(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Conversation {id} was not found")))?;

        if conversation.user_id != user.id {
            return Err(DomainError::forbidden("Conversation belongs to another user"));
        }

        Ok(GetConversationResponse { conversation })
    }
}
