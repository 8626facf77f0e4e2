use std::sync::Arc;

use async_trait::async_trait;

use crate::database::models::{Conversation, User};
use crate::dispatch::{Handler, Request};
use crate::domain::chat::ConversationStore;
use crate::domain::DomainResult;

pub struct GetConversations {
    pub user: User,
    pub limit: i64,
}

impl GetConversations {
    pub fn new(user: User) -> Self {
        Self { user, limit: 100 }
    }
}

impl Request for GetConversations {
    type Response = GetConversationsResponse;
}

pub struct GetConversationsResponse {
    pub conversations: Vec<Conversation>,
}

pub struct GetConversationsHandler {
    conversations: Arc<dyn ConversationStore>,
}

impl GetConversationsHandler {
    pub fn new(conversations: Arc<dyn ConversationStore>) -> Self {
        Self { conversations }
    }
}

#[async_trait]
impl Handler<GetConversations> for GetConversationsHandler {
    async fn handle(&self, query: GetConversations) -> DomainResult<GetConversationsResponse> {
        let conversations = self
            .conversations
            .list_for_user(&query.user.id, query.limit)
            .await?;

        Ok(GetConversationsResponse { conversations })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fake_user, InMemoryConversationStore};

    #[tokio::test]
    async fn lists_only_named_conversations_of_the_user() {
        let conversations = Arc::new(InMemoryConversationStore::default());
        conversations.seed("u1", 1, Some("first")).await;
        conversations.seed("u1", 1, None).await; // unnamed, hidden from the list
        conversations.seed("u2", 1, Some("other")).await;

        let handler = GetConversationsHandler::new(conversations);
        let response = handler
            .handle(GetConversations::new(fake_user("u1")))
            .await
            .unwrap();

        assert_eq!(response.conversations.len(), 1);
        assert_eq!(response.conversations[0].name.as_deref(), Some("first"));
    }
}
