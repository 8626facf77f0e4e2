use std::sync::Arc;

use async_trait::async_trait;

use crate::database::models::User;
use crate::dispatch::{Handler, Request};
use crate::domain::chat::ConversationStore;
use crate::domain::DomainResult;

/// Deletes every conversation of the acting user.
pub struct DeleteConversations {
    pub user: User,
}

impl Request for DeleteConversations {
    type Response = DeleteConversationsResponse;
}

pub struct DeleteConversationsResponse {
    pub deleted: u64,
}

pub struct DeleteConversationsHandler {
    conversations: Arc<dyn ConversationStore>,
}

impl DeleteConversationsHandler {
    pub fn new(conversations: Arc<dyn ConversationStore>) -> Self {
        Self { conversations }
    }
}

#[async_trait]
impl Handler<DeleteConversations> for DeleteConversationsHandler {
    async fn handle(
        &self,
        command: DeleteConversations,
    ) -> DomainResult<DeleteConversationsResponse> {
        let deleted = self.conversations.delete_for_user(&command.user.id).await?;

        Ok(DeleteConversationsResponse { deleted })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fake_user, InMemoryConversationStore};

    #[tokio::test]
    async fn only_the_acting_users_conversations_are_deleted() {
        let conversations = Arc::new(InMemoryConversationStore::default());
        conversations.seed("u1", 1, Some("a")).await;
        conversations.seed("u1", 1, Some("b")).await;
        let kept = conversations.seed("u2", 1, Some("c")).await;

        let handler = DeleteConversationsHandler::new(conversations.clone());
        let response = handler
            .handle(DeleteConversations { user: fake_user("u1") })
            .await
            .unwrap();

        assert_eq!(response.deleted, 2);
        assert!(conversations.find(kept.id).await.unwrap().is_some());
    }
}
