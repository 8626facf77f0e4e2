use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;

use crate::config;
use crate::database::models::{Message, User};
use crate::dispatch::{Handler, Request};
use crate::domain::chat::{ChatExecutor, ConversationStore, MessageStore, NewMessage};
use crate::domain::extensions::ConfigurationStore;
use crate::domain::usages::{UsageStore, COUNTER_TOKENS};
use crate::domain::users::UserGroupStore;
use crate::domain::{DomainError, DomainResult};

pub struct SendMessage {
    pub conversation_id: i32,
    pub user: User,
    pub query: String,
}

impl Request for SendMessage {
    type Response = SendMessageResponse;
}

pub struct SendMessageResponse {
    pub user_message: Message,
    pub message: Message,
}

pub struct SendMessageHandler {
    conversations: Arc<dyn ConversationStore>,
    messages: Arc<dyn MessageStore>,
    configurations: Arc<dyn ConfigurationStore>,
    user_groups: Arc<dyn UserGroupStore>,
    usages: Arc<dyn UsageStore>,
    executor: Arc<dyn ChatExecutor>,
}

impl SendMessageHandler {
    pub fn new(
        conversations: Arc<dyn ConversationStore>,
        messages: Arc<dyn MessageStore>,
        configurations: Arc<dyn ConfigurationStore>,
        user_groups: Arc<dyn UserGroupStore>,
        usages: Arc<dyn UsageStore>,
        executor: Arc<dyn ChatExecutor>,
    ) -> Self {
        Self {
            conversations,
            messages,
            configurations,
            user_groups,
            usages,
            executor,
        }
    }

    async fn check_budget(&self, user: &User) -> DomainResult<()> {
        let group_id = match &user.user_group_id {
            Some(id) => id,
            None => return Ok(()),
        };
        let group = match self.user_groups.find(group_id).await? {
            Some(group) => group,
            None => return Ok(()),
        };

        let now = Utc::now();

        if let Some(limit) = group.monthly_user_tokens {
            let used = self
                .usages
                .total_for_user_month(&user.id, COUNTER_TOKENS, now)
                .await?;
            if used >= limit as i64 {
                return Err(DomainError::validation(
                    "Monthly token budget for this user is exhausted.",
                ));
            }
        }

        if let Some(limit) = group.monthly_tokens {
            let used = self
                .usages
                .total_for_group_month(&group.id, COUNTER_TOKENS, now)
                .await?;
            if used >= limit as i64 {
                return Err(DomainError::validation(
                    "Monthly token budget for this user group is exhausted.",
                ));
            }
        }

        Ok(())
    }
}

#[async_trait]
impl Handler<SendMessage> for SendMessageHandler {
    async fn handle(&self, command: SendMessage) -> DomainResult<SendMessageResponse> {
        let SendMessage { conversation_id, user, query } = command;

        if query.trim().is_empty() {
            return Err(DomainError::validation("Message must not be empty."));
        }

        let mut conversation = self.conversations.find(conversation_id).await?.ok_or_else(|| {
            DomainError::not_found(format!("Conversation {conversation_id} was not found"))
        })?;

        if conversation.user_id != user.id {
            return Err(DomainError::forbidden("Conversation belongs to another user"));
        }

        let configuration = self
            .configurations
            .find(conversation.configuration_id)
            .await?
            .filter(|c| c.enabled)
            .ok_or_else(|| {
                DomainError::validation("Conversation has no enabled configuration.")
            })?;

        self.check_budget(&user).await?;

        let history = self
            .messages
            .list_for_conversation(conversation_id, config::config().chat.history_limit)
            .await?;

        let user_message = self
            .messages
            .insert(NewMessage {
                conversation_id,
                message_type: "human".to_string(),
                data: json!({ "content": query }),
                error: None,
                sources: None,
                parent_id: history.last().map(|m| m.id),
            })
            .await?;

        let reply = self
            .executor
            .execute(&configuration, &query, &history)
            .await;

        let reply = match reply {
            Ok(reply) => reply,
            Err(error) => {
                // Keep the failed turn visible in the history before
                // surfacing the error.
                self.messages
                    .insert(NewMessage {
                        conversation_id,
                        message_type: "ai".to_string(),
                        data: json!({ "content": "" }),
                        error: Some(error.to_string()),
                        sources: None,
                        parent_id: Some(user_message.id),
                    })
                    .await?;
                return Err(error);
            }
        };

        let message = self
            .messages
            .insert(NewMessage {
                conversation_id,
                message_type: "ai".to_string(),
                data: json!({ "content": reply.text }),
                error: None,
                sources: None,
                parent_id: Some(user_message.id),
            })
            .await?;

        // Rough fallback when the executor does not report token counts.
        let tokens = reply
            .tokens
            .unwrap_or(((query.len() + reply.text.len()) / 4) as i64);
        self.usages
            .add(
                &user.id,
                user.user_group_id.as_deref().unwrap_or(""),
                COUNTER_TOKENS,
                &configuration.id.to_string(),
                conversation.llm.as_deref().unwrap_or("default"),
                tokens as i32,
            )
            .await?;

        // First exchange names the conversation unless the user already did.
        if conversation.name.is_none() && !conversation.is_name_set_manually {
            let mut name: String = query.trim().chars().take(40).collect();
            if name.len() < query.trim().len() {
                name.push('…');
            }
            conversation.name = Some(name);
            self.conversations.update(&conversation).await?;
        }

        Ok(SendMessageResponse { user_message, message })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        fake_user_in_group, FakeChatExecutor, InMemoryConfigurationStore,
        InMemoryConversationStore, InMemoryMessageStore, InMemoryUsageStore,
        InMemoryUserGroupStore,
    };

    struct Fixture {
        conversations: Arc<InMemoryConversationStore>,
        messages: Arc<InMemoryMessageStore>,
        user_groups: Arc<InMemoryUserGroupStore>,
        usages: Arc<InMemoryUsageStore>,
        handler: SendMessageHandler,
    }

    async fn fixture() -> Fixture {
        let conversations = Arc::new(InMemoryConversationStore::default());
        let messages = Arc::new(InMemoryMessageStore::default());
        let configurations = Arc::new(InMemoryConfigurationStore::default());
        let user_groups = Arc::new(InMemoryUserGroupStore::default());
        let usages = Arc::new(InMemoryUsageStore::default());
        let executor = Arc::new(FakeChatExecutor::replying("hello back", Some(12)));

        // seeded configurations get ids 1, 2, ... in order
        configurations.seed("default", true).await;

        let handler = SendMessageHandler::new(
            conversations.clone(),
            messages.clone(),
            configurations.clone(),
            user_groups.clone(),
            usages.clone(),
            executor,
        );

        Fixture {
            conversations,
            messages,
            user_groups,
            usages,
            handler,
        }
    }

    async fn seeded_conversation(f: &Fixture) -> crate::database::models::Conversation {
        f.conversations.seed("u1", 1, None).await
    }

    #[tokio::test]
    async fn stores_both_turns_and_counts_tokens() {
        let f = fixture().await;
        let conversation = seeded_conversation(&f).await;

        let response = f
            .handler
            .handle(SendMessage {
                conversation_id: conversation.id,
                user: fake_user_in_group("u1", None),
                query: "hi there".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(response.user_message.message_type, "human");
        assert_eq!(response.message.message_type, "ai");
        assert_eq!(
            f.messages
                .count_for_conversation(conversation.id)
                .await
                .unwrap(),
            2
        );
        assert_eq!(f.usages.total("u1", COUNTER_TOKENS).await, 12);
    }

    #[tokio::test]
    async fn names_the_conversation_after_the_first_exchange() {
        let f = fixture().await;
        let conversation = seeded_conversation(&f).await;

        f.handler
            .handle(SendMessage {
                conversation_id: conversation.id,
                user: fake_user_in_group("u1", None),
                query: "what is rust".to_string(),
            })
            .await
            .unwrap();

        let updated = f.conversations.find(conversation.id).await.unwrap().unwrap();
        assert_eq!(updated.name.as_deref(), Some("what is rust"));
    }

    #[tokio::test]
    async fn exhausted_user_budget_is_rejected_before_any_write() {
        let f = fixture().await;
        let conversation = seeded_conversation(&f).await;
        f.user_groups.seed("g1", "limited", false, None, Some(10)).await;
        f.usages.seed("u1", "g1", COUNTER_TOKENS, 10).await;

        let result = f
            .handler
            .handle(SendMessage {
                conversation_id: conversation.id,
                user: fake_user_in_group("u1", Some("g1")),
                query: "hi".to_string(),
            })
            .await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert_eq!(
            f.messages
                .count_for_conversation(conversation.id)
                .await
                .unwrap(),
            0
        );
    }
}
