use async_trait::async_trait;
use serde_json::Value;

use crate::database::models::{Configuration, Conversation, Message};
use crate::domain::DomainResult;

pub mod executor;
pub mod use_cases;

pub struct ExecutorReply {
    pub text: String,
    pub tokens: Option<i64>,
}

/// Outbound seam to the configured GenAI executor endpoint.
#[async_trait]
pub trait ChatExecutor: Send + Sync {
    async fn execute(
        &self,
        configuration: &Configuration,
        query: &str,
        history: &[Message],
    ) -> DomainResult<ExecutorReply>;
}

pub struct NewConversation {
    pub user_id: String,
    pub configuration_id: i32,
    pub name: Option<String>,
    pub llm: Option<String>,
    pub context: Option<Value>,
    pub extension_user_arguments: Option<Value>,
}

#[async_trait]
pub trait ConversationStore: Send + Sync {
    async fn find(&self, id: i32) -> DomainResult<Option<Conversation>>;

    /// Named conversations of one user, most recently updated first.
    async fn list_for_user(&self, user_id: &str, limit: i64) -> DomainResult<Vec<Conversation>>;

    async fn insert(&self, conversation: NewConversation) -> DomainResult<Conversation>;

    async fn update(&self, conversation: &Conversation) -> DomainResult<Conversation>;

    async fn delete(&self, id: i32) -> DomainResult<()>;

    /// Deletes every conversation of one user, returning the count.
    async fn delete_for_user(&self, user_id: &str) -> DomainResult<u64>;
}

pub struct NewMessage {
    pub conversation_id: i32,
    pub message_type: String,
    pub data: Value,
    pub error: Option<String>,
    pub sources: Option<Value>,
    pub parent_id: Option<i32>,
}

#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn find(&self, id: i32) -> DomainResult<Option<Message>>;

    /// Messages of one conversation in creation order.
    async fn list_for_conversation(
        &self,
        conversation_id: i32,
        limit: i64,
    ) -> DomainResult<Vec<Message>>;

    async fn count_for_conversation(&self, conversation_id: i32) -> DomainResult<i64>;

    async fn insert(&self, message: NewMessage) -> DomainResult<Message>;

    async fn set_rating(&self, id: i32, rating: &str) -> DomainResult<Message>;

    /// Copies all messages of one conversation into another, preserving
    /// order. Atomicity is the persistence layer's concern.
    async fn copy_to_conversation(&self, from: i32, to: i32) -> DomainResult<u64>;
}
