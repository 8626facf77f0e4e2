mod delete_conversation;
mod delete_conversations;
mod duplicate_conversation;
mod get_conversation;
mod get_conversations;
mod get_history;
mod rate_message;
mod send_message;
mod start_conversation;
mod update_conversation;

pub use delete_conversation::{DeleteConversation, DeleteConversationHandler, DeleteConversationResponse};
pub use delete_conversations::{DeleteConversations, DeleteConversationsHandler, DeleteConversationsResponse};
pub use duplicate_conversation::{DuplicateConversation, DuplicateConversationHandler, DuplicateConversationResponse};
pub use get_conversation::{GetConversation, GetConversationHandler, GetConversationResponse};
pub use get_conversations::{GetConversations, GetConversationsHandler, GetConversationsResponse};
pub use get_history::{GetHistory, GetHistoryHandler, GetHistoryResponse};
pub use rate_message::{RateMessage, RateMessageHandler, RateMessageResponse};
pub use send_message::{SendMessage, SendMessageHandler, SendMessageResponse};
pub use start_conversation::{StartConversation, StartConversationHandler, StartConversationResponse, StartConversationValues};
pub use update_conversation::{ConversationValues, UpdateConversation, UpdateConversationHandler, UpdateConversationResponse};
