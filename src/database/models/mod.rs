mod blob;
mod bucket;
mod configuration;
mod conversation;
mod extension;
mod file;
mod message;
mod session;
mod setting;
mod usage;
mod user;
mod user_group;

pub use blob::Blob;
pub use bucket::Bucket;
pub use configuration::{Configuration, ConfigurationUser};
pub use conversation::{Conversation, CONVERSATION_RATINGS};
pub use extension::Extension;
pub use file::File;
pub use message::{Message, MESSAGE_RATINGS, MESSAGE_TYPES};
pub use session::Session;
pub use setting::Setting;
pub use usage::Usage;
pub use user::User;
pub use user_group::{UserGroup, BUILTIN_USER_GROUP_ADMIN, BUILTIN_USER_GROUP_DEFAULT};
