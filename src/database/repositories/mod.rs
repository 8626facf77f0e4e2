//! sqlx-backed implementations of the domain store traits.

mod blobs;
mod buckets;
mod configurations;
mod conversations;
mod extensions;
mod files;
mod messages;
mod sessions;
mod settings;
mod usages;
mod user_groups;
mod users;

pub use blobs::PgBlobStore;
pub use buckets::PgBucketStore;
pub use configurations::{PgConfigurationStore, PgConfigurationUserStore};
pub use conversations::PgConversationStore;
pub use extensions::PgExtensionStore;
pub use files::PgFileStore;
pub use messages::PgMessageStore;
pub use sessions::PgSessionStore;
pub use settings::PgSettingStore;
pub use usages::PgUsageStore;
pub use user_groups::PgUserGroupStore;
pub use users::PgUserStore;
