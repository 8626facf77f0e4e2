//! In-memory store fakes for unit tests.
//!
//! Each fake implements a domain store trait with a `tokio` RwLock around
//! plain collections, plus a few seeding helpers tests use to arrange
//! state. Only unit tests link this module.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Utc};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::database::models::{
    Blob, Bucket, Configuration, ConfigurationUser, Conversation, Extension, File, Message,
    Session, Setting, Usage, User, UserGroup,
};
use crate::domain::chat::{
    ChatExecutor, ConversationStore, ExecutorReply, MessageStore, NewConversation, NewMessage,
};
use crate::domain::extensions::{
    ConfigurationStore, ConfigurationUserStore, ExtensionStore, NewConfiguration, NewExtension,
};
use crate::domain::files::{BlobStore, BucketStore, FilePage, FileStore, NewBucket, NewFile};
use crate::domain::settings::SettingStore;
use crate::domain::usages::UsageStore;
use crate::domain::users::{
    NewUser, NewUserGroup, SessionStore, UserGroupStore, UserPage, UserStore,
};
use crate::domain::{DomainError, DomainResult};

pub fn fake_user(id: &str) -> User {
    fake_user_in_group(id, None)
}

pub fn fake_user_in_group(id: &str, user_group_id: Option<&str>) -> User {
    let now = Utc::now();
    User {
        id: id.to_string(),
        name: "Test User".to_string(),
        email: format!("{id}@example.com"),
        api_key: None,
        password_hash: None,
        user_group_id: user_group_id.map(str::to_string),
        created_at: now,
        updated_at: now,
    }
}

// ---------------------------------------------------------------------------
// Chat

#[derive(Default)]
pub struct InMemoryConversationStore {
    rows: RwLock<Vec<Conversation>>,
    next_id: AtomicI32,
}

impl InMemoryConversationStore {
    pub async fn seed(
        &self,
        user_id: &str,
        configuration_id: i32,
        name: Option<&str>,
    ) -> Conversation {
        self.insert(NewConversation {
            user_id: user_id.to_string(),
            configuration_id,
            name: name.map(str::to_string),
            llm: None,
            context: None,
            extension_user_arguments: None,
        })
        .await
        .expect("in-memory insert cannot fail")
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn find(&self, id: i32) -> DomainResult<Option<Conversation>> {
        Ok(self.rows.read().await.iter().find(|c| c.id == id).cloned())
    }

    async fn list_for_user(&self, user_id: &str, limit: i64) -> DomainResult<Vec<Conversation>> {
        let mut rows: Vec<Conversation> = self
            .rows
            .read()
            .await
            .iter()
            .filter(|c| c.user_id == user_id && c.name.as_deref().is_some_and(|n| !n.is_empty()))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));
        rows.truncate(limit as usize);
        Ok(rows)
    }

    async fn insert(&self, conversation: NewConversation) -> DomainResult<Conversation> {
        let now = Utc::now();
        let row = Conversation {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            name: conversation.name,
            is_name_set_manually: false,
            llm: conversation.llm,
            rating: None,
            configuration_id: conversation.configuration_id,
            user_id: conversation.user_id,
            context: conversation.context,
            extension_user_arguments: conversation.extension_user_arguments,
            created_at: now,
            updated_at: now,
        };
        self.rows.write().await.push(row.clone());
        Ok(row)
    }

    async fn update(&self, conversation: &Conversation) -> DomainResult<Conversation> {
        let mut rows = self.rows.write().await;
        let slot = rows
            .iter_mut()
            .find(|c| c.id == conversation.id)
            .ok_or_else(|| DomainError::not_found("conversation vanished"))?;
        *slot = Conversation {
            updated_at: Utc::now(),
            ..conversation.clone()
        };
        Ok(slot.clone())
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        self.rows.write().await.retain(|c| c.id != id);
        Ok(())
    }

    async fn delete_for_user(&self, user_id: &str) -> DomainResult<u64> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|c| c.user_id != user_id);
        Ok((before - rows.len()) as u64)
    }
}

#[derive(Default)]
pub struct InMemoryMessageStore {
    rows: RwLock<Vec<Message>>,
    next_id: AtomicI32,
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn find(&self, id: i32) -> DomainResult<Option<Message>> {
        Ok(self.rows.read().await.iter().find(|m| m.id == id).cloned())
    }

    async fn list_for_conversation(
        &self,
        conversation_id: i32,
        limit: i64,
    ) -> DomainResult<Vec<Message>> {
        let mut rows: Vec<Message> = self
            .rows
            .read()
            .await
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .cloned()
            .collect();
        rows.sort_by_key(|m| m.id);
        rows.truncate(limit as usize);
        Ok(rows)
    }

    async fn count_for_conversation(&self, conversation_id: i32) -> DomainResult<i64> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .count() as i64)
    }

    async fn insert(&self, message: NewMessage) -> DomainResult<Message> {
        let now = Utc::now();
        let row = Message {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            message_type: message.message_type,
            data: message.data,
            rating: None,
            error: message.error,
            tools: None,
            debug: None,
            sources: message.sources,
            conversation_id: message.conversation_id,
            parent_id: message.parent_id,
            created_at: now,
            updated_at: now,
        };
        self.rows.write().await.push(row.clone());
        Ok(row)
    }

    async fn set_rating(&self, id: i32, rating: &str) -> DomainResult<Message> {
        let mut rows = self.rows.write().await;
        let slot = rows
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| DomainError::not_found("message vanished"))?;
        slot.rating = Some(rating.to_string());
        slot.updated_at = Utc::now();
        Ok(slot.clone())
    }

    async fn copy_to_conversation(&self, from: i32, to: i32) -> DomainResult<u64> {
        let sources: Vec<Message> = {
            let rows = self.rows.read().await;
            let mut sources: Vec<Message> = rows
                .iter()
                .filter(|m| m.conversation_id == from)
                .cloned()
                .collect();
            sources.sort_by_key(|m| m.id);
            sources
        };

        let copied = sources.len() as u64;
        for mut message in sources {
            message.id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            message.conversation_id = to;
            message.parent_id = None;
            self.rows.write().await.push(message);
        }
        Ok(copied)
    }
}

pub struct FakeChatExecutor {
    text: String,
    tokens: Option<i64>,
}

impl FakeChatExecutor {
    pub fn replying(text: &str, tokens: Option<i64>) -> Self {
        Self {
            text: text.to_string(),
            tokens,
        }
    }
}

#[async_trait]
impl ChatExecutor for FakeChatExecutor {
    async fn execute(
        &self,
        _configuration: &Configuration,
        _query: &str,
        _history: &[Message],
    ) -> DomainResult<ExecutorReply> {
        Ok(ExecutorReply {
            text: self.text.clone(),
            tokens: self.tokens,
        })
    }
}

// ---------------------------------------------------------------------------
// Extensions / configurations

#[derive(Default)]
pub struct InMemoryConfigurationStore {
    rows: RwLock<Vec<Configuration>>,
    groups: RwLock<HashMap<i32, Vec<String>>>,
    next_id: AtomicI32,
}

impl InMemoryConfigurationStore {
    pub async fn seed(&self, name: &str, enabled: bool) -> Configuration {
        self.insert(NewConfiguration {
            name: name.to_string(),
            enabled,
            agent_name: None,
            chat_footer: None,
            chat_suggestions: None,
            executor_endpoint: Some("https://executor.internal".to_string()),
            executor_headers: None,
        })
        .await
        .expect("in-memory insert cannot fail")
    }
}

#[async_trait]
impl ConfigurationStore for InMemoryConfigurationStore {
    async fn find(&self, id: i32) -> DomainResult<Option<Configuration>> {
        Ok(self.rows.read().await.iter().find(|c| c.id == id).cloned())
    }

    async fn list(&self) -> DomainResult<Vec<Configuration>> {
        Ok(self.rows.read().await.clone())
    }

    async fn insert(&self, configuration: NewConfiguration) -> DomainResult<Configuration> {
        let now = Utc::now();
        let row = Configuration {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            name: configuration.name,
            enabled: configuration.enabled,
            agent_name: configuration.agent_name,
            chat_footer: configuration.chat_footer,
            chat_suggestions: configuration.chat_suggestions,
            executor_endpoint: configuration.executor_endpoint,
            executor_headers: configuration.executor_headers,
            created_at: now,
            updated_at: now,
        };
        self.rows.write().await.push(row.clone());
        Ok(row)
    }

    async fn update(&self, configuration: &Configuration) -> DomainResult<Configuration> {
        let mut rows = self.rows.write().await;
        let slot = rows
            .iter_mut()
            .find(|c| c.id == configuration.id)
            .ok_or_else(|| DomainError::not_found("configuration vanished"))?;
        *slot = Configuration {
            updated_at: Utc::now(),
            ..configuration.clone()
        };
        Ok(slot.clone())
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        self.rows.write().await.retain(|c| c.id != id);
        self.groups.write().await.remove(&id);
        Ok(())
    }

    async fn group_ids(&self, configuration_id: i32) -> DomainResult<Vec<String>> {
        Ok(self
            .groups
            .read()
            .await
            .get(&configuration_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn set_group_ids(
        &self,
        configuration_id: i32,
        group_ids: &[String],
    ) -> DomainResult<()> {
        self.groups
            .write()
            .await
            .insert(configuration_id, group_ids.to_vec());
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryExtensionStore {
    rows: RwLock<Vec<Extension>>,
    next_id: AtomicI32,
}

#[async_trait]
impl ExtensionStore for InMemoryExtensionStore {
    async fn find(&self, id: i32) -> DomainResult<Option<Extension>> {
        Ok(self.rows.read().await.iter().find(|e| e.id == id).cloned())
    }

    async fn list_for_configuration(&self, configuration_id: i32) -> DomainResult<Vec<Extension>> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .filter(|e| e.configuration_id == configuration_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, extension: NewExtension) -> DomainResult<Extension> {
        let now = Utc::now();
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let row = Extension {
            id,
            name: extension.name.clone(),
            enabled: extension.enabled,
            values: extension.values,
            external_id: Some(format!("{}_{}", extension.name, id)),
            configuration_id: extension.configuration_id,
            created_at: now,
            updated_at: now,
        };
        self.rows.write().await.push(row.clone());
        Ok(row)
    }

    async fn update(&self, extension: &Extension) -> DomainResult<Extension> {
        let mut rows = self.rows.write().await;
        let slot = rows
            .iter_mut()
            .find(|e| e.id == extension.id)
            .ok_or_else(|| DomainError::not_found("extension vanished"))?;
        *slot = Extension {
            updated_at: Utc::now(),
            ..extension.clone()
        };
        Ok(slot.clone())
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        self.rows.write().await.retain(|e| e.id != id);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryConfigurationUserStore {
    rows: RwLock<Vec<ConfigurationUser>>,
    next_id: AtomicI32,
}

#[async_trait]
impl ConfigurationUserStore for InMemoryConfigurationUserStore {
    async fn find(
        &self,
        configuration_id: i32,
        user_id: &str,
    ) -> DomainResult<Option<ConfigurationUser>> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .find(|r| r.configuration_id == configuration_id && r.user_id == user_id)
            .cloned())
    }

    async fn upsert_values(
        &self,
        configuration_id: i32,
        user_id: &str,
        values: Value,
    ) -> DomainResult<ConfigurationUser> {
        let mut rows = self.rows.write().await;
        if let Some(slot) = rows
            .iter_mut()
            .find(|r| r.configuration_id == configuration_id && r.user_id == user_id)
        {
            slot.values = values;
            return Ok(slot.clone());
        }

        let row = ConfigurationUser {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            configuration_id,
            user_id: user_id.to_string(),
            is_default: false,
            values,
        };
        rows.push(row.clone());
        Ok(row)
    }
}

// ---------------------------------------------------------------------------
// Users

#[derive(Default)]
pub struct InMemoryUserStore {
    rows: RwLock<Vec<User>>,
}

impl InMemoryUserStore {
    pub async fn seed(&self, id: &str, email: &str, user_group_id: Option<&str>) -> User {
        let now = Utc::now();
        let user = User {
            id: id.to_string(),
            name: id.to_string(),
            email: email.to_string(),
            api_key: None,
            password_hash: None,
            user_group_id: user_group_id.map(str::to_string),
            created_at: now,
            updated_at: now,
        };
        self.rows.write().await.push(user.clone());
        user
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find(&self, id: &str) -> DomainResult<Option<User>> {
        Ok(self.rows.read().await.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_api_key(&self, api_key: &str) -> DomainResult<Option<User>> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .find(|u| u.api_key.as_deref() == Some(api_key))
            .cloned())
    }

    async fn list(&self, page: i64, page_size: i64) -> DomainResult<UserPage> {
        let rows = self.rows.read().await;
        let total = rows.len() as i64;
        let items = rows
            .iter()
            .skip((page * page_size) as usize)
            .take(page_size as usize)
            .cloned()
            .collect();
        Ok(UserPage { items, total })
    }

    async fn insert(&self, user: NewUser) -> DomainResult<User> {
        let now = Utc::now();
        let row = User {
            id: user.id,
            name: user.name,
            email: user.email,
            api_key: user.api_key,
            password_hash: user.password_hash,
            user_group_id: user.user_group_id,
            created_at: now,
            updated_at: now,
        };
        self.rows.write().await.push(row.clone());
        Ok(row)
    }

    async fn update(&self, user: &User) -> DomainResult<User> {
        let mut rows = self.rows.write().await;
        let slot = rows
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| DomainError::not_found("user vanished"))?;
        *slot = User {
            updated_at: Utc::now(),
            ..user.clone()
        };
        Ok(slot.clone())
    }

    async fn count_in_group(&self, user_group_id: &str) -> DomainResult<i64> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .filter(|u| u.user_group_id.as_deref() == Some(user_group_id))
            .count() as i64)
    }
}

#[derive(Default)]
pub struct InMemoryUserGroupStore {
    rows: RwLock<Vec<UserGroup>>,
}

impl InMemoryUserGroupStore {
    pub async fn seed(
        &self,
        id: &str,
        name: &str,
        is_admin: bool,
        monthly_tokens: Option<i32>,
        monthly_user_tokens: Option<i32>,
    ) -> UserGroup {
        self.insert(NewUserGroup {
            id: id.to_string(),
            name: name.to_string(),
            is_admin,
            is_built_in: false,
            monthly_tokens,
            monthly_user_tokens,
        })
        .await
        .expect("in-memory insert cannot fail")
    }

    pub async fn mark_built_in(&self, id: &str) {
        if let Some(group) = self.rows.write().await.iter_mut().find(|g| g.id == id) {
            group.is_built_in = true;
        }
    }
}

#[async_trait]
impl UserGroupStore for InMemoryUserGroupStore {
    async fn find(&self, id: &str) -> DomainResult<Option<UserGroup>> {
        Ok(self.rows.read().await.iter().find(|g| g.id == id).cloned())
    }

    async fn list(&self) -> DomainResult<Vec<UserGroup>> {
        Ok(self.rows.read().await.clone())
    }

    async fn insert(&self, group: NewUserGroup) -> DomainResult<UserGroup> {
        let now = Utc::now();
        let row = UserGroup {
            id: group.id,
            name: group.name,
            is_admin: group.is_admin,
            is_built_in: group.is_built_in,
            monthly_tokens: group.monthly_tokens,
            monthly_user_tokens: group.monthly_user_tokens,
            created_at: now,
            updated_at: now,
        };
        self.rows.write().await.push(row.clone());
        Ok(row)
    }

    async fn update(&self, group: &UserGroup) -> DomainResult<UserGroup> {
        let mut rows = self.rows.write().await;
        let slot = rows
            .iter_mut()
            .find(|g| g.id == group.id)
            .ok_or_else(|| DomainError::not_found("user group vanished"))?;
        *slot = UserGroup {
            updated_at: Utc::now(),
            ..group.clone()
        };
        Ok(slot.clone())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        self.rows.write().await.retain(|g| g.id != id);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemorySessionStore {
    rows: RwLock<HashMap<String, Session>>,
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn find(&self, id: &str) -> DomainResult<Option<Session>> {
        Ok(self.rows.read().await.get(id).cloned())
    }

    async fn insert(&self, session: &Session) -> DomainResult<()> {
        self.rows
            .write()
            .await
            .insert(session.id.clone(), session.clone());
        Ok(())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        self.rows.write().await.remove(id);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Files

#[derive(Default)]
pub struct InMemoryBucketStore {
    rows: RwLock<Vec<Bucket>>,
    next_id: AtomicI32,
}

#[async_trait]
impl BucketStore for InMemoryBucketStore {
    async fn find(&self, id: i32) -> DomainResult<Option<Bucket>> {
        Ok(self.rows.read().await.iter().find(|b| b.id == id).cloned())
    }

    async fn find_default(&self) -> DomainResult<Option<Bucket>> {
        Ok(self.rows.read().await.iter().find(|b| b.is_default).cloned())
    }

    async fn list(&self) -> DomainResult<Vec<Bucket>> {
        Ok(self.rows.read().await.clone())
    }

    async fn insert(&self, bucket: NewBucket) -> DomainResult<Bucket> {
        let now = Utc::now();
        let row = Bucket {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            name: bucket.name,
            endpoint: bucket.endpoint,
            headers: bucket.headers,
            is_default: bucket.is_default,
            per_user_quota: bucket.per_user_quota,
            allowed_file_name_extensions: bucket.allowed_file_name_extensions,
            file_size_limits: bucket.file_size_limits,
            created_at: now,
            updated_at: now,
        };
        self.rows.write().await.push(row.clone());
        Ok(row)
    }

    async fn update(&self, bucket: &Bucket) -> DomainResult<Bucket> {
        let mut rows = self.rows.write().await;
        let slot = rows
            .iter_mut()
            .find(|b| b.id == bucket.id)
            .ok_or_else(|| DomainError::not_found("bucket vanished"))?;
        *slot = Bucket {
            updated_at: Utc::now(),
            ..bucket.clone()
        };
        Ok(slot.clone())
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        self.rows.write().await.retain(|b| b.id != id);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryFileStore {
    rows: RwLock<Vec<File>>,
    next_id: AtomicI32,
}

#[async_trait]
impl FileStore for InMemoryFileStore {
    async fn find(&self, id: i32) -> DomainResult<Option<File>> {
        Ok(self.rows.read().await.iter().find(|f| f.id == id).cloned())
    }

    async fn list_for_user(
        &self,
        user_id: &str,
        page: i64,
        page_size: i64,
    ) -> DomainResult<FilePage> {
        let rows = self.rows.read().await;
        let mut items: Vec<File> = rows
            .iter()
            .filter(|f| f.user_id.as_deref() == Some(user_id))
            .cloned()
            .collect();
        items.sort_by(|a, b| b.id.cmp(&a.id));
        let total = items.len() as i64;
        let items = items
            .into_iter()
            .skip((page * page_size) as usize)
            .take(page_size as usize)
            .collect();
        Ok(FilePage { items, total })
    }

    async fn count_for_user_in_bucket(&self, user_id: &str, bucket_id: i32) -> DomainResult<i64> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .filter(|f| f.user_id.as_deref() == Some(user_id) && f.bucket_id == Some(bucket_id))
            .count() as i64)
    }

    async fn insert(&self, file: NewFile) -> DomainResult<File> {
        let now = Utc::now();
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let row = File {
            id,
            mime_type: file.mime_type,
            file_size: file.file_size,
            file_name: file.file_name,
            user_id: file.user_id,
            bucket_id: file.bucket_id,
            extension_id: file.extension_id,
            conversation_id: file.conversation_id,
            upload_status: "successful".to_string(),
            doc_id: Some(id),
            created_at: now,
            updated_at: now,
        };
        self.rows.write().await.push(row.clone());
        Ok(row)
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        self.rows.write().await.retain(|f| f.id != id);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryBlobStore {
    rows: RwLock<HashMap<String, Blob>>,
}

impl InMemoryBlobStore {
    pub async fn count(&self) -> usize {
        self.rows.read().await.len()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn find(&self, id: &str) -> DomainResult<Option<Blob>> {
        Ok(self.rows.read().await.get(id).cloned())
    }

    async fn save(&self, blob: &Blob) -> DomainResult<()> {
        self.rows.write().await.insert(blob.id.clone(), blob.clone());
        Ok(())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        self.rows.write().await.remove(id);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Settings

#[derive(Default)]
pub struct InMemorySettingStore {
    row: RwLock<Option<Setting>>,
}

#[async_trait]
impl SettingStore for InMemorySettingStore {
    async fn get(&self) -> DomainResult<Option<Setting>> {
        Ok(self.row.read().await.clone())
    }

    async fn create_default(&self) -> DomainResult<Setting> {
        let now = Utc::now();
        let setting = Setting {
            id: 1,
            language: None,
            name: None,
            primary_color: None,
            primary_content_color: None,
            welcome_text: None,
            custom_css: None,
            agent_name: None,
            chat_footer: None,
            chat_suggestions: None,
            site_links: None,
            logo: None,
            background_logo: None,
            avatar_logo: None,
            created_at: now,
            updated_at: now,
        };
        *self.row.write().await = Some(setting.clone());
        Ok(setting)
    }

    async fn update(&self, setting: &Setting) -> DomainResult<Setting> {
        let updated = Setting {
            updated_at: Utc::now(),
            ..setting.clone()
        };
        *self.row.write().await = Some(updated.clone());
        Ok(updated)
    }
}

// ---------------------------------------------------------------------------
// Usages

#[derive(Default)]
pub struct InMemoryUsageStore {
    rows: RwLock<Vec<Usage>>,
}

impl InMemoryUsageStore {
    pub async fn seed(&self, user_id: &str, user_group: &str, counter: &str, count: i32) {
        self.add(user_id, user_group, counter, "seed", "seed", count)
            .await
            .expect("in-memory add cannot fail");
    }

    /// Counter total for one user across all time, for assertions.
    pub async fn total(&self, user_id: &str, counter: &str) -> i64 {
        self.rows
            .read()
            .await
            .iter()
            .filter(|u| u.user_id == user_id && u.counter == counter)
            .map(|u| u.count as i64)
            .sum()
    }
}

fn same_month(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

#[async_trait]
impl UsageStore for InMemoryUsageStore {
    async fn add(
        &self,
        user_id: &str,
        user_group: &str,
        counter: &str,
        key: &str,
        sub_key: &str,
        count: i32,
    ) -> DomainResult<()> {
        let mut rows = self.rows.write().await;
        let today = Utc::now();
        if let Some(slot) = rows.iter_mut().find(|u| {
            u.user_id == user_id
                && u.user_group == user_group
                && u.counter == counter
                && u.key == key
                && u.sub_key == sub_key
                && same_month(u.date, today)
        }) {
            slot.count += count;
        } else {
            rows.push(Usage {
                date: today,
                user_id: user_id.to_string(),
                user_group: user_group.to_string(),
                counter: counter.to_string(),
                key: key.to_string(),
                sub_key: sub_key.to_string(),
                count,
            });
        }
        Ok(())
    }

    async fn total_for_user_month(
        &self,
        user_id: &str,
        counter: &str,
        at: DateTime<Utc>,
    ) -> DomainResult<i64> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .filter(|u| u.user_id == user_id && u.counter == counter && same_month(u.date, at))
            .map(|u| u.count as i64)
            .sum())
    }

    async fn total_for_group_month(
        &self,
        user_group: &str,
        counter: &str,
        at: DateTime<Utc>,
    ) -> DomainResult<i64> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .filter(|u| u.user_group == user_group && u.counter == counter && same_month(u.date, at))
            .map(|u| u.count as i64)
            .sum())
    }

    async fn list_for_user(
        &self,
        user_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DomainResult<Vec<Usage>> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .filter(|u| u.user_id == user_id && u.date >= from && u.date <= to)
            .cloned()
            .collect())
    }
}

// A fake is only honest if it honours the same contracts the SQL stores
// do; the seeding helpers get a sanity check here.
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn conversation_ids_are_unique_and_increasing() {
        let store = InMemoryConversationStore::default();
        let a = store.seed("u1", 1, Some("a")).await;
        let b = store.seed("u1", 1, Some("b")).await;
        assert!(b.id > a.id);
    }

    #[tokio::test]
    async fn usage_add_accumulates_within_a_month() {
        let store = InMemoryUsageStore::default();
        store.add("u1", "g1", "tokens", "1", "llm", 5).await.unwrap();
        store.add("u1", "g1", "tokens", "1", "llm", 7).await.unwrap();
        assert_eq!(store.total("u1", "tokens").await, 12);
    }
}
