use async_trait::async_trait;
use serde_json::Value;

use crate::database::models::{Configuration, ConfigurationUser, Extension};
use crate::domain::DomainResult;

pub mod use_cases;

pub struct NewConfiguration {
    pub name: String,
    pub enabled: bool,
    pub agent_name: Option<String>,
    pub chat_footer: Option<String>,
    pub chat_suggestions: Option<Value>,
    pub executor_endpoint: Option<String>,
    pub executor_headers: Option<String>,
}

#[async_trait]
pub trait ConfigurationStore: Send + Sync {
    async fn find(&self, id: i32) -> DomainResult<Option<Configuration>>;

    async fn list(&self) -> DomainResult<Vec<Configuration>>;

    async fn insert(&self, configuration: NewConfiguration) -> DomainResult<Configuration>;

    async fn update(&self, configuration: &Configuration) -> DomainResult<Configuration>;

    async fn delete(&self, id: i32) -> DomainResult<()>;

    /// User groups a configuration is assigned to. Empty means visible to
    /// every group.
    async fn group_ids(&self, configuration_id: i32) -> DomainResult<Vec<String>>;

    async fn set_group_ids(&self, configuration_id: i32, group_ids: &[String])
        -> DomainResult<()>;
}

pub struct NewExtension {
    pub configuration_id: i32,
    pub name: String,
    pub enabled: bool,
    pub values: Value,
}

#[async_trait]
pub trait ExtensionStore: Send + Sync {
    async fn find(&self, id: i32) -> DomainResult<Option<Extension>>;

    async fn list_for_configuration(&self, configuration_id: i32) -> DomainResult<Vec<Extension>>;

    async fn insert(&self, extension: NewExtension) -> DomainResult<Extension>;

    async fn update(&self, extension: &Extension) -> DomainResult<Extension>;

    async fn delete(&self, id: i32) -> DomainResult<()>;
}

#[async_trait]
pub trait ConfigurationUserStore: Send + Sync {
    async fn find(
        &self,
        configuration_id: i32,
        user_id: &str,
    ) -> DomainResult<Option<ConfigurationUser>>;

    async fn upsert_values(
        &self,
        configuration_id: i32,
        user_id: &str,
        values: Value,
    ) -> DomainResult<ConfigurationUser>;
}
