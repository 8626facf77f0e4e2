use async_trait::async_trait;

use crate::database::models::Setting;
use crate::domain::DomainResult;

pub mod use_cases;

#[async_trait]
pub trait SettingStore: Send + Sync {
    async fn get(&self) -> DomainResult<Option<Setting>>;

    /// Creates the singleton row with empty values.
    async fn create_default(&self) -> DomainResult<Setting>;

    async fn update(&self, setting: &Setting) -> DomainResult<Setting>;
}
