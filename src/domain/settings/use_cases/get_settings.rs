use std::sync::Arc;

use async_trait::async_trait;

use crate::database::models::Setting;
use crate::dispatch::{Handler, Request};
use crate::domain::settings::SettingStore;
use crate::domain::DomainResult;

pub struct GetSettings;

impl Request for GetSettings {
    type Response = GetSettingsResponse;
}

pub struct GetSettingsResponse {
    pub settings: Setting,
}

pub struct GetSettingsHandler {
    settings: Arc<dyn SettingStore>,
}

impl GetSettingsHandler {
    pub fn new(settings: Arc<dyn SettingStore>) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl Handler<GetSettings> for GetSettingsHandler {
    async fn handle(&self, _query: GetSettings) -> DomainResult<GetSettingsResponse> {
        let settings = match self.settings.get().await? {
            Some(settings) => settings,
            // The singleton row appears on first read.
            None => self.settings.create_default().await?,
        };

        Ok(GetSettingsResponse { settings })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemorySettingStore;

    #[tokio::test]
    async fn first_read_creates_the_singleton_row() {
        let settings = Arc::new(InMemorySettingStore::default());
        let handler = GetSettingsHandler::new(settings.clone());

        let first = handler.handle(GetSettings).await.unwrap();
        let second = handler.handle(GetSettings).await.unwrap();

        assert_eq!(first.settings.id, second.settings.id);
    }
}
