use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::database::models::Setting;
use crate::dispatch::{Handler, Request};
use crate::domain::settings::SettingStore;
use crate::domain::{DomainError, DomainResult};

/// Fields a client may change; `None` leaves the stored value untouched.
#[derive(Default)]
pub struct SettingValues {
    pub language: Option<String>,
    pub name: Option<String>,
    pub primary_color: Option<String>,
    pub primary_content_color: Option<String>,
    pub welcome_text: Option<String>,
    pub custom_css: Option<String>,
    pub agent_name: Option<String>,
    pub chat_footer: Option<String>,
    pub chat_suggestions: Option<Value>,
    pub site_links: Option<Value>,
    pub logo: Option<String>,
    pub background_logo: Option<String>,
    pub avatar_logo: Option<String>,
}

pub struct UpdateSettings {
    pub values: SettingValues,
}

impl Request for UpdateSettings {
    type Response = UpdateSettingsResponse;
}

pub struct UpdateSettingsResponse {
    pub settings: Setting,
}

pub struct UpdateSettingsHandler {
    settings: Arc<dyn SettingStore>,
}

impl UpdateSettingsHandler {
    pub fn new(settings: Arc<dyn SettingStore>) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl Handler<UpdateSettings> for UpdateSettingsHandler {
    async fn handle(&self, command: UpdateSettings) -> DomainResult<UpdateSettingsResponse> {
        let values = command.values;

        if let Some(language) = &values.language {
            if language.len() != 2 {
                return Err(DomainError::validation(
                    "Language must be a two-letter code.",
                ));
            }
        }

        let mut entity = match self.settings.get().await? {
            Some(settings) => settings,
            None => self.settings.create_default().await?,
        };

        if let Some(language) = values.language {
            entity.language = Some(language);
        }
        if let Some(name) = values.name {
            entity.name = Some(name);
        }
        if let Some(primary_color) = values.primary_color {
            entity.primary_color = Some(primary_color);
        }
        if let Some(primary_content_color) = values.primary_content_color {
            entity.primary_content_color = Some(primary_content_color);
        }
        if let Some(welcome_text) = values.welcome_text {
            entity.welcome_text = Some(welcome_text);
        }
        if let Some(custom_css) = values.custom_css {
            entity.custom_css = Some(custom_css);
        }
        if let Some(agent_name) = values.agent_name {
            entity.agent_name = Some(agent_name);
        }
        if let Some(chat_footer) = values.chat_footer {
            entity.chat_footer = Some(chat_footer);
        }
        if let Some(chat_suggestions) = values.chat_suggestions {
            entity.chat_suggestions = Some(chat_suggestions);
        }
        if let Some(site_links) = values.site_links {
            entity.site_links = Some(site_links);
        }
        if let Some(logo) = values.logo {
            entity.logo = Some(logo);
        }
        if let Some(background_logo) = values.background_logo {
            entity.background_logo = Some(background_logo);
        }
        if let Some(avatar_logo) = values.avatar_logo {
            entity.avatar_logo = Some(avatar_logo);
        }

        let settings = self.settings.update(&entity).await?;

        Ok(UpdateSettingsResponse { settings })
    }
}
