use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

/// Site-wide appearance and chat defaults. A single row; created lazily on
/// first read.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Setting {
    pub id: i32,
    pub language: Option<String>,
    pub name: Option<String>,
    #[sqlx(rename = "primaryColor")]
    pub primary_color: Option<String>,
    #[sqlx(rename = "primaryContentColor")]
    pub primary_content_color: Option<String>,
    #[sqlx(rename = "welcomeText")]
    pub welcome_text: Option<String>,
    #[sqlx(rename = "customCss")]
    pub custom_css: Option<String>,
    #[sqlx(rename = "agentName")]
    pub agent_name: Option<String>,
    #[sqlx(rename = "chatFooter")]
    pub chat_footer: Option<String>,
    #[sqlx(rename = "chatSuggestions")]
    pub chat_suggestions: Option<Value>,
    #[sqlx(rename = "siteLinks")]
    pub site_links: Option<Value>,
    pub logo: Option<String>,
    #[sqlx(rename = "backgroundLogo")]
    pub background_logo: Option<String>,
    #[sqlx(rename = "avatarLogo")]
    pub avatar_logo: Option<String>,
    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[sqlx(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}
