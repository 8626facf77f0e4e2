use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::models::Setting;
use crate::domain::settings::SettingStore;
use crate::domain::DomainResult;

pub struct PgSettingStore {
    pool: PgPool,
}

impl PgSettingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingStore for PgSettingStore {
    async fn get(&self) -> DomainResult<Option<Setting>> {
        let row = sqlx::query_as::<_, Setting>(
            r#"SELECT * FROM "settings" ORDER BY "id" ASC LIMIT 1"#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn create_default(&self) -> DomainResult<Setting> {
        let row = sqlx::query_as::<_, Setting>(
            r#"INSERT INTO "settings" ("name") VALUES (NULL) RETURNING *"#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update(&self, setting: &Setting) -> DomainResult<Setting> {
        let row = sqlx::query_as::<_, Setting>(
            r#"UPDATE "settings"
               SET "language" = $2,
                   "name" = $3,
                   "primaryColor" = $4,
                   "primaryContentColor" = $5,
                   "welcomeText" = $6,
                   "customCss" = $7,
                   "agentName" = $8,
                   "chatFooter" = $9,
                   "chatSuggestions" = $10,
                   "siteLinks" = $11,
                   "logo" = $12,
                   "backgroundLogo" = $13,
                   "avatarLogo" = $14,
                   "updatedAt" = now()
               WHERE "id" = $1
               RETURNING *"#,
        )
        .bind(setting.id)
        .bind(&setting.language)
        .bind(&setting.name)
        .bind(&setting.primary_color)
        .bind(&setting.primary_content_color)
        .bind(&setting.welcome_text)
        .bind(&setting.custom_css)
        .bind(&setting.agent_name)
        .bind(&setting.chat_footer)
        .bind(&setting.chat_suggestions)
        .bind(&setting.site_links)
        .bind(&setting.logo)
        .bind(&setting.background_logo)
        .bind(&setting.avatar_logo)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }
}
