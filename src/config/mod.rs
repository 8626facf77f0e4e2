use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub uploads: UploadConfig,
    pub chat: ChatConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub connection_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub session_ttl_hours: u64,
    pub bcrypt_cost: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Fallback cap when a bucket carries no size limit of its own.
    pub max_file_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    pub executor_timeout_secs: u64,
    pub history_limit: i64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout_secs =
                v.parse().unwrap_or(self.database.connection_timeout_secs);
        }
        if let Ok(v) = env::var("AUTH_SESSION_TTL_HOURS") {
            self.auth.session_ttl_hours = v.parse().unwrap_or(self.auth.session_ttl_hours);
        }
        if let Ok(v) = env::var("AUTH_BCRYPT_COST") {
            self.auth.bcrypt_cost = v.parse().unwrap_or(self.auth.bcrypt_cost);
        }
        if let Ok(v) = env::var("UPLOADS_MAX_FILE_SIZE_BYTES") {
            self.uploads.max_file_size_bytes = v.parse().unwrap_or(self.uploads.max_file_size_bytes);
        }
        if let Ok(v) = env::var("CHAT_EXECUTOR_TIMEOUT_SECS") {
            self.chat.executor_timeout_secs = v.parse().unwrap_or(self.chat.executor_timeout_secs);
        }
        if let Ok(v) = env::var("CHAT_HISTORY_LIMIT") {
            self.chat.history_limit = v.parse().unwrap_or(self.chat.history_limit);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                max_connections: 10,
                connection_timeout_secs: 30,
            },
            auth: AuthConfig {
                session_ttl_hours: 24 * 7, // 1 week
                bcrypt_cost: 10,
            },
            uploads: UploadConfig {
                max_file_size_bytes: 10 * 1024 * 1024, // 10MB
            },
            chat: ChatConfig {
                executor_timeout_secs: 120,
                history_limit: 100,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                max_connections: 20,
                connection_timeout_secs: 10,
            },
            auth: AuthConfig {
                session_ttl_hours: 24,
                bcrypt_cost: 10,
            },
            uploads: UploadConfig {
                max_file_size_bytes: 5 * 1024 * 1024, // 5MB
            },
            chat: ChatConfig {
                executor_timeout_secs: 60,
                history_limit: 100,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                max_connections: 50,
                connection_timeout_secs: 5,
            },
            auth: AuthConfig {
                session_ttl_hours: 12,
                bcrypt_cost: 12,
            },
            uploads: UploadConfig {
                max_file_size_bytes: 2 * 1024 * 1024, // 2MB
            },
            chat: ChatConfig {
                executor_timeout_secs: 60,
                history_limit: 50,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.auth.session_ttl_hours, 24 * 7);
        assert_eq!(config.database.max_connections, 10);
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert_eq!(config.auth.bcrypt_cost, 12);
        assert!(config.uploads.max_file_size_bytes < 10 * 1024 * 1024);
    }
}
