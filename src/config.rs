use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// 存储后端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Surreal,
    Memory,
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown storage backend: {0}")]
pub struct UnknownStorageBackend(String);

impl FromStr for StorageBackend {
    type Err = UnknownStorageBackend;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "surreal" | "surrealdb" => Ok(StorageBackend::Surreal),
            "memory" | "mem" => Ok(StorageBackend::Memory),
            other => Err(UnknownStorageBackend(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Runtime
    pub environment: String,
    pub log_level: String,

    // Database configuration
    pub storage_backend: StorageBackend,
    pub database_url: String,
    pub database_namespace: String,
    pub database_name: String,
    pub database_username: String,
    pub database_password: String,

    // Feature flags
    pub enable_comment_notifications: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Config {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),

            storage_backend: env::var("STORAGE_BACKEND")
                .unwrap_or_else(|_| "surreal".to_string())
                .parse()?,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            database_namespace: env::var("DATABASE_NAMESPACE")
                .unwrap_or_else(|_| "rainbow".to_string()),
            database_name: env::var("DATABASE_NAME")
                .unwrap_or_else(|_| "answers".to_string()),
            database_username: env::var("DATABASE_USERNAME")
                .unwrap_or_else(|_| "root".to_string()),
            database_password: env::var("DATABASE_PASSWORD")
                .unwrap_or_else(|_| "root".to_string()),

            enable_comment_notifications: env::var("ENABLE_COMMENT_NOTIFICATIONS")
                .unwrap_or_else(|_| "true".to_string())
                .parse()?,
        })
    }

    /// 内存数据库不需要登录
    pub fn requires_signin(&self) -> bool {
        !self.database_url.starts_with("mem://")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            log_level: "info".to_string(),
            storage_backend: StorageBackend::Memory,
            database_url: "mem://".to_string(),
            database_namespace: "rainbow".to_string(),
            database_name: "answers".to_string(),
            database_username: "root".to_string(),
            database_password: "root".to_string(),
            enable_comment_notifications: true,
        }
    }
}
