//! Configuration management

use serde::{Deserialize, Serialize};

use crate::db::DbConfig;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub database: DbConfig,
}

impl Config {
    /// Load configuration from `.env`, the environment and defaults
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Config {
            database: DbConfig::from_env()?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Replace the database URL, e.g. from a command-line flag
    pub fn with_database_url(mut self, url: impl Into<String>) -> Self {
        self.database.url = url.into();
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        let url = self.database.url.trim();
        if url.is_empty() {
            anyhow::bail!("Database URL cannot be empty");
        }
        if !url.starts_with("sqlite:") {
            anyhow::bail!("Database URL must use the sqlite: scheme, got '{}'", url);
        }

        if self.database.max_connections == 0 {
            anyhow::bail!("Database max_connections must be greater than 0");
        }
        if self.database.connect_timeout_secs == 0 {
            anyhow::bail!("Database connect timeout must be greater than 0");
        }

        Ok(())
    }
}
