use serde::{Deserialize, Serialize};
use sqlx::migrate::{MigrateError, Migrator};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Embedded schema migrations
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub const DEFAULT_DATABASE_URL: &str = "sqlite://annotrack.db";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 1;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Database start-up errors with contextual information
#[derive(Error, Debug)]
pub enum DbError {
    /// SQL query or connection error
    #[error("Database query failed: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Applying the embedded migrations failed
    #[error("Database migration failed: {0}")]
    Migrate(#[from] MigrateError),

    /// Database configuration is invalid or missing
    #[error(
        "Database configuration error: {0}. Check ANNOTRACK_DATABASE_URL and connection settings."
    )]
    Config(String),
}

impl DbError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

impl DbConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn from_env() -> DbResult<Self> {
        let url = std::env::var("ANNOTRACK_DATABASE_URL")
            .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let max_connections = std::env::var("ANNOTRACK_DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);

        let connect_timeout_secs = std::env::var("ANNOTRACK_DB_CONNECT_TIMEOUT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS);

        Ok(Self {
            url,
            max_connections,
            connect_timeout_secs,
        })
    }

    fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

/// Open a SQLite pool, creating the database file if needed
///
/// Foreign-key enforcement is switched on for every connection. An in-memory
/// database lives only as long as its connection, so it is pinned to a single
/// connection that is never recycled.
pub async fn create_pool(config: &DbConfig) -> DbResult<SqlitePool> {
    if config.max_connections == 0 {
        return Err(DbError::config("max_connections must be at least 1"));
    }

    let connect_options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let mut options = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs));

    if config.is_in_memory() {
        options = options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    }

    let pool = options.connect_with(connect_options).await?;

    tracing::info!(
        url = %config.url,
        max_connections = config.max_connections,
        "Database connection pool created"
    );

    Ok(pool)
}

/// Apply pending schema migrations
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    MIGRATOR.run(pool).await?;
    tracing::debug!("Database migrations applied");
    Ok(())
}

/// Open the pool and bring the schema up to date
pub async fn connect(config: &DbConfig) -> DbResult<SqlitePool> {
    let pool = create_pool(config).await?;
    run_migrations(&pool).await?;
    Ok(pool)
}

pub async fn health_check(pool: &SqlitePool) -> DbResult<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map(|_| ())
        .map_err(DbError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_config() {
        let config = DbConfig::default();
        assert_eq!(config.url, "sqlite://annotrack.db");
        assert_eq!(config.max_connections, 1);
        assert_eq!(config.connect_timeout_secs, 30);
    }

    #[test]
    #[serial]
    fn test_config_from_env() {
        std::env::set_var("ANNOTRACK_DATABASE_URL", "sqlite://other.db");
        std::env::set_var("ANNOTRACK_DB_MAX_CONNECTIONS", "4");

        let config = DbConfig::from_env().unwrap();
        assert_eq!(config.max_connections, 4);
        assert_eq!(config.url, "sqlite://other.db");

        std::env::remove_var("ANNOTRACK_DATABASE_URL");
        std::env::remove_var("ANNOTRACK_DB_MAX_CONNECTIONS");
    }

    #[test]
    #[serial]
    fn test_config_from_env_defaults_url() {
        std::env::remove_var("ANNOTRACK_DATABASE_URL");
        let config = DbConfig::from_env().unwrap();
        assert_eq!(config.url, DEFAULT_DATABASE_URL);
    }

    #[tokio::test]
    async fn test_in_memory_pool_keeps_schema() {
        let pool = connect(&DbConfig::new("sqlite::memory:")).await.unwrap();
        health_check(&pool).await.unwrap();

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('experiments', 'runs', 'images') ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();
        assert_eq!(tables, vec!["experiments", "images", "runs"]);
    }

    #[tokio::test]
    async fn test_file_database_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fresh.db");
        let url = format!("sqlite://{}", path.display());

        let pool = connect(&DbConfig::new(url)).await.unwrap();
        assert!(path.exists());

        let fk_enabled: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(fk_enabled, 1);
    }

    #[tokio::test]
    async fn test_zero_connections_rejected() {
        let mut config = DbConfig::new("sqlite::memory:");
        config.max_connections = 0;
        assert!(matches!(create_pool(&config).await, Err(DbError::Config(_))));
    }
}
