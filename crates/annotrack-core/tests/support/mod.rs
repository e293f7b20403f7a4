//! Shared setup for Annotrack integration tests
//!
//! Each test gets its own SQLite file in a temporary directory with the
//! embedded migrations applied.

#![allow(dead_code)]

use annotrack_core::db::{connect, DbConfig};
use anyhow::{Context, Result};
use sqlx::SqlitePool;
use tempfile::TempDir;

pub struct TestStore {
    pool: SqlitePool,
    _dir: TempDir,
}

impl TestStore {
    pub async fn start() -> Result<Self> {
        let dir = tempfile::tempdir().context("Failed to create temp dir")?;
        let url = format!("sqlite://{}", dir.path().join("annotrack.db").display());
        let pool = connect(&DbConfig::new(url))
            .await
            .context("Failed to open test database")?;
        Ok(Self { pool, _dir: dir })
    }

    pub fn pool(&self) -> SqlitePool {
        self.pool.clone()
    }

    pub async fn count(&self, table: &str) -> Result<i64> {
        let count = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

/// Fresh single-connection in-memory store, for property tests
pub async fn memory_pool() -> Result<SqlitePool> {
    Ok(connect(&DbConfig::new("sqlite::memory:")).await?)
}
