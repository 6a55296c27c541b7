//! SQLite store with connection pooling

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use tracing::{debug, info};

use super::migrations::run_migrations;
use crate::domain::DomainError;

/// SQLite store configuration
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// Database connection URL, e.g. `sqlite://todos.db`
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// Seconds to wait for a free connection
    pub acquire_timeout_secs: u64,
    /// Idle timeout in seconds
    pub idle_timeout_secs: u64,
    /// Seconds a statement waits on a locked database before failing
    pub busy_timeout_secs: u64,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://todos.db".to_string(),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout_secs: 30,
            idle_timeout_secs: 600,
            busy_timeout_secs: 5,
        }
    }
}

impl SqliteConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn with_min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn with_acquire_timeout(mut self, secs: u64) -> Self {
        self.acquire_timeout_secs = secs;
        self
    }

    pub fn with_idle_timeout(mut self, secs: u64) -> Self {
        self.idle_timeout_secs = secs;
        self
    }
}

/// Handle to the relational store
///
/// Built once at startup and cloned into every repository. Cloning shares
/// the underlying pool.
#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Wrap an existing pool
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if needed) the database described by the config
    pub async fn connect(config: &SqliteConfig) -> Result<Self, DomainError> {
        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| DomainError::storage(format!("Invalid database URL: {}", e)))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(config.busy_timeout_secs));

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .connect_with(options)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to connect to SQLite: {}", e)))?;

        info!(url = %config.url, max_connections = config.max_connections, "SQLite pool ready");

        Ok(Self::from_pool(pool))
    }

    /// Private in-memory database with the schema applied
    ///
    /// The pool holds a single connection that never expires, since the
    /// database disappears with its last connection.
    pub async fn in_memory() -> Result<Self, DomainError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| DomainError::storage(format!("Invalid database URL: {}", e)))?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to open in-memory SQLite: {}", e)))?;

        let store = Self::from_pool(pool);
        store.migrate().await?;

        Ok(store)
    }

    /// Returns a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Apply all pending schema migrations
    pub async fn migrate(&self) -> Result<(), DomainError> {
        run_migrations(&self.pool).await
    }

    /// Round-trip a trivial query, used by readiness checks
    pub async fn ping(&self) -> Result<(), DomainError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Store ping failed: {}", e)))?;

        Ok(())
    }

    /// Close every pooled connection
    pub async fn close(&self) {
        debug!("Closing SQLite pool");
        self.pool.close().await;
    }
}
