//! Database migrations infrastructure

use async_trait::async_trait;
use sqlx::sqlite::SqlitePool;
use tracing::info;

use crate::domain::DomainError;

/// Trait for running database migrations
#[async_trait]
pub trait Migrator: Send + Sync {
    /// Runs all pending migrations
    async fn run(&self) -> Result<(), DomainError>;

    /// Reverts the last migration
    async fn revert(&self) -> Result<(), DomainError>;

    /// Returns the current migration version
    async fn version(&self) -> Result<Option<i64>, DomainError>;
}

/// SQLite migrator recording applied versions in `_migrations`
#[derive(Debug)]
pub struct SqliteMigrator {
    pool: SqlitePool,
    migrations: Vec<Migration>,
}

impl SqliteMigrator {
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_migrations(pool, schema_migrations())
    }

    pub fn with_migrations(pool: SqlitePool, migrations: Vec<Migration>) -> Self {
        Self { pool, migrations }
    }

    /// Creates the migrations table if it doesn't exist
    async fn ensure_migrations_table(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version INTEGER PRIMARY KEY,
                description TEXT NOT NULL,
                installed_on DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create migrations table: {}", e)))?;

        Ok(())
    }

    async fn is_applied(&self, version: i64) -> Result<bool, DomainError> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM _migrations WHERE version = ?)")
            .bind(version)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to check migration status: {}", e)))
    }

    /// Applies a single migration and records it in one transaction
    pub async fn run_migration(&self, migration: &Migration) -> Result<(), DomainError> {
        self.ensure_migrations_table().await?;

        if self.is_applied(migration.version).await? {
            return Ok(());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin migration: {}", e)))?;

        sqlx::Executor::execute(&mut *tx, sqlx::raw_sql(&migration.up))
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to run migration {}: {}",
                    migration.version, e
                ))
            })?;

        sqlx::query("INSERT INTO _migrations (version, description) VALUES (?, ?)")
            .bind(migration.version)
            .bind(&migration.description)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to record migration {}: {}",
                    migration.version, e
                ))
            })?;

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit migration: {}", e)))?;

        info!(version = migration.version, description = %migration.description, "Applied migration");

        Ok(())
    }

    /// Reverts a single migration
    pub async fn revert_migration(&self, migration: &Migration) -> Result<(), DomainError> {
        self.ensure_migrations_table().await?;

        if !self.is_applied(migration.version).await? {
            return Ok(());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin revert: {}", e)))?;

        sqlx::Executor::execute(&mut *tx, sqlx::raw_sql(&migration.down))
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to revert migration {}: {}",
                    migration.version, e
                ))
            })?;

        sqlx::query("DELETE FROM _migrations WHERE version = ?")
            .bind(migration.version)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to remove migration record {}: {}",
                    migration.version, e
                ))
            })?;

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit revert: {}", e)))?;

        Ok(())
    }

    /// Returns the latest applied migration version
    pub async fn current_version(&self) -> Result<Option<i64>, DomainError> {
        self.ensure_migrations_table().await?;

        let version: Option<i64> = sqlx::query_scalar("SELECT MAX(version) FROM _migrations")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get migration version: {}", e)))?;

        Ok(version)
    }
}

#[async_trait]
impl Migrator for SqliteMigrator {
    async fn run(&self) -> Result<(), DomainError> {
        for migration in &self.migrations {
            self.run_migration(migration).await?;
        }

        Ok(())
    }

    async fn revert(&self) -> Result<(), DomainError> {
        let Some(current) = self.current_version().await? else {
            return Ok(());
        };

        match self.migrations.iter().find(|m| m.version == current) {
            Some(migration) => self.revert_migration(migration).await,
            None => Err(DomainError::storage(format!(
                "Applied migration {} is unknown to this build",
                current
            ))),
        }
    }

    async fn version(&self) -> Result<Option<i64>, DomainError> {
        self.current_version().await
    }
}

/// Represents a database migration
#[derive(Debug, Clone)]
pub struct Migration {
    /// Migration version, strictly increasing
    pub version: i64,
    /// Human-readable description
    pub description: String,
    /// SQL to run when applying the migration
    pub up: String,
    /// SQL to run when reverting the migration
    pub down: String,
}

impl Migration {
    pub fn new(
        version: i64,
        description: impl Into<String>,
        up: impl Into<String>,
        down: impl Into<String>,
    ) -> Self {
        Self {
            version,
            description: description.into(),
            up: up.into(),
            down: down.into(),
        }
    }
}

/// Schema for users, todos, teams, team members and team todos
pub fn schema_migrations() -> Vec<Migration> {
    vec![
        Migration::new(
            1,
            "Create users table",
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                created_at DATETIME NOT NULL,
                updated_at DATETIME NOT NULL
            );
            "#,
            r#"
            DROP TABLE IF EXISTS users;
            "#,
        ),
        Migration::new(
            2,
            "Create todos table",
            r#"
            CREATE TABLE IF NOT EXISTS todos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                title TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                completed BOOLEAN NOT NULL DEFAULT FALSE,
                created_at DATETIME NOT NULL,
                updated_at DATETIME NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_todos_user_created ON todos(user_id, created_at);
            "#,
            r#"
            DROP TABLE IF EXISTS todos;
            "#,
        ),
        Migration::new(
            3,
            "Create teams table",
            r#"
            CREATE TABLE IF NOT EXISTS teams (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                code TEXT NOT NULL UNIQUE,
                created_by INTEGER NOT NULL,
                created_at DATETIME NOT NULL,
                updated_at DATETIME NOT NULL,
                FOREIGN KEY (created_by) REFERENCES users(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_teams_created_by ON teams(created_by);
            "#,
            r#"
            DROP TABLE IF EXISTS teams;
            "#,
        ),
        Migration::new(
            4,
            "Create team_members table",
            r#"
            CREATE TABLE IF NOT EXISTS team_members (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                team_id INTEGER NOT NULL,
                user_id INTEGER NOT NULL,
                created_at DATETIME NOT NULL,
                FOREIGN KEY (team_id) REFERENCES teams(id) ON DELETE CASCADE,
                FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
                UNIQUE (team_id, user_id)
            );
            CREATE INDEX IF NOT EXISTS idx_team_members_user ON team_members(user_id);
            "#,
            r#"
            DROP TABLE IF EXISTS team_members;
            "#,
        ),
        Migration::new(
            5,
            "Create team_todos table",
            r#"
            CREATE TABLE IF NOT EXISTS team_todos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                team_id INTEGER NOT NULL,
                created_by INTEGER NOT NULL,
                title TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                completed BOOLEAN NOT NULL DEFAULT FALSE,
                created_at DATETIME NOT NULL,
                updated_at DATETIME NOT NULL,
                FOREIGN KEY (team_id) REFERENCES teams(id) ON DELETE CASCADE,
                FOREIGN KEY (created_by) REFERENCES users(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_team_todos_team_created ON team_todos(team_id, created_at);
            "#,
            r#"
            DROP TABLE IF EXISTS team_todos;
            "#,
        ),
    ]
}

/// Runs all pending schema migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DomainError> {
    SqliteMigrator::new(pool.clone()).run().await
}
