//! Storage infrastructure - SQLite store and schema migrations

pub mod migrations;
mod store;

pub use migrations::{run_migrations, schema_migrations, Migration, Migrator, SqliteMigrator};
pub use store::{SqliteConfig, Store};

/// Returns the database message when the error is a unique-constraint violation
pub(crate) fn unique_violation(error: &sqlx::Error) -> Option<String> {
    match error {
        sqlx::Error::Database(db) if db.is_unique_violation() => Some(db.message().to_string()),
        _ => None,
    }
}
