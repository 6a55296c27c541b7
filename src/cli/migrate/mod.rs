//! Migrate command - applies pending schema migrations, or reverts the latest one

use clap::Args;
use tracing::info;

use crate::infrastructure::storage::{Migrator, SqliteMigrator, Store};

#[derive(Args, Debug, PartialEq, Eq, Default)]
pub struct MigrateArgs {
    /// Revert the most recently applied migration instead of applying pending ones
    #[arg(long)]
    pub revert: bool,
}

pub async fn run(args: MigrateArgs) -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    let store = Store::connect(&config.database.to_sqlite_config()).await?;
    let result = if args.revert {
        revert(&store).await
    } else {
        migrate(&store).await
    };
    store.close().await;

    let version = result?;
    info!(url = %config.database.url, version = ?version, revert = args.revert, "Migration finished");

    Ok(())
}

/// Apply every pending migration and return the resulting schema version
pub async fn migrate(store: &Store) -> anyhow::Result<Option<i64>> {
    let migrator = SqliteMigrator::new(store.pool().clone());

    migrator.run().await?;

    Ok(migrator.version().await?)
}

/// Revert the latest applied migration and return the remaining schema version
pub async fn revert(store: &Store) -> anyhow::Result<Option<i64>> {
    let migrator = SqliteMigrator::new(store.pool().clone());

    migrator.revert().await?;

    Ok(migrator.version().await?)
}
