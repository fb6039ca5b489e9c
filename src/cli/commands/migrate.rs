use anyhow::Context;
use sea_orm_migration::MigratorTrait;

use crate::config::Config;
use crate::db::{Store, migrator::Migrator};

/// Opening the store applies pending migrations.
pub async fn cmd_migrate(config: &Config) -> anyhow::Result<()> {
    let store = Store::with_pool_options(&config.general.database_url, 1, 1)
        .await
        .with_context(|| format!("Failed to migrate {}", config.general.database_url))?;

    let applied = Migrator::get_applied_migrations(&store.conn).await?;
    println!(
        "Schema up to date: {} of {} migrations applied.",
        applied.len(),
        Migrator::migrations().len()
    );
    Ok(())
}
