use anyhow::Context;
use std::path::PathBuf;

use crate::config::Config;
use crate::db::Store;
use crate::etl;

pub struct LoadArgs {
    pub titles: Option<PathBuf>,
    pub credits: Option<PathBuf>,
    pub reject_log: Option<PathBuf>,
    pub no_reject_log: bool,
}

/// Row-level failures are reported; only unreadable inputs fail the command.
pub async fn cmd_load(config: &Config, args: LoadArgs) -> anyhow::Result<()> {
    let titles = args
        .titles
        .unwrap_or_else(|| PathBuf::from(&config.etl.titles_path));
    let credits = args
        .credits
        .unwrap_or_else(|| PathBuf::from(&config.etl.credits_path));
    let reject_log = if args.no_reject_log {
        None
    } else {
        args.reject_log
            .or_else(|| config.etl.reject_log_path.as_ref().map(PathBuf::from))
    };

    let store = Store::with_pool_options(
        &config.general.database_url,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await
    .context("Failed to open database")?;

    let report = etl::run(&store, &titles, &credits, reject_log.as_deref()).await?;

    println!("{:<18} {:>9} {:>9} {:>7}", "table", "inserted", "skipped", "failed");
    println!("{:-<46}", "");
    for (table, stats) in &report.tables {
        println!(
            "{:<18} {:>9} {:>9} {:>7}",
            table, stats.inserted, stats.skipped, stats.failed
        );
    }
    println!();

    if report.rejected.is_empty() {
        println!("No rows rejected.");
    } else {
        println!("{} rows rejected.", report.rejected.len());
        if let Some(path) = &reject_log {
            println!("Details: {}", path.display());
        }
    }

    Ok(())
}
