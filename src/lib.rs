pub mod api;
pub mod cli;
pub mod clients;
pub mod config;
pub mod db;
pub mod domain;
pub mod entities;
pub mod etl;
pub mod recommender;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, LoadArgs, RecommendArgs};
pub use config::Config;
use config::GeneralConfig;
use recommender::Rule;

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    init_logging(&config.general)?;

    if matches!(cli.command, Commands::Init) {
        return cli::cmd_init();
    }

    config.validate()?;

    match cli.command {
        Commands::Init => Ok(()),

        Commands::Migrate => cli::cmd_migrate(&config).await,

        Commands::Load {
            titles,
            credits,
            reject_log,
            no_reject_log,
        } => {
            cli::cmd_load(
                &config,
                LoadArgs {
                    titles,
                    credits,
                    reject_log,
                    no_reject_log,
                },
            )
            .await
        }

        Commands::Serve { port } => {
            let prometheus_handle = if config.server.metrics_enabled {
                use metrics_exporter_prometheus::PrometheusBuilder;
                let handle = PrometheusBuilder::new()
                    .install_recorder()
                    .context("Failed to install Prometheus recorder")?;
                info!("Prometheus metrics recorder initialized");
                Some(handle)
            } else {
                None
            };
            cli::cmd_serve(config, port, prometheus_handle).await
        }

        Commands::Recommend {
            genre,
            min_score,
            count,
            kind,
            user_id,
            submit,
        } => {
            cli::cmd_recommend(
                &config,
                RecommendArgs {
                    rule: Rule {
                        genre,
                        min_score,
                        count,
                    },
                    kinds: kind.kinds(),
                    user_id,
                    submit,
                },
            )
            .await
        }
    }
}

/// `RUST_LOG` wins over `general.log_level`.
fn init_logging(general: &GeneralConfig) -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&general.log_level))
        .context("Invalid log level")?;

    let registry = tracing_subscriber::registry().with(env_filter);

    if general.log_format.eq_ignore_ascii_case("json") {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?;
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()?;
    }

    Ok(())
}
