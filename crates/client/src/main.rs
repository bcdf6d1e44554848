//! tablealter CLI entry point.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tablealter_client::admin::{Admin, AlterOptions};
use tablealter_client::cli::{Cli, Commands};
use tablealter_client::config::Config;
use tablealter_client::output::format_output;
use tablealter_client::propagator::TracingPropagator;
use tablealter_client::storage::JsonFileAuthority;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only command output.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tablealter=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = Config::from_env();
    if let Some(store) = cli.store {
        config.store_path = store;
    }
    if let Commands::Alter(alter) = &cli.command {
        if let Some(policy) = alter.lazy_policy {
            config.lazy_policy = policy.into();
        }
    }

    tracing::debug!(store = %config.store_path.display(), "Using descriptor store");
    let admin = Admin::new(JsonFileAuthority::new(&config.store_path), TracingPropagator)
        .with_mutator_config(config.mutator_config());

    match cli.command {
        Commands::Create(create) => {
            let created = admin.create(&create.table, &create.families).await?;
            if !cli.quiet {
                println!("{}", format_output(&created, cli.format)?);
            }
        }
        Commands::Describe(describe) => {
            let versioned = admin.describe(&describe.table).await?;
            println!("{}", format_output(&versioned, cli.format)?);
        }
        Commands::Alter(alter) => {
            let options = AlterOptions {
                dry_run: alter.dry_run,
            };
            let outcome = admin.alter(&alter.table, &alter.elements(), options).await?;
            if cli.quiet {
                println!("{}", format_output(&outcome.change_set, cli.format)?);
            } else {
                println!("{}", format_output(&outcome, cli.format)?);
            }
        }
    }

    Ok(())
}
