use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use driftwatch::app::AppContext;
use driftwatch::cli::{commands, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { dry_run, deadline } => {
            let ctx = AppContext::with_limits(
                cli.db,
                cli.workers,
                Duration::from_secs(deadline),
                dry_run,
            )?;
            commands::run(&ctx, &cli.config).await?;
        }
        Commands::Validate => {
            commands::validate(&cli.config)?;
        }
        Commands::List => {
            commands::list(&cli.config)?;
        }
    }

    Ok(())
}
