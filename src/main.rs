mod collectors;
mod config;
mod error;
mod merge;
mod models;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::{Command, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("jobharvest=info")),
        )
        .init();

    let config = Config::parse();

    match config.resolved_command() {
        Command::Panel(args) => collectors::runner::scrape_panel(&args, &config.data_dir).await?,
        Command::Boards(args) => collectors::runner::scrape_boards(&args, &config.data_dir).await?,
        Command::Batch(args) => collectors::runner::scrape_batch(&args, &config.data_dir).await?,
        Command::Merge { output } => {
            merge::run(&config.data_dir, &output)?;
        }
        Command::Run(args) => {
            collectors::runner::run_all(&args, &config.data_dir, merge::MERGED_OUTPUT).await?;
        }
    }

    Ok(())
}
