//! TaskSync CLI
//!
//! Terminal client for the TaskSync collaborative task manager.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;

use commands::Cli;

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "tasksync=debug,tasksync_client=debug,tasksync_core=debug"
    } else {
        "tasksync=warn,tasksync_client=warn,tasksync_core=warn"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    cli.execute().await
}
