mod cli;
mod commands;
mod config;
mod error;
mod fetch;
mod filter;
mod model;
mod output;
mod projection;
mod tracker;
mod util;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;

fn init_tracing(verbose: bool) {
    let default = if verbose { "jirafa=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = config::load_settings(cli.config.as_deref())?;
    commands::dispatch(&cli.command, &settings, &cli.output_dir).await
}
