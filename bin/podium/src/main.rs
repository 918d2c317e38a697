//! Podium leaderboard client.

mod cli;
mod commands;
mod config;
mod logging;

use clap::Parser;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    let cli = cli::Cli::parse();
    logging::init_logging(&cli.logs)?;

    commands::run(cli).await
}
