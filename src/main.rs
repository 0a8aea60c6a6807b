mod cli;
mod config;
mod engine;
mod logging;
mod metrics;
mod model;
mod orchestrator;
mod text_summary;
#[cfg(feature = "tui")]
mod tui;

use anyhow::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let is_headless = args.is_headless();

    cli::run(args).await?;
    // Explicitly exit with code 0 on success, especially for headless modes
    if is_headless {
        std::process::exit(0);
    }
    Ok(())
}
