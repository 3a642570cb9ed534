mod cli;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::info;
use spicy_contributions::output;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    output::print_banner();

    let cli = Cli::parse();
    info!("Starting Spicy Contributions");
    cli.execute().await?;

    Ok(())
}
