//! cdpdocs CLI: ask questions about CDP documentation.
//!
//! Crawls the Segment, mParticle, Lytics, and Zeotap documentation sites into
//! an in-memory index, then answers questions against it.

mod commands;
mod repl;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
