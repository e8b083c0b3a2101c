//! Cachefront - Entry Point
//!
//! Binary entry point for the cachefront HTTP server. Lives in the
//! `cachefront` facade crate so the library and binary share one name.

use clap::Parser;
use cachefront_server::run;

/// Command line interface for cachefront
#[derive(Parser, Debug)]
#[command(name = "cachefront")]
#[command(about = "Caching facade over an in-process memory cache and Redis")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<std::path::PathBuf>,

    /// Override the configured listen port
    #[arg(short, long)]
    pub port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    run(cli.config, cli.port).await?;
    Ok(())
}
