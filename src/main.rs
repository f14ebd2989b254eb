// src/main.rs
mod cli;
mod commands;
mod output;

use clap::Parser;
use cli::Cli;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    // Load environment variables before the filter reads RUST_LOG
    dotenvy::dotenv().ok();

    // Initialize logging (stderr, so page output stays clean)
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = commands::execute(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
