// Cofre — Application Entry Point
//
// Parses CLI arguments, initializes structured logging (which never emits
// secret values), and dispatches to the command handler. Uses the tokio
// async runtime for the remote store round trips.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cofre::cli::{execute, Cli};

#[tokio::main]
async fn main() {
    // Initialize tracing with env filter (RUST_LOG=cofre=debug for verbose
    // output). The default level is `info`, which never includes secrets.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cofre=info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    if let Err(e) = execute(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
