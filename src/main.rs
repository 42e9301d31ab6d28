//! Aspen — website configuration and lifecycle driver
//!
//! Resolves the website configuration from the environment and command
//! line, installs logging, and runs the selected command.

use clap::Parser;

use aspen::WebsiteConfig;
use aspen::cli::Cli;
use aspen::logging::init_logging;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match WebsiteConfig::from_env().and_then(|c| cli.resolve(c)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!("Starting Aspen v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = cli.execute(config).await {
        tracing::error!("Aspen error: {}", e);
        std::process::exit(1);
    }
}
