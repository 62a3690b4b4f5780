#![cfg(not(tarpaulin_include))]

use clap::Parser;
use portfolio::app;
use portfolio::config::SiteConfig;

/// Main entry point for the portfolio web server
///
/// Reads `.env` when present, then configuration from flags and environment.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = SiteConfig::parse();
    app::run(config).await
}
