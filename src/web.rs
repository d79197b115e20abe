#![cfg(not(tarpaulin_include))]

use finsheet::app;
use finsheet::config::ServerConfig;

/// Main entry point for the import service
///
/// Starts the HTTP service that receives workbook uploads, returns the
/// imported financial record and serves the import template.
///
/// # Arguments
/// * `[bind_addr]` - Listen address, `127.0.0.1:3000` by default
/// * `[default_industry]` - Industry for uploads that do not name one
///
/// Log output is controlled with `RUST_LOG` (`info` when unset).
///
/// # Returns
/// * `Result<(), Box<dyn std::error::Error>>` - Success or error object
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::from_args(std::env::args().skip(1));
    log::info!(
        "Starting import service (default industry: {})",
        config.default_industry
    );

    app::run(config).await
}
