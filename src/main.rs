//! SnipVault Server: snippet storage with optimistic concurrency.
//!
//! Main entry point that loads configuration, initializes logging, and
//! starts the HTTP server.

use tracing_subscriber::{EnvFilter, fmt};

use snipvault_core::config::{AppConfig, LoggingConfig};
use snipvault_core::error::AppError;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.logging);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        store = %config.store.provider,
        "Starting SnipVault"
    );

    if let Err(e) = snipvault_api::run_server(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from `config/` and `SNIPVAULT__*` environment variables.
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("SNIPVAULT_ENV").unwrap_or_else(|_| "development".to_string());
    let dir = std::env::var("SNIPVAULT_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());
    AppConfig::load_from(&dir, &env)
}

/// Initialize tracing/logging
fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}
