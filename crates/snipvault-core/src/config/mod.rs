//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section. Every field carries a default, so an empty configuration
//! yields a runnable in-memory server.

pub mod app;
pub mod auth;
pub mod database;
pub mod logging;
pub mod snippets;
pub mod store;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::AuthConfig;
pub use self::database::DatabaseConfig;
pub use self::logging::LoggingConfig;
pub use self::snippets::SnippetConfig;
pub use self::store::StoreConfig;

use crate::error::AppError;

/// Prefix for environment variable overrides (`SNIPVAULT__SERVER__PORT=9000`).
pub const ENV_PREFIX: &str = "SNIPVAULT";

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// PostgreSQL connection settings (used by the `postgres` store provider).
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Document store selection.
    #[serde(default)]
    pub store: StoreConfig,
    /// Identity/token settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Snippet lifecycle settings.
    #[serde(default)]
    pub snippets: SnippetConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `config/default.toml` with an environment-specific overlay
    /// (`config/{env}.toml`) and environment variables prefixed with
    /// `SNIPVAULT__`. Missing files are skipped.
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::load_from("config", env)
    }

    /// Same as [`AppConfig::load`] with an explicit configuration directory.
    pub fn load_from(dir: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(&format!("{dir}/default")).required(false))
            .add_source(config::File::with_name(&format!("{dir}/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
