use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{ApiConfig, LoggingConfig, MAX_PEERS, ServerConfig, Settings};

/// Environment variable holding the market-data API key.
pub const API_KEY_ENV: &str = "FINANCIAL_API_KEY";

/// Prefix for environment overrides, e.g. `LONGEVITY__SERVER__PORT=8080`.
pub const ENV_PREFIX: &str = "LONGEVITY";

/// Loads the application configuration from `config.toml` in the working directory.
pub fn load_config() -> Result<Settings, ConfigError> {
    load_config_from(Path::new("config.toml"))
}

/// Loads the application configuration, layering sources in this order:
///
/// 1. built-in defaults,
/// 2. the TOML file at `path` (optional, skipped when missing),
/// 3. `LONGEVITY__*` environment variables,
/// 4. `FINANCIAL_API_KEY` for the provider key.
///
/// A `.env` file in the working directory is read first, so any of the
/// variables above may live there.
pub fn load_config_from(path: &Path) -> Result<Settings, ConfigError> {
    dotenvy::dotenv().ok();
    let api_key = std::env::var(API_KEY_ENV).ok();
    build_settings(path, api_key)
}

fn build_settings(path: &Path, api_key: Option<String>) -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .set_override_option("api.api_key", api_key)?
        .build()?;

    let settings = builder.try_deserialize::<Settings>()?;
    settings.validate()?;
    tracing::debug!(config = ?settings, "Configuration loaded.");

    Ok(settings)
}

/// Command-line arguments shared by every binary that reads the configuration.
#[cfg(feature = "clap")]
#[derive(Debug, Clone, clap::Args)]
pub struct ConfigArgs {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = "config.toml")]
    pub config: std::path::PathBuf,
}

#[cfg(feature = "clap")]
impl ConfigArgs {
    pub fn load(&self) -> Result<Settings, ConfigError> {
        load_config_from(&self.config)
    }
}
