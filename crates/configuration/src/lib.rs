use crate::error::ConfigError;
use crate::settings::Config;
use config::{Environment, File};
use rust_decimal::Decimal;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{Display, GoalDefaults, Ingest, Logging, OutputFormat, Storage};

/// Prefix for environment overrides, e.g. `TRADEPULSE__STORAGE__PATH`.
const ENV_PREFIX: &str = "TRADEPULSE";

/// Loads the application configuration.
///
/// Sources are layered, later ones winning:
/// 1. Built-in defaults.
/// 2. The file at `path`, or an optional `config.toml` in the working directory.
/// 3. Environment variables prefixed with `TRADEPULSE__`.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder()
        .set_default("ingest.utc_offset_minutes", 0)?
        .set_default("storage.path", "tradepulse_accounts.json")?
        .set_default("goals.total_profit", 1000)?
        .set_default("goals.win_rate", 60)?
        .set_default("goals.max_drawdown_pct", 10)?
        .set_default("logging.level", "info")?
        .set_default("display.format", "table")?
        .set_default("display.heatmap_block_hours", 4)?;

    builder = match path {
        Some(path) => builder.add_source(File::from(path).required(true)),
        None => builder.add_source(File::with_name("config").required(false)),
    };

    let config = builder
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize::<Config>()?;

    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    let offset = config.ingest.utc_offset_minutes;
    if offset.abs() >= 24 * 60 {
        return Err(ConfigError::ValidationError(format!(
            "ingest.utc_offset_minutes must be within +/-1439, got {offset}"
        )));
    }

    let block = config.display.heatmap_block_hours;
    if block == 0 || 24 % block != 0 {
        return Err(ConfigError::ValidationError(format!(
            "display.heatmap_block_hours must divide 24, got {block}"
        )));
    }

    if let Some(win_rate) = config.goals.win_rate {
        if win_rate < Decimal::ZERO || win_rate > Decimal::ONE_HUNDRED {
            return Err(ConfigError::ValidationError(format!(
                "goals.win_rate must be between 0 and 100, got {win_rate}"
            )));
        }
    }

    if config.storage.path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "storage.path must not be empty".to_string(),
        ));
    }

    Ok(())
}
