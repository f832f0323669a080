use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub ingest: Ingest,
    pub storage: Storage,
    pub goals: GoalDefaults,
    pub logging: Logging,
    pub display: Display,
}

/// Contains parameters for reading broker exports.
#[derive(Debug, Clone, Deserialize)]
pub struct Ingest {
    /// Offset applied to timestamps written without one (e.g. `2024-01-01 10:00`).
    /// 120 means UTC+02:00.
    pub utc_offset_minutes: i32,
}

/// Where the account book is persisted.
#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
    pub path: PathBuf,
}

/// Goals attached to every newly imported account.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoalDefaults {
    pub total_profit: Option<Decimal>,
    /// Target win rate in percent.
    pub win_rate: Option<Decimal>,
    /// Drawdown limit in percent.
    pub max_drawdown_pct: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Logging {
    /// An `EnvFilter` directive such as `info` or `analytics=debug,info`.
    pub level: String,
    /// When set, logs go to a daily rolling file in this directory instead of stderr.
    pub directory: Option<PathBuf>,
}

/// Controls how reports are printed.
#[derive(Debug, Clone, Deserialize)]
pub struct Display {
    pub format: OutputFormat,
    /// Width of the intraday heatmap blocks. Must divide 24.
    pub heatmap_block_hours: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Table,
    Json,
}
