//! # TradePulse Analytics Engine
//!
//! This crate turns a list of closed trades into every metric the journal displays:
//! equity curve, drawdown, win/loss statistics, weekday and intraday heatmaps, calendar
//! rollups and per-symbol performance.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** No I/O and no knowledge of storage or presentation. It depends only
//!   on `core-types`.
//! - **Stateless Calculation:** `AnalyticsEngine` takes trades in close-time order and
//!   returns a fresh `PerformanceReport`. It cannot fail; degenerate ratios are carried
//!   as `Ratio::Infinite`.
//! - **No Incremental Updates:** Portfolios (`Aggregator`) and filtered views (`TagFilter`)
//!   are produced by re-running the engine on a different trade list.

pub mod aggregator;
pub mod emotion;
pub mod engine;
pub mod filter;
pub mod period;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use aggregator::{merge_chronologically, Aggregator};
pub use emotion::{emotion_breakdown, EmotionCount};
pub use engine::AnalyticsEngine;
pub use filter::{available_tags, TagFilter};
pub use period::Period;
pub use report::{
    EquityPoint, IntradayCell, IntradayMatrix, PerformanceReport, PeriodBucket, Ratio,
    SymbolPerformance, WeekdayBucket, WEEKDAYS,
};
