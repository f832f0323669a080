use chrono::Weekday;
use core_types::Trade;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Weekdays in heatmap order. Index 0 is Sunday.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// A ratio whose denominator may legitimately be zero.
///
/// A strategy with no losing trades has an unbounded profit factor. That is a valid
/// result, not an error, so it is modelled explicitly instead of leaning on float infinity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Ratio {
    Finite(Decimal),
    Infinite,
}

impl Ratio {
    /// `numerator / denominator`, or `Infinite` when the denominator is zero or the
    /// quotient exceeds the `Decimal` range.
    pub fn of(numerator: Decimal, denominator: Decimal) -> Self {
        match numerator.checked_div(denominator) {
            Some(value) => Ratio::Finite(value),
            None => Ratio::Infinite,
        }
    }

    pub fn value(&self) -> Option<Decimal> {
        match self {
            Ratio::Finite(v) => Some(*v),
            Ratio::Infinite => None,
        }
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self, Ratio::Infinite)
    }
}

impl Default for Ratio {
    fn default() -> Self {
        Ratio::Finite(Decimal::ZERO)
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ratio::Finite(v) => write!(f, "{:.2}", v),
            Ratio::Infinite => f.write_str("N/A"),
        }
    }
}

/// A point in the equity curve: the running balance after the n-th trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquityPoint {
    /// 1-based position of the trade in the input.
    pub trade_number: usize,
    pub balance: Decimal,
}

/// Trades and profit for all trades closed on one day of the week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdayBucket {
    pub weekday: Weekday,
    pub trades: usize,
    pub profit: Decimal,
}

/// One cell of the weekday x hour-of-day matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntradayCell {
    pub weekday: Weekday,
    /// Start hour of the cell, 0-23.
    pub hour: u32,
    pub trades: usize,
    pub profit: Decimal,
}

/// Per-hour performance keyed by weekday and hour of the close timestamp.
///
/// Only cells that received at least one trade are stored, ordered Sunday first and then
/// by hour.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntradayMatrix {
    pub cells: Vec<IntradayCell>,
}

impl IntradayMatrix {
    pub fn cell(&self, weekday: Weekday, hour: u32) -> Option<&IntradayCell> {
        self.cells
            .iter()
            .find(|c| c.weekday == weekday && c.hour == hour)
    }

    /// Folds the hourly cells into blocks of `block_hours` for display.
    ///
    /// Returns a dense grid: every weekday gets one cell per block, empty blocks included.
    pub fn coarsen(&self, block_hours: u32) -> Vec<IntradayCell> {
        let block = block_hours.clamp(1, 24);
        let mut grid = Vec::new();
        for weekday in WEEKDAYS {
            for start in (0..24).step_by(block as usize) {
                let (trades, profit) = self
                    .cells
                    .iter()
                    .filter(|c| c.weekday == weekday && c.hour >= start && c.hour < start + block)
                    .fold((0, Decimal::ZERO), |(n, p), c| {
                        (n + c.trades, p.saturating_add(c.profit))
                    });
                grid.push(IntradayCell {
                    weekday,
                    hour: start,
                    trades,
                    profit,
                });
            }
        }
        grid
    }
}

/// Summed profit and trade count for a single calendar period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodBucket {
    /// `YYYY-Www`, `YYYY-MM` or `YYYY` depending on the granularity.
    pub period: String,
    pub profit: Decimal,
    pub trades: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolPerformance {
    pub symbol: String,
    pub profit: Decimal,
    pub win_rate: Decimal,
    pub trades: usize,
}

/// A complete snapshot of everything derived from a list of closed trades.
///
/// Reports are never patched. Any change to the trade list means computing a new one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    // I. Trade-Level Statistics
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub win_rate: Decimal,

    // II. Profitability
    pub total_profit: Decimal,
    pub gross_profit: Decimal,
    pub gross_loss: Decimal,
    pub profit_factor: Ratio,
    pub average_win: Decimal,
    /// Always <= 0.
    pub average_loss: Decimal,
    pub risk_reward_ratio: Ratio,

    // III. Drawdown
    pub max_drawdown: Decimal,
    pub max_drawdown_pct: Decimal,

    // IV. Series
    pub equity_curve: Vec<EquityPoint>,
    pub weekday_heatmap: Vec<WeekdayBucket>,
    pub intraday: IntradayMatrix,
    pub weekly: Vec<PeriodBucket>,
    pub monthly: Vec<PeriodBucket>,
    pub yearly: Vec<PeriodBucket>,
    pub symbols: Vec<SymbolPerformance>,

    pub trades: Vec<Trade>,
}

impl PerformanceReport {
    /// Creates the report of an empty trade list: zero scalars, empty series.
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn ratio_with_zero_denominator_is_infinite() {
        assert_eq!(Ratio::of(dec!(10), Decimal::ZERO), Ratio::Infinite);
        assert_eq!(Ratio::of(dec!(10), dec!(4)), Ratio::Finite(dec!(2.5)));
    }

    #[test]
    fn infinite_ratio_renders_as_not_available() {
        assert_eq!(Ratio::Infinite.to_string(), "N/A");
        assert_eq!(Ratio::Finite(dec!(1.256)).to_string(), "1.26");
    }

    #[test]
    fn ratio_serializes_with_explicit_kind() {
        let json = serde_json::to_value(Ratio::Infinite).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "infinite" }));
    }

    #[test]
    fn coarsen_sums_hours_into_blocks() {
        let matrix = IntradayMatrix {
            cells: vec![
                IntradayCell { weekday: Weekday::Mon, hour: 9, trades: 2, profit: dec!(30) },
                IntradayCell { weekday: Weekday::Mon, hour: 10, trades: 1, profit: dec!(-5) },
                IntradayCell { weekday: Weekday::Mon, hour: 13, trades: 1, profit: dec!(7) },
            ],
        };

        let grid = matrix.coarsen(4);

        assert_eq!(grid.len(), 7 * 6);
        let block = grid
            .iter()
            .find(|c| c.weekday == Weekday::Mon && c.hour == 8)
            .unwrap();
        assert_eq!(block.trades, 3);
        assert_eq!(block.profit, dec!(25));
        let afternoon = grid
            .iter()
            .find(|c| c.weekday == Weekday::Mon && c.hour == 12)
            .unwrap();
        assert_eq!(afternoon.profit, dec!(7));
    }
}
