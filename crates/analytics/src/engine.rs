use crate::period::Period;
use crate::report::{
    EquityPoint, IntradayCell, IntradayMatrix, PerformanceReport, Ratio, SymbolPerformance,
    WeekdayBucket, WEEKDAYS,
};
use chrono::{Datelike, Timelike};
use core_types::Trade;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

/// A stateless calculator for deriving performance metrics from closed trades.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The main entry point for calculating performance metrics.
    ///
    /// # Arguments
    ///
    /// * `trades` - Closed trades, already sorted ascending by close time. The order is
    ///   trusted: the equity curve and drawdown are walked in slice order.
    ///
    /// # Returns
    ///
    /// A fully populated `PerformanceReport`. This never fails; an empty slice yields
    /// the zeroed report.
    pub fn calculate(&self, trades: &[Trade]) -> PerformanceReport {
        let mut report = PerformanceReport::new();

        if trades.is_empty() {
            return report;
        }

        self.calculate_profitability(trades, &mut report);
        self.calculate_drawdown(trades, &mut report);
        self.calculate_time_buckets(trades, &mut report);
        self.calculate_symbols(trades, &mut report);
        report.trades = trades.to_vec();

        tracing::debug!(
            trades = report.total_trades,
            total_profit = %report.total_profit,
            win_rate = %report.win_rate.round_dp(2),
            max_drawdown = %report.max_drawdown,
            "Performance report calculated"
        );

        report
    }

    /// Counts, win rate, profit factor and average win/loss.
    fn calculate_profitability(&self, trades: &[Trade], report: &mut PerformanceReport) {
        report.total_trades = trades.len();

        for trade in trades {
            report.total_profit = report.total_profit.saturating_add(trade.profit);

            if trade.is_win() {
                report.gross_profit = report.gross_profit.saturating_add(trade.profit);
                report.winning_trades += 1;
            } else {
                report.gross_loss = report.gross_loss.saturating_add(trade.profit);
                report.losing_trades += 1;
            }
        }
        report.gross_loss = report.gross_loss.abs();

        report.win_rate = percentage(report.winning_trades, report.total_trades);
        report.profit_factor = Ratio::of(report.gross_profit, report.gross_loss);

        if report.winning_trades > 0 {
            report.average_win = report.gross_profit / Decimal::from(report.winning_trades);
        }
        if report.losing_trades > 0 && !report.gross_loss.is_zero() {
            report.average_loss = -(report.gross_loss / Decimal::from(report.losing_trades));
        }
        report.risk_reward_ratio = Ratio::of(report.average_win, report.average_loss.abs());
    }

    /// Builds the equity curve and tracks the deepest peak-to-trough decline.
    ///
    /// The balance and the peak both start at zero. The percentage is taken against the
    /// peak in force when the maximum was observed, not the final peak.
    fn calculate_drawdown(&self, trades: &[Trade], report: &mut PerformanceReport) {
        let mut balance = Decimal::ZERO;
        let mut peak = Decimal::ZERO;
        let mut equity_curve = Vec::with_capacity(trades.len());

        for (index, trade) in trades.iter().enumerate() {
            balance = balance.saturating_add(trade.profit);
            if balance > peak {
                peak = balance;
            }

            let drawdown = peak.saturating_sub(balance);
            if drawdown > report.max_drawdown {
                report.max_drawdown = drawdown;
                // A zero peak means the account never rose above its start, so there is
                // no base to express the decline against.
                report.max_drawdown_pct = if peak > Decimal::ZERO {
                    drawdown
                        .checked_div(peak)
                        .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
                        .unwrap_or(Decimal::MAX)
                } else {
                    Decimal::ZERO
                };
            }

            equity_curve.push(EquityPoint {
                trade_number: index + 1,
                balance,
            });
        }

        report.equity_curve = equity_curve;
    }

    /// Weekday heatmap, weekday x hour matrix and the calendar rollups.
    fn calculate_time_buckets(&self, trades: &[Trade], report: &mut PerformanceReport) {
        let mut heatmap: Vec<WeekdayBucket> = WEEKDAYS
            .iter()
            .map(|&weekday| WeekdayBucket {
                weekday,
                trades: 0,
                profit: Decimal::ZERO,
            })
            .collect();
        let mut cells: BTreeMap<(u32, u32), (usize, Decimal)> = BTreeMap::new();

        for trade in trades {
            let day = trade.close_time.weekday().num_days_from_sunday();
            let bucket = &mut heatmap[day as usize];
            bucket.trades += 1;
            bucket.profit = bucket.profit.saturating_add(trade.profit);

            let cell = cells
                .entry((day, trade.close_time.hour()))
                .or_insert((0, Decimal::ZERO));
            cell.0 += 1;
            cell.1 = cell.1.saturating_add(trade.profit);
        }

        report.weekday_heatmap = heatmap;
        report.intraday = IntradayMatrix {
            cells: cells
                .into_iter()
                .map(|((day, hour), (trades, profit))| IntradayCell {
                    weekday: WEEKDAYS[day as usize],
                    hour,
                    trades,
                    profit,
                })
                .collect(),
        };

        report.weekly = Period::Week.rollup(trades);
        report.monthly = Period::Month.rollup(trades);
        report.yearly = Period::Year.rollup(trades);
    }

    /// Per-symbol profit and win rate, best performer first.
    fn calculate_symbols(&self, trades: &[Trade], report: &mut PerformanceReport) {
        // (profit, wins, trades), kept in first-seen order so the sort below is stable.
        let mut order: Vec<&str> = Vec::new();
        let mut stats: HashMap<&str, (Decimal, usize, usize)> = HashMap::new();

        for trade in trades {
            let symbol = trade.symbol_or_unknown();
            let entry = stats.entry(symbol).or_insert_with(|| {
                order.push(symbol);
                (Decimal::ZERO, 0, 0)
            });
            entry.0 = entry.0.saturating_add(trade.profit);
            entry.2 += 1;
            if trade.is_win() {
                entry.1 += 1;
            }
        }

        let mut symbols: Vec<SymbolPerformance> = order
            .into_iter()
            .filter_map(|symbol| {
                stats
                    .get(symbol)
                    .map(|&(profit, wins, count)| SymbolPerformance {
                        symbol: symbol.to_string(),
                        profit,
                        win_rate: percentage(wins, count),
                        trades: count,
                    })
            })
            .collect();
        symbols.sort_by(|a, b| b.profit.cmp(&a.profit));

        report.symbols = symbols;
    }
}

/// `part / whole * 100`, or zero for an empty whole.
fn percentage(part: usize, whole: usize) -> Decimal {
    if whole == 0 {
        return Decimal::ZERO;
    }
    Decimal::from(part) / Decimal::from(whole) * Decimal::ONE_HUNDRED
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone, Weekday};
    use rust_decimal_macros::dec;

    fn trade(ticket: i64, day: u32, hour: u32, symbol: &str, profit: Decimal) -> Trade {
        let close = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 1, day, hour, 0, 0)
            .unwrap();
        Trade::new(ticket, close, symbol, profit)
    }

    fn scenario() -> Vec<Trade> {
        vec![
            trade(1, 1, 10, "EURUSD", dec!(100)),
            trade(2, 2, 11, "EURUSD", dec!(-40)),
            trade(3, 3, 9, "GBPUSD", dec!(-10)),
        ]
    }

    #[test]
    fn empty_input_yields_zeroed_report() {
        let report = AnalyticsEngine::new().calculate(&[]);

        assert_eq!(report, PerformanceReport::new());
        assert_eq!(report.total_trades, 0);
        assert_eq!(report.profit_factor, Ratio::Finite(Decimal::ZERO));
        assert_eq!(report.risk_reward_ratio, Ratio::Finite(Decimal::ZERO));
        assert!(report.equity_curve.is_empty());
        assert!(report.weekday_heatmap.is_empty());
        assert!(report.intraday.cells.is_empty());
        assert!(report.weekly.is_empty());
        assert!(report.symbols.is_empty());
        assert!(report.trades.is_empty());
    }

    #[test]
    fn scenario_scalars() {
        let report = AnalyticsEngine::new().calculate(&scenario());

        assert_eq!(report.total_trades, 3);
        assert_eq!(report.total_profit, dec!(50));
        assert_eq!(report.winning_trades, 1);
        assert_eq!(report.losing_trades, 2);
        assert_eq!(report.win_rate.round_dp(2), dec!(33.33));
        assert_eq!(report.gross_profit, dec!(100));
        assert_eq!(report.gross_loss, dec!(50));
        assert_eq!(report.profit_factor, Ratio::Finite(dec!(2)));
        assert_eq!(report.average_win, dec!(100));
        assert_eq!(report.average_loss, dec!(-25));
        assert_eq!(report.risk_reward_ratio, Ratio::Finite(dec!(4)));
    }

    #[test]
    fn scenario_equity_and_drawdown() {
        let report = AnalyticsEngine::new().calculate(&scenario());

        let curve: Vec<(usize, Decimal)> = report
            .equity_curve
            .iter()
            .map(|p| (p.trade_number, p.balance))
            .collect();
        assert_eq!(curve, vec![(1, dec!(100)), (2, dec!(60)), (3, dec!(50))]);
        assert_eq!(report.max_drawdown, dec!(50));
        assert_eq!(report.max_drawdown_pct, dec!(50));
    }

    #[test]
    fn scenario_symbols_sorted_by_profit() {
        let report = AnalyticsEngine::new().calculate(&scenario());

        let symbols: Vec<(&str, Decimal, usize)> = report
            .symbols
            .iter()
            .map(|s| (s.symbol.as_str(), s.profit, s.trades))
            .collect();
        assert_eq!(
            symbols,
            vec![("EURUSD", dec!(60), 2), ("GBPUSD", dec!(-10), 1)]
        );
        assert_eq!(report.symbols[0].win_rate, dec!(50));
        assert_eq!(report.symbols[1].win_rate, Decimal::ZERO);
    }

    #[test]
    fn break_even_trade_counts_as_loss() {
        let report = AnalyticsEngine::new().calculate(&[trade(1, 1, 10, "EURUSD", dec!(0))]);

        assert_eq!(report.winning_trades, 0);
        assert_eq!(report.losing_trades, 1);
        assert_eq!(report.win_rate, Decimal::ZERO);
        assert_eq!(report.average_loss, Decimal::ZERO);
        assert_eq!(report.symbols[0].win_rate, Decimal::ZERO);
    }

    #[test]
    fn no_losses_means_unbounded_ratios() {
        let report = AnalyticsEngine::new().calculate(&[trade(1, 1, 10, "EURUSD", dec!(100))]);

        assert_eq!(report.profit_factor, Ratio::Infinite);
        assert_eq!(report.risk_reward_ratio, Ratio::Infinite);
        assert_eq!(report.win_rate, dec!(100));
        assert_eq!(report.max_drawdown, Decimal::ZERO);
    }

    #[test]
    fn drawdown_from_zero_peak_has_no_percentage() {
        let trades = vec![
            trade(1, 1, 10, "EURUSD", dec!(-30)),
            trade(2, 2, 10, "EURUSD", dec!(-20)),
        ];
        let report = AnalyticsEngine::new().calculate(&trades);

        assert_eq!(report.max_drawdown, dec!(50));
        assert_eq!(report.max_drawdown_pct, Decimal::ZERO);
    }

    #[test]
    fn drawdown_percentage_uses_peak_at_the_maximum() {
        // Peak 100, trough 20 (80%); then a new peak 300 and a shallower 90 dip (30%).
        let trades = vec![
            trade(1, 1, 10, "EURUSD", dec!(100)),
            trade(2, 2, 10, "EURUSD", dec!(-80)),
            trade(3, 3, 10, "EURUSD", dec!(280)),
            trade(4, 4, 10, "EURUSD", dec!(-90)),
        ];
        let report = AnalyticsEngine::new().calculate(&trades);

        assert_eq!(report.max_drawdown, dec!(90));
        assert_eq!(report.max_drawdown_pct, dec!(30));
    }

    #[test]
    fn weekday_heatmap_and_intraday_cells() {
        let report = AnalyticsEngine::new().calculate(&scenario());

        assert_eq!(report.weekday_heatmap.len(), 7);
        // 2024-01-01 was a Monday.
        let monday = &report.weekday_heatmap[1];
        assert_eq!(monday.weekday, Weekday::Mon);
        assert_eq!(monday.trades, 1);
        assert_eq!(monday.profit, dec!(100));
        assert_eq!(report.weekday_heatmap[0].trades, 0);

        let cell = report.intraday.cell(Weekday::Tue, 11).unwrap();
        assert_eq!(cell.trades, 1);
        assert_eq!(cell.profit, dec!(-40));
        assert!(report.intraday.cell(Weekday::Tue, 10).is_none());
        assert_eq!(report.intraday.cells.len(), 3);
    }

    #[test]
    fn calendar_rollups() {
        let report = AnalyticsEngine::new().calculate(&scenario());

        assert_eq!(report.weekly.len(), 1);
        assert_eq!(report.weekly[0].period, "2024-W01");
        assert_eq!(report.weekly[0].trades, 3);
        assert_eq!(report.monthly[0].period, "2024-01");
        assert_eq!(report.yearly[0].period, "2024");
        assert_eq!(report.yearly[0].profit, dec!(50));
    }

    #[test]
    fn input_is_passed_through_untouched() {
        let trades = scenario();
        let report = AnalyticsEngine::new().calculate(&trades);
        assert_eq!(report.trades, trades);
    }

    #[test]
    fn ratios_beyond_decimal_range_are_infinite() {
        let trades = vec![
            trade(1, 1, 10, "XAUUSD", dec!(70000000000000000000000000000)),
            trade(2, 2, 10, "XAUUSD", dec!(-0.0000000000000000000000000001)),
        ];

        let report = AnalyticsEngine::new().calculate(&trades);

        assert_eq!(report.profit_factor, Ratio::Infinite);
        assert_eq!(report.risk_reward_ratio, Ratio::Infinite);
    }

    #[test]
    fn drawdown_against_a_tiny_peak_saturates() {
        let trades = vec![
            trade(1, 1, 10, "XAUUSD", dec!(0.0000000000000000000000000001)),
            trade(2, 2, 10, "XAUUSD", dec!(-70000000000000000000000000000)),
        ];

        let report = AnalyticsEngine::new().calculate(&trades);

        assert!(report.max_drawdown > dec!(69999999999999999999999999999));
        assert_eq!(report.max_drawdown_pct, Decimal::MAX);
    }

    #[test]
    fn sums_saturate_instead_of_overflowing() {
        let trades = vec![
            trade(1, 1, 10, "XAUUSD", dec!(50000000000000000000000000000)),
            trade(2, 2, 10, "XAUUSD", dec!(50000000000000000000000000000)),
        ];

        let report = AnalyticsEngine::new().calculate(&trades);

        assert_eq!(report.total_profit, Decimal::MAX);
        assert_eq!(report.equity_curve[1].balance, Decimal::MAX);
        assert_eq!(report.yearly[0].profit, Decimal::MAX);
        assert_eq!(report.symbols[0].profit, Decimal::MAX);
    }
}
