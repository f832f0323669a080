use analytics::{EmotionCount, PerformanceReport, PeriodBucket, WEEKDAYS};
use core_types::Trade;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};
use journal::{Account, GoalProgress, Tier};
use rust_decimal::Decimal;

fn table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn money(value: Decimal) -> String {
    format!("{:.2}", value)
}

fn percent(value: Decimal) -> String {
    format!("{:.2}%", value)
}

pub fn accounts(accounts: &[Account], reports: &[PerformanceReport]) -> Table {
    let mut table = table();
    table.set_header(vec!["Name", "Id", "Trades", "Profit", "Win Rate"]);
    for (account, report) in accounts.iter().zip(reports) {
        table.add_row(vec![
            account.name.clone(),
            account.id.to_string(),
            report.total_trades.to_string(),
            money(report.total_profit),
            percent(report.win_rate),
        ]);
    }
    table
}

pub fn summary(report: &PerformanceReport) -> Table {
    let mut table = table();
    table.set_header(vec!["Metric", "Value"]);
    let final_balance = report
        .equity_curve
        .last()
        .map(|p| p.balance)
        .unwrap_or_default();
    let rows = [
        ("Total Trades", report.total_trades.to_string()),
        ("Winning / Losing", format!("{} / {}", report.winning_trades, report.losing_trades)),
        ("Win Rate", percent(report.win_rate)),
        ("Total Profit", money(report.total_profit)),
        ("Gross Profit", money(report.gross_profit)),
        ("Gross Loss", money(report.gross_loss)),
        ("Profit Factor", report.profit_factor.to_string()),
        ("Average Win", money(report.average_win)),
        ("Average Loss", money(report.average_loss)),
        ("Risk/Reward", report.risk_reward_ratio.to_string()),
        ("Max Drawdown", money(report.max_drawdown)),
        ("Max Drawdown %", percent(report.max_drawdown_pct)),
        ("Final Balance", money(final_balance)),
    ];
    for (metric, value) in rows {
        table.add_row(vec![metric.to_string(), value]);
    }
    table
}

/// The trade log: one row per trade with the balance after it.
pub fn trades(report: &PerformanceReport) -> Table {
    let mut table = table();
    table.set_header(vec![
        "Ticket", "Closed", "Symbol", "Profit", "Balance", "Tags", "Journal",
    ]);
    for (trade, point) in report.trades.iter().zip(&report.equity_curve) {
        let tags: Vec<&str> = trade.tags.iter().map(String::as_str).collect();
        table.add_row(vec![
            trade.ticket.to_string(),
            trade.close_time.format("%Y-%m-%d %H:%M").to_string(),
            trade.symbol_or_unknown().to_string(),
            money(trade.profit),
            money(point.balance),
            tags.join(", "),
            String::from(if trade.is_journaled() { "*" } else { "" }),
        ]);
    }
    table
}

/// Every recorded field of a single trade.
pub fn trade_detail(trade: &Trade) -> Table {
    let mut table = table();
    table.set_header(vec!["Field", "Value"]);
    let tags: Vec<&str> = trade.tags.iter().map(String::as_str).collect();
    let optional = |value: Option<String>| value.unwrap_or_else(|| "-".to_string());
    let rows = [
        ("Ticket", trade.ticket.to_string()),
        ("Symbol", trade.symbol_or_unknown().to_string()),
        ("Opened", optional(trade.open_time.map(|t| t.to_rfc3339()))),
        ("Closed", trade.close_time.to_rfc3339()),
        ("Profit", money(trade.profit)),
        ("Emotion Before", optional(trade.emotion_before.map(|e| e.to_string()))),
        ("Emotion After", optional(trade.emotion_after.map(|e| e.to_string()))),
        ("Tags", tags.join(", ")),
        ("Journal", optional(trade.journal.clone())),
        ("News", optional(trade.news_analysis.clone())),
    ];
    for (field, value) in rows {
        table.add_row(vec![field.to_string(), value]);
    }
    table
}

pub fn symbols(report: &PerformanceReport) -> Table {
    let mut table = table();
    table.set_header(vec!["Symbol", "Trades", "Profit", "Win Rate"]);
    for s in &report.symbols {
        table.add_row(vec![
            s.symbol.clone(),
            s.trades.to_string(),
            money(s.profit),
            percent(s.win_rate),
        ]);
    }
    table
}

pub fn weekdays(report: &PerformanceReport) -> Table {
    let mut table = table();
    table.set_header(vec!["Day", "Trades", "Profit"]);
    for bucket in &report.weekday_heatmap {
        table.add_row(vec![
            bucket.weekday.to_string(),
            bucket.trades.to_string(),
            money(bucket.profit),
        ]);
    }
    table
}

/// Weekday rows by hour-block columns. Empty blocks are shown as `-`.
pub fn intraday(report: &PerformanceReport, block_hours: u32) -> Table {
    let block = block_hours.clamp(1, 24);
    let grid = report.intraday.coarsen(block);

    let mut header = vec!["Day".to_string()];
    header.extend((0..24).step_by(block as usize).map(|start| {
        format!("{:02}-{:02}", start, start + block)
    }));

    let mut table = table();
    table.set_header(header);
    for weekday in WEEKDAYS {
        let mut row = vec![Cell::new(weekday)];
        row.extend(grid.iter().filter(|c| c.weekday == weekday).map(|c| {
            if c.trades == 0 {
                Cell::new("-")
            } else {
                Cell::new(format!("{} ({})", money(c.profit), c.trades))
            }
        }));
        table.add_row(row);
    }
    table
}

pub fn periods(label: &str, buckets: &[PeriodBucket]) -> Table {
    let mut table = table();
    table.set_header(vec![label, "Trades", "Profit"]);
    for bucket in buckets {
        table.add_row(vec![
            bucket.period.clone(),
            bucket.trades.to_string(),
            money(bucket.profit),
        ]);
    }
    table
}

pub fn emotions(counts: &[EmotionCount]) -> Table {
    let mut table = table();
    table.set_header(vec!["Emotion", "Before", "After"]);
    for count in counts {
        table.add_row(vec![
            count.emotion.to_string(),
            count.before.to_string(),
            count.after.to_string(),
        ]);
    }
    table
}

pub fn goals(progress: &[GoalProgress]) -> Table {
    let mut table = table();
    table.set_header(vec!["Goal", "Current", "Target", "Progress", "Status"]);
    for goal in progress {
        let status = match (goal.kind.is_limit(), goal.tier) {
            (true, Tier::High) => "At risk",
            (false, Tier::High) => "On track",
            (_, Tier::Medium) => "Halfway",
            (true, Tier::Low) => "Comfortable",
            (false, Tier::Low) => "Behind",
        };
        let status = if goal.is_met() && !goal.kind.is_limit() {
            "Reached"
        } else if !goal.is_met() && goal.kind.is_limit() {
            "Breached"
        } else {
            status
        };
        table.add_row(vec![
            goal.kind.to_string(),
            money(goal.current),
            money(goal.target),
            percent(goal.progress_pct),
            status.to_string(),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::AnalyticsEngine;
    use chrono::{FixedOffset, TimeZone};
    use core_types::Emotion;
    use rust_decimal_macros::dec;

    fn trade(ticket: i64, day: u32, profit: Decimal) -> Trade {
        let close = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 3, day, 9, 15, 0)
            .unwrap();
        Trade::new(ticket, close, "EURUSD", profit)
    }

    #[test]
    fn trade_log_lists_every_trade_with_its_balance() {
        let mut noted = trade(1002, 5, dec!(-20));
        noted.emotion_before = Some(Emotion::Anxious);
        noted.tags.insert("fomo".to_string());
        let report = AnalyticsEngine::new().calculate(&[trade(1001, 4, dec!(50)), noted]);

        let table = trades(&report);
        let rows: Vec<Vec<String>> = table
            .row_iter()
            .map(|row| row.cell_iter().map(|c| c.content()).collect())
            .collect();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0], "1001");
        assert_eq!(rows[0][1], "2024-03-04 09:15");
        assert_eq!(rows[0][6], "");
        assert_eq!(rows[1][3], "-20.00");
        assert_eq!(rows[1][4], "30.00");
        assert_eq!(rows[1][5], "fomo");
        assert_eq!(rows[1][6], "*");
    }

    #[test]
    fn trade_detail_shows_journal_fields() {
        let mut noted = trade(7, 1, dec!(5));
        noted.journal = Some("Faded the open".to_string());

        let rendered = trade_detail(&noted).to_string();

        assert!(rendered.contains("Faded the open"));
        assert!(rendered.contains("Emotion Before"));
    }
}
