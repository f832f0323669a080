use crate::engine::AnalyticsEngine;
use crate::report::PerformanceReport;
use core_types::Trade;

/// Combines the trade histories of several accounts into one portfolio report.
///
/// There is no cross-account logic: the union of all trades is put in close-time order and
/// run through the same [`AnalyticsEngine`] as a single account.
#[derive(Debug, Default, Clone, Copy)]
pub struct Aggregator {
    engine: AnalyticsEngine,
}

impl Aggregator {
    pub fn new(engine: AnalyticsEngine) -> Self {
        Self { engine }
    }

    pub fn combine<'a, I>(&self, accounts: I) -> PerformanceReport
    where
        I: IntoIterator<Item = &'a [Trade]>,
    {
        let merged = merge_chronologically(accounts);
        tracing::debug!(trades = merged.len(), "Combining account trade histories");
        self.engine.calculate(&merged)
    }
}

/// Concatenates the lists and sorts ascending by close time.
///
/// The sort is stable, so trades closing at the same instant keep their account order.
pub fn merge_chronologically<'a, I>(accounts: I) -> Vec<Trade>
where
    I: IntoIterator<Item = &'a [Trade]>,
{
    let mut merged: Vec<Trade> = accounts
        .into_iter()
        .flat_map(|trades| trades.iter().cloned())
        .collect();
    merged.sort_by_key(|t| t.close_time);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};
    use rust_decimal_macros::dec;

    fn at(hour: u32, ticket: i64) -> Trade {
        let close = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 5, 6, hour, 0, 0)
            .unwrap();
        Trade::new(ticket, close, "XAUUSD", dec!(1))
    }

    #[test]
    fn merge_interleaves_by_close_time() {
        let a = vec![at(9, 1), at(12, 2)];
        let b = vec![at(10, 10), at(11, 11)];

        let merged = merge_chronologically([a.as_slice(), b.as_slice()]);

        let tickets: Vec<i64> = merged.iter().map(|t| t.ticket).collect();
        assert_eq!(tickets, vec![1, 10, 11, 2]);
    }

    #[test]
    fn ties_keep_account_order() {
        let a = vec![at(9, 1)];
        let b = vec![at(9, 2)];

        let merged = merge_chronologically([a.as_slice(), b.as_slice()]);

        assert_eq!(merged[0].ticket, 1);
        assert_eq!(merged[1].ticket, 2);
    }

    #[test]
    fn combining_nothing_is_the_empty_report() {
        let report = Aggregator::default().combine(std::iter::empty::<&[Trade]>());
        assert_eq!(report, PerformanceReport::new());
    }
}
