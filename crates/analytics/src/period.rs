use crate::report::PeriodBucket;
use chrono::{DateTime, Datelike, TimeZone};
use core_types::Trade;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Calendar granularity for profit rollups.
///
/// Every key format is zero-padded, so sorting keys as strings sorts them chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    /// ISO-8601 week, keyed `YYYY-Www` using the ISO week-numbering year.
    Week,
    /// Keyed `YYYY-MM`.
    Month,
    /// Keyed `YYYY`.
    Year,
}

impl Period {
    pub const ALL: [Period; 3] = [Period::Week, Period::Month, Period::Year];

    /// Derives the bucket key for a timestamp, using its local calendar date.
    pub fn key<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> String {
        let date = at.date_naive();
        match self {
            Period::Week => {
                // The ISO week belongs to the year containing its Thursday, which may differ
                // from the calendar year around New Year.
                let week = date.iso_week();
                format!("{:04}-W{:02}", week.year(), week.week())
            }
            Period::Month => format!("{:04}-{:02}", date.year(), date.month()),
            Period::Year => format!("{:04}", date.year()),
        }
    }

    /// Groups trades by period key, ascending by key.
    pub fn rollup(&self, trades: &[Trade]) -> Vec<PeriodBucket> {
        let mut buckets: BTreeMap<String, (Decimal, usize)> = BTreeMap::new();
        for trade in trades {
            let entry = buckets
                .entry(self.key(&trade.close_time))
                .or_insert((Decimal::ZERO, 0));
            entry.0 = entry.0.saturating_add(trade.profit);
            entry.1 += 1;
        }

        buckets
            .into_iter()
            .map(|(period, (profit, trades))| PeriodBucket {
                period,
                profit,
                trades,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn week_keys_follow_iso_thursday_rule() {
        // Monday 2024-01-01 is in week 1 of 2024.
        assert_eq!(Period::Week.key(&utc(2024, 1, 1)), "2024-W01");
        // Sunday 2023-01-01 still belongs to the last ISO week of 2022.
        assert_eq!(Period::Week.key(&utc(2023, 1, 1)), "2022-W52");
        // Tuesday 2024-12-31 belongs to week 1 of 2025.
        assert_eq!(Period::Week.key(&utc(2024, 12, 31)), "2025-W01");
        // 2020 has 53 ISO weeks.
        assert_eq!(Period::Week.key(&utc(2020, 12, 31)), "2020-W53");
    }

    #[test]
    fn month_and_year_keys_are_zero_padded() {
        assert_eq!(Period::Month.key(&utc(2024, 3, 9)), "2024-03");
        assert_eq!(Period::Year.key(&utc(2024, 3, 9)), "2024");
    }

    #[test]
    fn key_uses_the_timestamps_own_offset() {
        // 23:30 on Jan 31st at +02:00 is still January locally.
        let local = FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 1, 31, 23, 30, 0)
            .unwrap();
        assert_eq!(Period::Month.key(&local), "2024-01");
    }
}
