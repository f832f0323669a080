use crate::error::IngestError;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use core_types::Trade;
use csv::{ReaderBuilder, StringRecord, Trim};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

const TICKET: &str = "ticket";
const CLOSE_TIME: &str = "closetime";
const SYMBOL: &str = "symbol";
const PROFIT: &str = "profit";
const OPEN_TIME: &str = "opentime";

/// Timestamp layouts accepted when no offset is present.
const NAIVE_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y.%m.%d %H:%M:%S",
    "%Y.%m.%d %H:%M",
];

/// Column positions resolved from the header row.
struct Columns {
    ticket: usize,
    close_time: usize,
    symbol: usize,
    profit: usize,
    open_time: Option<usize>,
    width: usize,
}

impl Columns {
    fn resolve(header: &StringRecord) -> Result<Self, IngestError> {
        let names: Vec<String> = header.iter().map(|h| h.trim().to_lowercase()).collect();
        let find = |name: &'static str| names.iter().position(|h| h == name);
        let require = |name: &'static str| find(name).ok_or(IngestError::MissingColumn(name));

        Ok(Self {
            ticket: require(TICKET)?,
            close_time: require(CLOSE_TIME)?,
            symbol: require(SYMBOL)?,
            profit: require(PROFIT)?,
            open_time: find(OPEN_TIME),
            width: names.len(),
        })
    }
}

/// Turns a broker's closed-trade export into a clean, chronologically ordered trade list.
///
/// Rows that cannot be parsed are skipped rather than failing the whole import; only a
/// file with no usable rows at all is an error.
#[derive(Debug, Clone, Copy)]
pub struct CsvImporter {
    default_offset: FixedOffset,
}

impl CsvImporter {
    /// `default_offset` is attached to timestamps that carry no offset of their own.
    pub fn new(default_offset: FixedOffset) -> Self {
        Self { default_offset }
    }

    pub fn with_utc_offset_minutes(minutes: i32) -> Result<Self, IngestError> {
        let offset = minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or(IngestError::InvalidOffset(minutes))?;
        Ok(Self::new(offset))
    }

    pub fn parse_file(&self, path: &Path) -> Result<Vec<Trade>, IngestError> {
        let text = std::fs::read_to_string(path)?;
        tracing::info!(path = %path.display(), "Importing trade history");
        self.parse(&text)
    }

    pub fn parse(&self, text: &str) -> Result<Vec<Trade>, IngestError> {
        let text = text.trim();
        if text.lines().count() < 2 {
            return Err(IngestError::TooFewLines);
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(text.as_bytes());
        let columns = Columns::resolve(reader.headers()?)?;

        let mut trades = Vec::new();
        for (index, result) in reader.records().enumerate() {
            // Header is line 1.
            let line = index + 2;
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    tracing::warn!(line, error = %e, "Skipping unreadable row");
                    continue;
                }
            };
            if record.len() < columns.width {
                continue;
            }
            match self.parse_row(&record, &columns) {
                Some(trade) => trades.push(trade),
                None => tracing::warn!(line, row = ?record, "Skipping invalid row"),
            }
        }

        if trades.is_empty() {
            return Err(IngestError::NoValidTrades);
        }

        trades.sort_by_key(|t| t.close_time);
        tracing::debug!(trades = trades.len(), "Parsed trade history");
        Ok(trades)
    }

    fn parse_row(&self, record: &StringRecord, columns: &Columns) -> Option<Trade> {
        let ticket = record.get(columns.ticket)?.parse::<i64>().ok()?;
        let close_time = parse_timestamp(record.get(columns.close_time)?, &self.default_offset)?;
        let symbol = record.get(columns.symbol)?.trim();
        let profit = parse_decimal(record.get(columns.profit)?)?;

        let mut trade = Trade::new(ticket, close_time, symbol, profit);
        trade.open_time = columns
            .open_time
            .and_then(|i| record.get(i))
            .and_then(|raw| parse_timestamp(raw, &self.default_offset));
        Some(trade)
    }
}

impl Default for CsvImporter {
    fn default() -> Self {
        Self::new(Utc.fix())
    }
}

/// Parses an RFC 3339 timestamp, or a naive one interpreted in `offset`.
pub fn parse_timestamp(raw: &str, offset: &FixedOffset) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at);
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;
    offset.from_local_datetime(&naive).single()
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use rust_decimal_macros::dec;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn accepts_common_timestamp_layouts() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        for raw in [
            "2024-01-01T10:00",
            "2024-01-01T10:00:00",
            "2024-01-01 10:00:00",
            "2024-01-01 10:00",
            "2024.01.01 10:00:00",
            "2024.01.01 10:00",
        ] {
            let at = parse_timestamp(raw, &offset).unwrap_or_else(|| panic!("{raw}"));
            assert_eq!((at.day(), at.hour()), (1, 10), "{raw}");
            assert_eq!(at.offset(), &offset);
        }
    }

    #[test]
    fn explicit_offset_wins() {
        let at = parse_timestamp("2024-01-01T10:00:00+05:00", &utc()).unwrap();
        assert_eq!(at.offset().local_minus_utc(), 5 * 3600);
        assert_eq!(at.hour(), 10);
    }

    #[test]
    fn date_only_means_midnight() {
        let at = parse_timestamp("2024-03-15", &utc()).unwrap();
        assert_eq!((at.month(), at.day(), at.hour()), (3, 15, 0));
    }

    #[test]
    fn rejects_garbage_timestamps() {
        assert!(parse_timestamp("yesterday", &utc()).is_none());
        assert!(parse_timestamp("", &utc()).is_none());
    }

    #[test]
    fn parses_plain_and_scientific_profits() {
        assert_eq!(parse_decimal("-40.25"), Some(dec!(-40.25)));
        assert_eq!(parse_decimal("1e2"), Some(dec!(100)));
        assert_eq!(parse_decimal("n/a"), None);
    }

    #[test]
    fn rejects_out_of_range_offsets() {
        assert!(CsvImporter::with_utc_offset_minutes(24 * 60).is_err());
        assert!(CsvImporter::with_utc_offset_minutes(-300).is_ok());
    }
}
