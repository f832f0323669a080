//! Reads closed-trade exports (CSV) into ordered `Trade` lists for the analytics engine.

pub mod error;
pub mod importer;

pub use error::IngestError;
pub use importer::{parse_timestamp, CsvImporter};

use core_types::Trade;

/// A bundled trade history for trying the journal without a broker export.
pub const SAMPLE_CSV: &str = include_str!("../data/sample_trades.csv");

/// Parses [`SAMPLE_CSV`] with the given importer.
pub fn sample_trades(importer: &CsvImporter) -> Result<Vec<Trade>, IngestError> {
    importer.parse(SAMPLE_CSV)
}
