use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("CSV file must have a header and at least one data row.")]
    TooFewLines,

    #[error("Missing required column in CSV: {0}")]
    MissingColumn(&'static str),

    #[error("No valid trade data found in the file.")]
    NoValidTrades,

    #[error("Invalid UTC offset of {0} minutes")]
    InvalidOffset(i32),

    #[error("Failed to read CSV data: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
}
