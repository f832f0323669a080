use thiserror::Error;

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("No account matches '{0}'")]
    AccountNotFound(String),

    #[error("Trade #{ticket} not found in account '{account}'")]
    TradeNotFound { account: String, ticket: i64 },

    #[error("No accounts have been imported yet")]
    NoAccounts,

    #[error("Failed to access the account store: {0}")]
    Io(#[from] std::io::Error),

    #[error("An error occurred during JSON serialization/deserialization: {0}")]
    Json(#[from] serde_json::Error),
}
