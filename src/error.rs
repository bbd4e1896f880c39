use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unknown period: {0}")]
    PeriodNotFound(String),

    #[error("Invalid period catalog: {0}")]
    Catalog(String),

    #[error("{0}")]
    Fetch(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

/// A single leaderboard entry whose numeric fields could not be read.
/// Scoped to one display slot; never aborts the rest of the list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("{field} is not a base-10 integer: {value:?}")]
    NotNumeric { field: &'static str, value: String },

    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: i64 },
}
