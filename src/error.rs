use chrono::NaiveDate;

#[derive(Debug, thiserror::Error)]
pub enum TrendError {
    #[error("Invalid window: start {start} is after end {end}")]
    InvalidWindow { start: NaiveDate, end: NaiveDate },

    #[error("Series is empty")]
    EmptySeries,

    #[error("Division by zero: first price in series is 0")]
    DivisionByZero,

    #[error("Insufficient data: trend fit needs at least 2 records, found {found}")]
    InsufficientData { found: usize },

    #[error("Degenerate input: all records share the same date")]
    DegenerateInput,

    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, TrendError>;
