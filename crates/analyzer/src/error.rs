use chrono::NaiveDate;
use core_types::Direction;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("No data available for {ticker} between {start} and {end}")]
    NoData {
        ticker: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error(
        "Could not find enough trading days {direction} the reference period for {ticker}: needed {required}, found {found}"
    )]
    InsufficientHistory {
        ticker: String,
        direction: Direction,
        required: u64,
        found: u64,
    },

    #[error("The reference period for {ticker} between {start} and {end} has no trading days")]
    NoTradingDays {
        ticker: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("Invalid direction '{0}', expected 'before' or 'after'")]
    InvalidDirection(String),

    #[error("Price store query failed: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl AnalyzerError {
    /// Wraps a store failure without altering it; callers can downcast the source.
    pub fn store<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        AnalyzerError::Store(Box::new(err))
    }
}
