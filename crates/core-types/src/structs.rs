use crate::error::CoreError;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Canonical form of a ticker symbol: surrounding whitespace removed, upper case.
pub fn normalize_ticker(ticker: &str) -> String {
    ticker.trim().to_uppercase()
}

/// A single daily closing-price observation for one instrument.
///
/// This is the projection of a stored `PriceBar` that the analysis works on.
/// Records are unique per (ticker, date).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PriceRecord {
    pub ticker: String,
    pub date: NaiveDate,
    pub close: Decimal,
}

/// A full daily OHLCV observation as it is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PriceBar {
    pub ticker: String,
    pub date: NaiveDate,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub adj_close: Decimal,
    pub volume: Decimal,
}

impl PriceBar {
    /// Checks that the bar has a ticker and that no price or volume is negative.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.ticker.trim().is_empty() {
            return Err(CoreError::InvalidInput(
                "ticker".to_string(),
                "must not be empty".to_string(),
            ));
        }

        let fields = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
            ("adj_close", self.adj_close),
            ("volume", self.volume),
        ];
        for (name, value) in fields {
            if value < Decimal::ZERO {
                return Err(CoreError::InvalidInput(
                    name.to_string(),
                    format!("{} is negative", value),
                ));
            }
        }
        Ok(())
    }
}

/// An entry in the instrument catalog.
///
/// The catalog is descriptive only; analysis never reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StockListing {
    pub ticker: String,
    pub company_name: String,
    pub founding_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
