use crate::error::AnalyzerError;
use chrono::NaiveDate;
use core_types::PriceStore;

/// Counts trading days as the number of stored observations in a window.
///
/// Calendar arithmetic would count weekends and holidays; a date with no
/// observation is a non-trading day by definition.
pub struct TradingCalendarCounter<'a, S> {
    store: &'a S,
}

impl<'a, S: PriceStore> TradingCalendarCounter<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Observations for `ticker` with `start <= date <= end`. Zero when there are none.
    pub async fn count_trading_days(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<u64, AnalyzerError> {
        let count = self
            .store
            .count(ticker, start, end)
            .await
            .map_err(AnalyzerError::store)?;
        tracing::debug!(ticker = %ticker, %start, %end, count, "Counted trading days.");
        Ok(count)
    }
}
