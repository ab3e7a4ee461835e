//! An in-memory `PriceStore`.
//!
//! Holds observations in a vector behind a `tokio::sync::RwLock`. It answers the
//! same five queries as `DbRepository` with the same ordering rules, which makes
//! it the store used by the analysis tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use core_types::{PriceRecord, PriceStore, SortOrder};
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryStoreError {
    #[error("The in-memory price store is unavailable.")]
    Unavailable,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryPriceStore {
    records: Arc<RwLock<Vec<PriceRecord>>>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryPriceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record, replacing any existing one for the same ticker and date.
    pub async fn insert(&self, record: PriceRecord) {
        let mut records = self.records.write().await;
        records.retain(|r| !(r.ticker == record.ticker && r.date == record.date));
        records.push(record);
    }

    /// Inserts one close per date for `ticker`.
    pub async fn insert_closes(&self, ticker: &str, closes: &[(NaiveDate, Decimal)]) {
        for (date, close) in closes {
            self.insert(PriceRecord {
                ticker: ticker.to_string(),
                date: *date,
                close: *close,
            })
            .await;
        }
    }

    /// Makes every subsequent query fail, to exercise error propagation.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    fn check_available(&self) -> Result<(), MemoryStoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(MemoryStoreError::Unavailable);
        }
        Ok(())
    }

    /// Records for `ticker` matching `keep`, sorted ascending by date.
    async fn select<F>(&self, ticker: &str, keep: F) -> Vec<PriceRecord>
    where
        F: Fn(NaiveDate) -> bool,
    {
        let records = self.records.read().await;
        let mut selected: Vec<PriceRecord> = records
            .iter()
            .filter(|r| r.ticker == ticker && keep(r.date))
            .cloned()
            .collect();
        selected.sort_by_key(|r| r.date);
        selected
    }
}

fn take(records: impl Iterator<Item = PriceRecord>, limit: u64) -> Vec<PriceRecord> {
    records
        .take(usize::try_from(limit).unwrap_or(usize::MAX))
        .collect()
}

#[async_trait]
impl PriceStore for InMemoryPriceStore {
    type Error = MemoryStoreError;

    async fn count(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<u64, MemoryStoreError> {
        self.check_available()?;
        let selected = self.select(ticker, |d| d >= start && d <= end).await;
        Ok(selected.len() as u64)
    }

    async fn query_range(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
        order: SortOrder,
    ) -> Result<Vec<PriceRecord>, MemoryStoreError> {
        self.check_available()?;
        let mut selected = self.select(ticker, |d| d >= start && d <= end).await;
        if order == SortOrder::Descending {
            selected.reverse();
        }
        Ok(selected)
    }

    async fn query_before(
        &self,
        ticker: &str,
        bound: NaiveDate,
        limit: u64,
    ) -> Result<Vec<PriceRecord>, MemoryStoreError> {
        self.check_available()?;
        let selected = self.select(ticker, |d| d < bound).await;
        Ok(take(selected.into_iter().rev(), limit))
    }

    async fn query_after(
        &self,
        ticker: &str,
        bound: NaiveDate,
        limit: u64,
    ) -> Result<Vec<PriceRecord>, MemoryStoreError> {
        self.check_available()?;
        let selected = self.select(ticker, |d| d > bound).await;
        Ok(take(selected.into_iter(), limit))
    }

    async fn distinct_instruments(&self, excluding: &str) -> Result<Vec<String>, MemoryStoreError> {
        self.check_available()?;
        let records = self.records.read().await;
        let tickers: BTreeSet<&str> = records
            .iter()
            .map(|r| r.ticker.as_str())
            .filter(|t| *t != excluding)
            .collect();
        Ok(tickers.into_iter().map(str::to_string).collect())
    }
}
