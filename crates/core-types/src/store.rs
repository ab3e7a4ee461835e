use crate::enums::SortOrder;
use crate::structs::PriceRecord;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Read-only access to stored daily price observations.
///
/// All date bounds refer to trading dates. The analysis crate depends only on
/// this trait, so any backend that can answer these five queries can drive it.
#[async_trait]
pub trait PriceStore: Send + Sync {
    /// The backend's own failure type. It is carried through analysis unchanged.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Number of observations for `ticker` with `start <= date <= end`.
    async fn count(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<u64, Self::Error>;

    /// All observations for `ticker` with `start <= date <= end`, in `order`.
    async fn query_range(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
        order: SortOrder,
    ) -> Result<Vec<PriceRecord>, Self::Error>;

    /// Up to `limit` observations with `date < bound`, newest first.
    async fn query_before(
        &self,
        ticker: &str,
        bound: NaiveDate,
        limit: u64,
    ) -> Result<Vec<PriceRecord>, Self::Error>;

    /// Up to `limit` observations with `date > bound`, oldest first.
    async fn query_after(
        &self,
        ticker: &str,
        bound: NaiveDate,
        limit: u64,
    ) -> Result<Vec<PriceRecord>, Self::Error>;

    /// Every ticker that has at least one stored observation, except `excluding`.
    async fn distinct_instruments(&self, excluding: &str) -> Result<Vec<String>, Self::Error>;
}
