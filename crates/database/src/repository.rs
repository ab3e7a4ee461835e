use crate::DbError;
use async_trait::async_trait;
use chrono::NaiveDate;
use core_types::{normalize_ticker, PriceBar, PriceRecord, PriceStore, SortOrder, StockListing};
use serde::Deserialize;
use sqlx::postgres::PgPool;

/// The `DbRepository` provides a high-level, application-specific interface
/// to the database. It encapsulates all SQL queries and data access logic.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

/// Fields required to add an instrument to the catalog.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStock {
    pub ticker: String,
    pub company_name: String,
    pub founding_date: NaiveDate,
}

/// A partial update of a catalog entry. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockUpdate {
    pub company_name: Option<String>,
    pub founding_date: Option<NaiveDate>,
}

const STOCK_COLUMNS: &str = "ticker, company_name, founding_date, created_at, updated_at";

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Saves a single daily bar.
    /// Uses `ON CONFLICT DO NOTHING` to be idempotent, so an import can be re-run
    /// over the same file. Returns `true` when a new row was written.
    pub async fn save_bar(&self, bar: &PriceBar) -> Result<bool, DbError> {
        bar.validate()?;

        let result = sqlx::query(
            r#"
            INSERT INTO ohlcv_data (ticker, date, open, high, low, close, adj_close, volume)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (ticker, date) DO NOTHING
            "#,
        )
        .bind(normalize_ticker(&bar.ticker))
        .bind(bar.date)
        .bind(bar.open)
        .bind(bar.high)
        .bind(bar.low)
        .bind(bar.close)
        .bind(bar.adj_close)
        .bind(bar.volume)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Adds an instrument to the catalog.
    pub async fn create_stock(&self, stock: &NewStock) -> Result<StockListing, DbError> {
        let ticker = normalize_ticker(&stock.ticker);
        let query = format!(
            "INSERT INTO stocks (ticker, company_name, founding_date) VALUES ($1, $2, $3) RETURNING {}",
            STOCK_COLUMNS
        );

        sqlx::query_as::<_, StockListing>(&query)
            .bind(&ticker)
            .bind(stock.company_name.trim())
            .bind(stock.founding_date)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db) if db.is_unique_violation() => DbError::Duplicate(ticker),
                other => other.into(),
            })
    }

    /// Fetches every catalog entry, ordered by ticker.
    pub async fn list_stocks(&self) -> Result<Vec<StockListing>, DbError> {
        let query = format!("SELECT {} FROM stocks ORDER BY ticker ASC", STOCK_COLUMNS);
        let stocks = sqlx::query_as::<_, StockListing>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(stocks)
    }

    pub async fn get_stock(&self, ticker: &str) -> Result<StockListing, DbError> {
        let query = format!("SELECT {} FROM stocks WHERE ticker = $1", STOCK_COLUMNS);
        sqlx::query_as::<_, StockListing>(&query)
            .bind(normalize_ticker(ticker))
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DbError::NotFound)
    }

    pub async fn update_stock(
        &self,
        ticker: &str,
        update: &StockUpdate,
    ) -> Result<StockListing, DbError> {
        let query = format!(
            r#"
            UPDATE stocks
            SET company_name = COALESCE($2, company_name),
                founding_date = COALESCE($3, founding_date),
                updated_at = NOW()
            WHERE ticker = $1
            RETURNING {}
            "#,
            STOCK_COLUMNS
        );
        sqlx::query_as::<_, StockListing>(&query)
            .bind(normalize_ticker(ticker))
            .bind(update.company_name.as_deref().map(str::trim))
            .bind(update.founding_date)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DbError::NotFound)
    }

    /// Removes a catalog entry. Stored observations for the ticker are kept.
    pub async fn delete_stock(&self, ticker: &str) -> Result<StockListing, DbError> {
        let query = format!("DELETE FROM stocks WHERE ticker = $1 RETURNING {}", STOCK_COLUMNS);
        sqlx::query_as::<_, StockListing>(&query)
            .bind(normalize_ticker(ticker))
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DbError::NotFound)
    }
}

fn limit_param(limit: u64) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

#[async_trait]
impl PriceStore for DbRepository {
    type Error = DbError;

    async fn count(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Result<u64, DbError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM ohlcv_data WHERE ticker = $1 AND date >= $2 AND date <= $3",
        )
        .bind(ticker)
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;
        Ok(count.max(0) as u64)
    }

    async fn query_range(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
        order: SortOrder,
    ) -> Result<Vec<PriceRecord>, DbError> {
        let query = format!(
            "SELECT ticker, date, close FROM ohlcv_data WHERE ticker = $1 AND date >= $2 AND date <= $3 ORDER BY date {}",
            order.as_sql()
        );
        let records = sqlx::query_as::<_, PriceRecord>(&query)
            .bind(ticker)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await?;
        Ok(records)
    }

    async fn query_before(
        &self,
        ticker: &str,
        bound: NaiveDate,
        limit: u64,
    ) -> Result<Vec<PriceRecord>, DbError> {
        let records = sqlx::query_as::<_, PriceRecord>(
            "SELECT ticker, date, close FROM ohlcv_data WHERE ticker = $1 AND date < $2 ORDER BY date DESC LIMIT $3",
        )
        .bind(ticker)
        .bind(bound)
        .bind(limit_param(limit))
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    async fn query_after(
        &self,
        ticker: &str,
        bound: NaiveDate,
        limit: u64,
    ) -> Result<Vec<PriceRecord>, DbError> {
        let records = sqlx::query_as::<_, PriceRecord>(
            "SELECT ticker, date, close FROM ohlcv_data WHERE ticker = $1 AND date > $2 ORDER BY date ASC LIMIT $3",
        )
        .bind(ticker)
        .bind(bound)
        .bind(limit_param(limit))
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    async fn distinct_instruments(&self, excluding: &str) -> Result<Vec<String>, DbError> {
        // Read from the observations rather than `stocks` so that tickers
        // deleted from the catalog still take part in peer comparisons.
        let tickers = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT ticker FROM ohlcv_data WHERE ticker <> $1 ORDER BY ticker",
        )
        .bind(excluding)
        .fetch_all(&self.pool)
        .await?;
        Ok(tickers)
    }
}
