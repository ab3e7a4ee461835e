use anyhow::Context;
use chrono::NaiveDate;
use core_types::{normalize_ticker, PriceBar};
use database::DbRepository;
use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

/// One line of an OHLCV import file. Both snake_case and the usual
/// spreadsheet-style headers are accepted.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "Ticker", alias = "Symbol", alias = "symbol")]
    ticker: String,
    #[serde(alias = "Date")]
    date: NaiveDate,
    #[serde(alias = "Open")]
    open: Decimal,
    #[serde(alias = "High")]
    high: Decimal,
    #[serde(alias = "Low")]
    low: Decimal,
    #[serde(alias = "Close")]
    close: Decimal,
    #[serde(alias = "Adj Close", alias = "adjClose")]
    adj_close: Decimal,
    #[serde(alias = "Volume")]
    volume: Decimal,
}

impl From<CsvRow> for PriceBar {
    fn from(row: CsvRow) -> Self {
        PriceBar {
            ticker: normalize_ticker(&row.ticker),
            date: row.date,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            adj_close: row.adj_close,
            volume: row.volume,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub inserted: usize,
    pub skipped: usize,
}

/// Parses and validates every row. Fails on the first bad row, naming its line.
pub fn read_bars<R: Read>(reader: R) -> anyhow::Result<Vec<PriceBar>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut bars = Vec::new();
    for (index, row) in csv_reader.deserialize::<CsvRow>().enumerate() {
        // Line 1 is the header.
        let line = index + 2;
        let bar = PriceBar::from(row.with_context(|| format!("Malformed row on line {}", line))?);
        bar.validate()
            .with_context(|| format!("Invalid row on line {}", line))?;
        bars.push(bar);
    }
    Ok(bars)
}

/// Saves the bars with up to `concurrency` inserts in flight. Bars already
/// stored for the same ticker and date are counted as skipped.
pub async fn import_bars(
    db_repo: &DbRepository,
    bars: &[PriceBar],
    concurrency: usize,
    progress: &ProgressBar,
) -> anyhow::Result<ImportSummary> {
    let pending: Vec<_> = bars.iter().map(|bar| db_repo.save_bar(bar)).collect();
    let mut results = stream::iter(pending).buffer_unordered(concurrency.max(1));

    let mut summary = ImportSummary::default();
    while let Some(result) = results.next().await {
        if result? {
            summary.inserted += 1;
        } else {
            summary.skipped += 1;
        }
        progress.inc(1);
    }
    Ok(summary)
}
