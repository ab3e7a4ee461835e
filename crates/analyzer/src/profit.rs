use crate::error::AnalyzerError;
use crate::report::{PeriodAnalysis, PeriodWindow, TradeRecommendation};
use chrono::NaiveDate;
use core_types::{PriceRecord, PriceStore, SortOrder};
use rust_decimal::Decimal;

/// Computes the best single trade and the maximum multi-trade profit of an
/// instrument over a window.
pub struct PeriodProfitAnalyzer<'a, S> {
    store: &'a S,
}

impl<'a, S: PriceStore> PeriodProfitAnalyzer<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Analyzes `ticker` over `[start, end]`.
    ///
    /// Returns `Ok(None)` when the window holds no observations, which is
    /// different from a window whose best profit is zero.
    pub async fn analyze(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Option<PeriodAnalysis>, AnalyzerError> {
        let records = self
            .store
            .query_range(ticker, start, end, SortOrder::Ascending)
            .await
            .map_err(AnalyzerError::store)?;

        let analysis = analyze_records(start, end, &records);
        match &analysis {
            Some(a) => tracing::debug!(
                ticker = %ticker,
                %start,
                %end,
                trading_days = a.trading_days(),
                best_profit = %a.best_single_trade.profit,
                multi_trade_profit = %a.max_multi_trade_profit,
                "Analyzed period."
            ),
            None => tracing::debug!(ticker = %ticker, %start, %end, "No observations in period."),
        }
        Ok(analysis)
    }
}

/// Builds the analysis of an already fetched window. `records` must be
/// ordered ascending by date.
pub fn analyze_records(
    start: NaiveDate,
    end: NaiveDate,
    records: &[PriceRecord],
) -> Option<PeriodAnalysis> {
    let best_single_trade = best_single_trade(records)?;
    Some(PeriodAnalysis {
        period: PeriodWindow {
            start_date: start,
            end_date: end,
            trading_days: records.len() as u64,
        },
        best_single_trade,
        max_multi_trade_profit: max_multi_trade_profit(records),
    })
}

/// The most profitable single buy-then-sell pair, found in one pass.
///
/// The running minimum is the cheapest close seen so far. A later trade only
/// replaces the best one when it is strictly more profitable, so among equal
/// profits the earliest pair found wins. Without any profitable pair the result
/// is a no-trade on the first record. `None` only for an empty slice.
pub fn best_single_trade(records: &[PriceRecord]) -> Option<TradeRecommendation> {
    let (first, rest) = records.split_first()?;

    let mut min_price = first.close;
    let mut min_date = first.date;
    let mut best = TradeRecommendation::no_trade(first.date, first.close);

    for record in rest {
        let profit = record.close - min_price;
        if profit > best.profit {
            best = TradeRecommendation::new(min_date, min_price, record.date, record.close);
        }

        if record.close < min_price {
            min_price = record.close;
            min_date = record.date;
        }
    }

    Some(best)
}

/// Sum of every positive close-to-close move: the profit of buying before each
/// up day and selling at its close, with unlimited non-overlapping trades.
pub fn max_multi_trade_profit(records: &[PriceRecord]) -> Decimal {
    records
        .windows(2)
        .map(|pair| (pair[1].close - pair[0].close).max(Decimal::ZERO))
        .sum()
}
