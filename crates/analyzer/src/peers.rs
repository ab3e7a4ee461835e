use crate::error::AnalyzerError;
use crate::profit::PeriodProfitAnalyzer;
use crate::report::{PeerRanking, PeriodAnalysis};
use chrono::NaiveDate;
use core_types::PriceStore;
use futures::stream::{self, StreamExt, TryStreamExt};
use rust_decimal::Decimal;

/// Ranks the other instruments that beat a baseline multi-trade profit over
/// the same window.
pub struct PeerComparator<'a, S> {
    store: &'a S,
    analyzer: PeriodProfitAnalyzer<'a, S>,
    concurrency: usize,
}

impl<'a, S: PriceStore> PeerComparator<'a, S> {
    /// `concurrency` caps how many peers are analyzed at once; zero is treated as one.
    pub fn new(store: &'a S, concurrency: usize) -> Self {
        Self {
            store,
            analyzer: PeriodProfitAnalyzer::new(store),
            concurrency: concurrency.max(1),
        }
    }

    /// Peers with a multi-trade profit strictly above `baseline_profit` over
    /// `[start, end]`, best first and then by ticker.
    ///
    /// Candidates come from the stored observations, so an instrument removed
    /// from the catalog is still compared as long as its history exists.
    /// Peers with no observations in the window are skipped.
    pub async fn find_outperformers(
        &self,
        baseline_ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
        baseline_profit: Decimal,
    ) -> Result<Vec<PeerRanking>, AnalyzerError> {
        let candidates = self
            .store
            .distinct_instruments(baseline_ticker)
            .await
            .map_err(AnalyzerError::store)?;
        tracing::debug!(
            ticker = %baseline_ticker,
            candidates = candidates.len(),
            %baseline_profit,
            "Comparing peers."
        );

        let pending: Vec<_> = candidates
            .into_iter()
            .map(|ticker| self.analyze_candidate(ticker, start, end))
            .collect();
        let analyzed: Vec<_> = stream::iter(pending)
            .buffer_unordered(self.concurrency)
            .try_collect()
            .await?;

        let mut ranked: Vec<PeerRanking> = analyzed
            .into_iter()
            .filter_map(|(ticker, analysis)| {
                let profit = analysis?.max_multi_trade_profit;
                (profit > baseline_profit).then_some(PeerRanking { ticker, profit })
            })
            .collect();
        rank_peers(&mut ranked);

        Ok(ranked)
    }

    async fn analyze_candidate(
        &self,
        ticker: String,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<(String, Option<PeriodAnalysis>), AnalyzerError> {
        let analysis = self.analyzer.analyze(&ticker, start, end).await?;
        Ok((ticker, analysis))
    }
}

/// Orders peers by profit, highest first. Equal profits are ordered by ticker
/// so the ranking does not depend on the order analyses finished in.
pub fn rank_peers(peers: &mut [PeerRanking]) {
    peers.sort_by(|a, b| {
        b.profit
            .cmp(&a.profit)
            .then_with(|| a.ticker.cmp(&b.ticker))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::InMemoryPriceStore;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    /// Two closes whose multi-trade profit is exactly `profit`.
    async fn insert_profit(store: &InMemoryPriceStore, ticker: &str, profit: Decimal) {
        store
            .insert_closes(ticker, &[(day(1), dec!(100)), (day(2), dec!(100) + profit)])
            .await;
    }

    #[tokio::test]
    async fn ranks_only_strict_outperformers() {
        let store = InMemoryPriceStore::new();
        insert_profit(&store, "AAPL", dec!(20)).await;
        insert_profit(&store, "MSFT", dec!(30)).await;
        insert_profit(&store, "GOOG", dec!(50)).await;
        insert_profit(&store, "META", dec!(15)).await;
        insert_profit(&store, "AMZN", dec!(20)).await;

        let comparator = PeerComparator::new(&store, 4);
        let peers = comparator
            .find_outperformers("AAPL", day(1), day(2), dec!(20))
            .await
            .unwrap();

        assert_eq!(
            peers,
            vec![
                PeerRanking { ticker: "GOOG".to_string(), profit: dec!(50) },
                PeerRanking { ticker: "MSFT".to_string(), profit: dec!(30) },
            ]
        );
    }

    #[tokio::test]
    async fn peers_without_data_in_window_are_skipped() {
        let store = InMemoryPriceStore::new();
        insert_profit(&store, "AAPL", dec!(1)).await;
        store
            .insert_closes("OLD", &[(day(20), dec!(1)), (day(21), dec!(500))])
            .await;

        let comparator = PeerComparator::new(&store, 2);
        let peers = comparator
            .find_outperformers("AAPL", day(1), day(2), dec!(0))
            .await
            .unwrap();
        assert!(peers.is_empty());
    }

    #[tokio::test]
    async fn equal_profits_are_ordered_by_ticker() {
        let store = InMemoryPriceStore::new();
        for ticker in ["ZZZ", "BBB", "AAA", "MMM"] {
            insert_profit(&store, ticker, dec!(10)).await;
        }

        // Sequential and concurrent runs must agree.
        for concurrency in [1, 8] {
            let comparator = PeerComparator::new(&store, concurrency);
            let peers = comparator
                .find_outperformers("MMM", day(1), day(2), dec!(0))
                .await
                .unwrap();
            let tickers: Vec<_> = peers.iter().map(|p| p.ticker.as_str()).collect();
            assert_eq!(tickers, vec!["AAA", "BBB", "ZZZ"]);
        }
    }

    #[tokio::test]
    async fn store_failure_aborts_the_comparison() {
        let store = InMemoryPriceStore::new();
        insert_profit(&store, "AAPL", dec!(1)).await;
        store.set_unavailable(true);

        let comparator = PeerComparator::new(&store, 0);
        let err = comparator
            .find_outperformers("AAPL", day(1), day(2), dec!(0))
            .await
            .unwrap_err();
        assert!(matches!(err, AnalyzerError::Store(_)));
    }

    #[test]
    fn rank_peers_sorts_descending() {
        let mut peers = vec![
            PeerRanking { ticker: "B".to_string(), profit: dec!(1) },
            PeerRanking { ticker: "C".to_string(), profit: dec!(3) },
            PeerRanking { ticker: "A".to_string(), profit: dec!(1) },
        ];
        rank_peers(&mut peers);
        let order: Vec<_> = peers.iter().map(|p| p.ticker.as_str()).collect();
        assert_eq!(order, vec!["C", "A", "B"]);
    }
}
