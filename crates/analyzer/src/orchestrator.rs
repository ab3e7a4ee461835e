use crate::aligner::PeriodAligner;
use crate::error::AnalyzerError;
use crate::peers::PeerComparator;
use crate::profit::PeriodProfitAnalyzer;
use crate::report::{PeriodAnalysis, PeriodWindow, ProfitPotentialReport};
use chrono::NaiveDate;
use configuration::AnalysisConfig;
use core_types::{Direction, PriceStore};

/// Composes the period analyzer, aligner and peer comparator into one report.
///
/// Holds no state besides the store handle and tuning, so a single instance
/// can serve concurrent requests.
#[derive(Debug, Clone)]
pub struct ProfitPotentialOrchestrator<S> {
    store: S,
    config: AnalysisConfig,
}

impl<S: PriceStore> ProfitPotentialOrchestrator<S> {
    pub fn new(store: S, config: AnalysisConfig) -> Self {
        Self { store, config }
    }

    /// Analyzes `ticker` over `[start, end]`, the equally long periods on
    /// either side, and the peers that outperform it.
    ///
    /// Fails on the first error. There is no partial report: an empty current
    /// window is `NoData`, and a missing previous or next period fails the
    /// whole request.
    pub async fn analyze_profit_potential(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<ProfitPotentialReport, AnalyzerError> {
        tracing::info!(ticker = %ticker, %start, %end, "Analyzing profit potential.");

        let analyzer = PeriodProfitAnalyzer::new(&self.store);
        let aligner = PeriodAligner::new(&self.store);

        let current_period = analyzer
            .analyze(ticker, start, end)
            .await?
            .ok_or_else(|| no_data(ticker, start, end))?;

        let (previous_window, next_window) = tokio::try_join!(
            aligner.find_adjacent_period(ticker, start, end, Direction::Before),
            aligner.find_adjacent_period(ticker, start, end, Direction::After),
        )?;

        let (previous_period, next_period) = tokio::try_join!(
            analyze_window(&analyzer, ticker, previous_window),
            analyze_window(&analyzer, ticker, next_window),
        )?;

        let baseline = current_period.max_multi_trade_profit;
        let better_performing_stocks = PeerComparator::new(&self.store, self.config.peer_concurrency)
            .find_outperformers(ticker, start, end, baseline)
            .await?;

        tracing::info!(
            ticker = %ticker,
            multi_trade_profit = %baseline,
            outperformers = better_performing_stocks.len(),
            "Profit potential analysis complete."
        );

        Ok(ProfitPotentialReport {
            previous_period,
            current_period,
            next_period,
            better_performing_stocks,
        })
    }

    /// Analyzes only the period adjacent to `[start, end]` in `direction`.
    pub async fn analyze_adjacent_period(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
        direction: Direction,
    ) -> Result<PeriodAnalysis, AnalyzerError> {
        let analyzer = PeriodProfitAnalyzer::new(&self.store);
        let window = PeriodAligner::new(&self.store)
            .find_adjacent_period(ticker, start, end, direction)
            .await?;
        analyze_window(&analyzer, ticker, window).await
    }
}

/// Analyzes an aligned window. It held observations when it was aligned, so an
/// empty result means the store changed in between and is reported as `NoData`.
async fn analyze_window<S: PriceStore>(
    analyzer: &PeriodProfitAnalyzer<'_, S>,
    ticker: &str,
    window: PeriodWindow,
) -> Result<PeriodAnalysis, AnalyzerError> {
    analyzer
        .analyze(ticker, window.start_date, window.end_date)
        .await?
        .ok_or_else(|| no_data(ticker, window.start_date, window.end_date))
}

fn no_data(ticker: &str, start: NaiveDate, end: NaiveDate) -> AnalyzerError {
    AnalyzerError::NoData {
        ticker: ticker.to_string(),
        start,
        end,
    }
}
