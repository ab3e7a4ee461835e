use analyzer::{AnalyzerError, ProfitPotentialOrchestrator};
use chrono::{Datelike, NaiveDate, Weekday};
use configuration::AnalysisConfig;
use database::{InMemoryPriceStore, MemoryStoreError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Weekdays from `start`, one per close.
fn weekdays(start: NaiveDate, closes: &[Decimal]) -> Vec<(NaiveDate, Decimal)> {
    let mut out = Vec::with_capacity(closes.len());
    let mut day = start;
    for close in closes {
        while matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            day = day.succ_opt().unwrap();
        }
        out.push((day, *close));
        day = day.succ_opt().unwrap();
    }
    out
}

/// Three weeks of AAPL starting Monday 2024-01-01 plus three peers.
async fn market() -> InMemoryPriceStore {
    let store = InMemoryPriceStore::new();
    let aapl = [
        // Week 1: previous period.
        dec!(100), dec!(101), dec!(99), dec!(102), dec!(103),
        // Week 2: the analyzed window.
        dec!(100), dec!(90), dec!(120), dec!(110), dec!(130),
        // Week 3: next period.
        dec!(130), dec!(125), dec!(120), dec!(118), dec!(117),
    ];
    store.insert_closes("AAPL", &weekdays(date(2024, 1, 1), &aapl)).await;

    let week2 = date(2024, 1, 8);
    store
        .insert_closes("MSFT", &weekdays(week2, &[dec!(10), dec!(40), dec!(20), dec!(50), dec!(60)]))
        .await;
    store
        .insert_closes("GOOG", &weekdays(week2, &[dec!(100), dec!(160), dec!(150), dec!(170), dec!(165)]))
        .await;
    store
        .insert_closes("META", &weekdays(week2, &[dec!(50), dec!(55), dec!(52), dec!(60), dec!(58)]))
        .await;
    store
}

#[tokio::test]
async fn full_report_over_three_weeks() {
    let orchestrator = ProfitPotentialOrchestrator::new(market().await, AnalysisConfig::default());

    // Sat 6th through Sun 14th: the weekends hold no observations.
    let report = orchestrator
        .analyze_profit_potential("AAPL", date(2024, 1, 6), date(2024, 1, 14))
        .await
        .unwrap();

    let current = &report.current_period;
    assert_eq!(current.trading_days(), 5);
    assert_eq!(current.best_single_trade.buy_price, dec!(90));
    assert_eq!(current.best_single_trade.buy_date, date(2024, 1, 9));
    assert_eq!(current.best_single_trade.sell_price, dec!(130));
    assert_eq!(current.best_single_trade.sell_date, date(2024, 1, 12));
    assert_eq!(current.max_multi_trade_profit, dec!(50));

    let previous = &report.previous_period;
    assert_eq!(previous.period.start_date, date(2024, 1, 1));
    assert_eq!(previous.period.end_date, date(2024, 1, 5));
    assert_eq!(previous.best_single_trade.profit, dec!(4));
    assert_eq!(previous.max_multi_trade_profit, dec!(5));

    let next = &report.next_period;
    assert_eq!(next.period.start_date, date(2024, 1, 15));
    assert_eq!(next.period.end_date, date(2024, 1, 19));
    assert!(next.best_single_trade.is_no_trade());
    assert_eq!(next.best_single_trade.buy_price, dec!(130));
    assert_eq!(next.max_multi_trade_profit, Decimal::ZERO);

    // MSFT: 30 + 30 + 10 = 70, GOOG: 60 + 20 = 80, META: 5 + 8 = 13.
    let peers: Vec<_> = report
        .better_performing_stocks
        .iter()
        .map(|p| (p.ticker.as_str(), p.profit))
        .collect();
    assert_eq!(peers, vec![("GOOG", dec!(80)), ("MSFT", dec!(70))]);
}

#[tokio::test]
async fn report_serializes_with_the_expected_shape() {
    let orchestrator = ProfitPotentialOrchestrator::new(market().await, AnalysisConfig::default());
    let report = orchestrator
        .analyze_profit_potential("AAPL", date(2024, 1, 8), date(2024, 1, 12))
        .await
        .unwrap();

    let json = serde_json::to_value(&report).unwrap();
    for key in ["previousPeriod", "currentPeriod", "nextPeriod", "betterPerformingStocks"] {
        assert!(json.get(key).is_some(), "missing {}", key);
    }
    assert_eq!(json["betterPerformingStocks"][0]["ticker"], "GOOG");
}

#[tokio::test]
async fn repeated_runs_are_identical() {
    let orchestrator = ProfitPotentialOrchestrator::new(market().await, AnalysisConfig::default());
    let first = orchestrator
        .analyze_profit_potential("AAPL", date(2024, 1, 8), date(2024, 1, 12))
        .await
        .unwrap();
    let second = orchestrator
        .analyze_profit_potential("AAPL", date(2024, 1, 8), date(2024, 1, 12))
        .await
        .unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn first_week_has_no_previous_period() {
    let orchestrator = ProfitPotentialOrchestrator::new(market().await, AnalysisConfig::default());
    let err = orchestrator
        .analyze_profit_potential("AAPL", date(2024, 1, 1), date(2024, 1, 5))
        .await
        .unwrap_err();
    assert!(matches!(err, AnalyzerError::InsufficientHistory { .. }));
}

#[tokio::test]
async fn store_errors_keep_their_original_type() {
    let store = market().await;
    store.set_unavailable(true);
    let orchestrator = ProfitPotentialOrchestrator::new(store, AnalysisConfig::default());

    let err = orchestrator
        .analyze_profit_potential("AAPL", date(2024, 1, 8), date(2024, 1, 12))
        .await
        .unwrap_err();
    let AnalyzerError::Store(source) = err else {
        panic!("expected a store error, got {:?}", err);
    };
    assert_eq!(
        source.downcast_ref::<MemoryStoreError>(),
        Some(&MemoryStoreError::Unavailable)
    );
}
