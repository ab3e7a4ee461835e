use crate::calendar::TradingCalendarCounter;
use crate::error::AnalyzerError;
use crate::report::PeriodWindow;
use chrono::NaiveDate;
use core_types::{Direction, PriceStore};

/// Parses a user-supplied direction ("before" or "after").
pub fn parse_direction(value: &str) -> Result<Direction, AnalyzerError> {
    value
        .parse()
        .map_err(|_| AnalyzerError::InvalidDirection(value.to_string()))
}

/// Finds the window right before or after a reference window that spans the
/// same number of trading days.
///
/// Aligning on trading days rather than calendar days keeps the compared
/// periods the same length when weekends and holidays fall differently.
pub struct PeriodAligner<'a, S> {
    store: &'a S,
    counter: TradingCalendarCounter<'a, S>,
}

impl<'a, S: PriceStore> PeriodAligner<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            counter: TradingCalendarCounter::new(store),
        }
    }

    pub async fn find_adjacent_period(
        &self,
        ticker: &str,
        reference_start: NaiveDate,
        reference_end: NaiveDate,
        direction: Direction,
    ) -> Result<PeriodWindow, AnalyzerError> {
        let target = self
            .counter
            .count_trading_days(ticker, reference_start, reference_end)
            .await?;
        if target == 0 {
            return Err(AnalyzerError::NoTradingDays {
                ticker: ticker.to_string(),
                start: reference_start,
                end: reference_end,
            });
        }

        // Both queries return the record nearest the reference window first.
        let records = match direction {
            Direction::Before => self.store.query_before(ticker, reference_start, target).await,
            Direction::After => self.store.query_after(ticker, reference_end, target).await,
        }
        .map_err(AnalyzerError::store)?;

        let found = records.len() as u64;
        let insufficient = || AnalyzerError::InsufficientHistory {
            ticker: ticker.to_string(),
            direction,
            required: target,
            found,
        };
        if found < target {
            tracing::debug!(ticker = %ticker, %direction, target, found, "Not enough history to align period.");
            return Err(insufficient());
        }

        let (Some(nearest), Some(farthest)) = (records.first(), records.last()) else {
            return Err(insufficient());
        };
        let (start_date, end_date) = match direction {
            Direction::Before => (farthest.date, nearest.date),
            Direction::After => (nearest.date, farthest.date),
        };

        Ok(PeriodWindow {
            start_date,
            end_date,
            trading_days: target,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::InMemoryPriceStore;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    /// Weekdays of March 2024 from the 1st to the 22nd.
    async fn weekday_store() -> InMemoryPriceStore {
        let store = InMemoryPriceStore::new();
        let days = [1, 4, 5, 6, 7, 8, 11, 12, 13, 14, 15, 18, 19, 20, 21, 22];
        for (i, d) in days.iter().enumerate() {
            store
                .insert_closes("AAPL", &[(day(*d), dec!(100) + rust_decimal::Decimal::from(i))])
                .await;
        }
        store
    }

    #[tokio::test]
    async fn before_window_spans_the_same_trading_days() {
        let store = weekday_store().await;
        let aligner = PeriodAligner::new(&store);

        // 11th..13th is three trading days; the three before it are 6th, 7th, 8th.
        let window = aligner
            .find_adjacent_period("AAPL", day(11), day(13), Direction::Before)
            .await
            .unwrap();
        assert_eq!(
            window,
            PeriodWindow {
                start_date: day(6),
                end_date: day(8),
                trading_days: 3,
            }
        );
    }

    #[tokio::test]
    async fn after_window_skips_the_weekend() {
        let store = weekday_store().await;
        let aligner = PeriodAligner::new(&store);

        // 6th..8th is three trading days; the next three are Mon 11th to Wed 13th.
        let window = aligner
            .find_adjacent_period("AAPL", day(6), day(8), Direction::After)
            .await
            .unwrap();
        assert_eq!((window.start_date, window.end_date), (day(11), day(13)));
        assert_eq!(window.trading_days, 3);
    }

    #[tokio::test]
    async fn reference_days_are_counted_not_calendar_days() {
        let store = weekday_store().await;
        let aligner = PeriodAligner::new(&store);

        // Sat 9th..Sun 17th holds five trading days (11th..15th).
        let window = aligner
            .find_adjacent_period("AAPL", day(9), day(17), Direction::Before)
            .await
            .unwrap();
        assert_eq!((window.start_date, window.end_date), (day(4), day(8)));
        assert_eq!(window.trading_days, 5);
    }

    #[tokio::test]
    async fn exactly_enough_earlier_history() {
        let store = InMemoryPriceStore::new();
        store
            .insert_closes(
                "AAPL",
                &[
                    (day(1), dec!(1)),
                    (day(4), dec!(1)),
                    (day(5), dec!(1)),
                    (day(6), dec!(1)),
                    (day(7), dec!(1)),
                    (day(8), dec!(1)),
                ],
            )
            .await;
        let aligner = PeriodAligner::new(&store);

        let window = aligner
            .find_adjacent_period("AAPL", day(6), day(8), Direction::Before)
            .await
            .unwrap();
        assert_eq!((window.start_date, window.end_date), (day(1), day(5)));
    }

    #[tokio::test]
    async fn too_little_history_fails() {
        let store = InMemoryPriceStore::new();
        store
            .insert_closes(
                "AAPL",
                &[
                    (day(4), dec!(1)),
                    (day(5), dec!(1)),
                    (day(6), dec!(1)),
                    (day(7), dec!(1)),
                    (day(8), dec!(1)),
                ],
            )
            .await;
        let aligner = PeriodAligner::new(&store);

        let err = aligner
            .find_adjacent_period("AAPL", day(6), day(8), Direction::Before)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AnalyzerError::InsufficientHistory {
                direction: Direction::Before,
                required: 3,
                found: 2,
                ..
            }
        ));

        let err = aligner
            .find_adjacent_period("AAPL", day(6), day(8), Direction::After)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AnalyzerError::InsufficientHistory { found: 0, .. }
        ));
    }

    #[tokio::test]
    async fn empty_reference_window_has_no_trading_days() {
        let store = weekday_store().await;
        let aligner = PeriodAligner::new(&store);

        let err = aligner
            .find_adjacent_period("AAPL", day(9), day(10), Direction::After)
            .await
            .unwrap_err();
        assert!(matches!(err, AnalyzerError::NoTradingDays { .. }));
    }

    #[test]
    fn unknown_direction_is_rejected() {
        assert_eq!(parse_direction("After").unwrap(), Direction::After);
        let err = parse_direction("around").unwrap_err();
        assert!(matches!(err, AnalyzerError::InvalidDirection(d) if d == "around"));
    }
}
