use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// An inclusive date window together with the number of trading days inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub trading_days: u64,
}

/// The best single buy-then-sell trade in a period.
///
/// When no pair of days yields a strictly positive profit this is a "no trade"
/// recommendation: buy and sell on the first day at its close, profit zero.
/// That keeps the field present in every analysis, at the cost of reporting a
/// trade nobody would make.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRecommendation {
    pub buy_date: NaiveDate,
    pub buy_price: Decimal,
    pub sell_date: NaiveDate,
    pub sell_price: Decimal,
    pub profit: Decimal,
}

impl TradeRecommendation {
    pub fn new(
        buy_date: NaiveDate,
        buy_price: Decimal,
        sell_date: NaiveDate,
        sell_price: Decimal,
    ) -> Self {
        Self {
            buy_date,
            buy_price,
            sell_date,
            sell_price,
            profit: sell_price - buy_price,
        }
    }

    /// Buy and sell on the same day.
    pub fn no_trade(date: NaiveDate, price: Decimal) -> Self {
        Self::new(date, price, date, price)
    }

    pub fn is_no_trade(&self) -> bool {
        self.profit.is_zero() && self.buy_date == self.sell_date
    }
}

/// The profit analysis of one instrument over one window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodAnalysis {
    pub period: PeriodWindow,
    pub best_single_trade: TradeRecommendation,
    /// Total of every upward day-to-day move in the window.
    pub max_multi_trade_profit: Decimal,
}

impl PeriodAnalysis {
    pub fn trading_days(&self) -> u64 {
        self.period.trading_days
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerRanking {
    pub ticker: String,
    pub profit: Decimal,
}

/// Everything known about an instrument's profit potential around a window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitPotentialReport {
    pub previous_period: PeriodAnalysis,
    pub current_period: PeriodAnalysis,
    pub next_period: PeriodAnalysis,
    /// Peers whose multi-trade profit beats the current period's, best first.
    pub better_performing_stocks: Vec<PeerRanking>,
}
