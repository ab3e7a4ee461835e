use analyzer::{PeriodAnalysis, ProfitPotentialReport};
use comfy_table::Table;

/// Renders a report as terminal tables: one row per period, then the peers.
pub fn report_tables(ticker: &str, report: &ProfitPotentialReport) -> String {
    let mut periods = Table::new();
    periods.set_header(vec![
        "Period",
        "Start",
        "End",
        "Trading days",
        "Buy",
        "Sell",
        "Best trade profit",
        "Multi-trade profit",
    ]);
    for (label, analysis) in [
        ("Previous", &report.previous_period),
        ("Current", &report.current_period),
        ("Next", &report.next_period),
    ] {
        periods.add_row(period_row(label, analysis));
    }

    let mut output = format!("Profit potential for {}\n{}\n", ticker, periods);

    if report.better_performing_stocks.is_empty() {
        output.push_str("\nNo peer outperformed the current period.\n");
    } else {
        let mut peers = Table::new();
        peers.set_header(vec!["Rank", "Ticker", "Multi-trade profit"]);
        for (rank, peer) in report.better_performing_stocks.iter().enumerate() {
            peers.add_row(vec![
                (rank + 1).to_string(),
                peer.ticker.clone(),
                peer.profit.to_string(),
            ]);
        }
        output.push_str(&format!("\nBetter performing stocks\n{}\n", peers));
    }

    output
}

fn period_row(label: &str, analysis: &PeriodAnalysis) -> Vec<String> {
    let trade = &analysis.best_single_trade;
    let (buy, sell) = if trade.is_no_trade() {
        ("-".to_string(), "-".to_string())
    } else {
        (
            format!("{} @ {}", trade.buy_date, trade.buy_price),
            format!("{} @ {}", trade.sell_date, trade.sell_price),
        )
    };
    vec![
        label.to_string(),
        analysis.period.start_date.to_string(),
        analysis.period.end_date.to_string(),
        analysis.trading_days().to_string(),
        buy,
        sell,
        trade.profit.to_string(),
        analysis.max_multi_trade_profit.to_string(),
    ]
}
