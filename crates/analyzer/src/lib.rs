//! # Tickerscope Analyzer
//!
//! The profit-potential analysis engine. Given an instrument and a date window
//! it finds the best single trade, the maximum multi-trade profit, the same
//! figures for the equally long periods before and after, and the peers that
//! did better over the same window.
//!
//! ## Architectural Principles
//!
//! - **Store-agnostic:** Everything reads through `core_types::PriceStore`.
//!   Nothing here knows about SQL, HTTP or the instrument catalog.
//! - **Read-only:** Every report is derived fresh from the stored observations
//!   and nothing is written back.
//! - **Concurrent where independent:** The previous/next lookups run together,
//!   and peers are analyzed with bounded concurrency.
//!
//! ## Public API
//!
//! - `ProfitPotentialOrchestrator`: the entry point producing a `ProfitPotentialReport`.
//! - `PeriodProfitAnalyzer`, `PeriodAligner`, `PeerComparator`,
//!   `TradingCalendarCounter`: the individual components.
//! - `AnalyzerError`: the specific error types that can be returned from this crate.

pub mod aligner;
pub mod calendar;
pub mod error;
pub mod orchestrator;
pub mod peers;
pub mod profit;
pub mod report;

pub use aligner::{parse_direction, PeriodAligner};
pub use calendar::TradingCalendarCounter;
pub use error::AnalyzerError;
pub use orchestrator::ProfitPotentialOrchestrator;
pub use peers::{rank_peers, PeerComparator};
pub use profit::{best_single_trade, max_multi_trade_profit, PeriodProfitAnalyzer};
pub use report::{
    PeerRanking, PeriodAnalysis, PeriodWindow, ProfitPotentialReport, TradeRecommendation,
};
