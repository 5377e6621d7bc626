// =============================================================================
// Market Data Provider Module
// =============================================================================
//
// HTTP access to a Yahoo-Finance-compatible chart endpoint, producing
// ordered daily [`PriceBar`](crate::types::PriceBar) sequences.  The engine
// never performs I/O itself; handlers fetch here first and hand the bars
// over.

pub mod client;

pub use client::HistoryClient;
