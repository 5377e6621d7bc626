// =============================================================================
// Indicator Engine
// =============================================================================
//
// Turns a time-ordered slice of price bars into the full derived dataset the
// dashboard renders: the close series plus SMA-50, SMA-200, RSI-14,
// MACD(12,26,9) with its signal line, and the summary block (latest price,
// daily change %, period high/low).
//
// The engine performs no I/O and holds no state: the same bars always
// produce identical output.  Window parameters are fixed constants, not
// caller-configurable.
//
// Undefined positions (warm-up windows, flat-market RSI) are NaN while the
// series are computed and become the 0.0 sentinel in the returned dataset.
// Summary values keep full precision; rounding belongs to the response
// boundary.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::AppError;
use crate::indicators::macd::macd;
use crate::indicators::rsi::rsi;
use crate::indicators::sma::sma;
use crate::types::PriceBar;

/// Short simple-moving-average window, in bars.
pub const SMA_SHORT: usize = 50;
/// Long simple-moving-average window, in bars.
pub const SMA_LONG: usize = 200;
/// RSI look-back period, in bars.
pub const RSI_PERIOD: usize = 14;
/// MACD fast EMA span.
pub const MACD_FAST: usize = 12;
/// MACD slow EMA span.
pub const MACD_SLOW: usize = 26;
/// MACD signal-line EMA span.
pub const MACD_SIGNAL: usize = 9;

/// Summary statistics over the fetched window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Ticker label, exactly as the caller passed it in.
    pub ticker: String,
    /// Close of the most recent bar.
    pub latest_price: f64,
    /// Percent change between the last two closes.  `None` when fewer than
    /// two bars exist or the previous close is zero.
    pub daily_change_pct: Option<f64>,
    /// Highest high across the entire fetched window.
    pub period_high: f64,
    /// Lowest low across the entire fetched window.
    pub period_low: f64,
}

/// Derived series, each aligned 1:1 by index with the input bars.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSeries {
    pub dates: Vec<NaiveDate>,
    pub close: Vec<f64>,
    pub sma_50: Vec<f64>,
    pub sma_200: Vec<f64>,
    pub rsi: Vec<f64>,
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
}

/// The engine's output: summary block plus aligned series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockAnalysis {
    pub summary: Summary,
    pub series: IndicatorSeries,
}

/// Compute the full indicator dataset for `bars`.
///
/// `bars` must be time-ordered ascending with no duplicate dates; the
/// provider guarantees both.  Returns [`AppError::NoData`] when `bars` is
/// empty and never panics on any non-empty input.
pub fn compute_indicators(bars: &[PriceBar], ticker: &str) -> Result<StockAnalysis, AppError> {
    if bars.is_empty() {
        return Err(AppError::NoData(ticker.to_string()));
    }

    let dates: Vec<NaiveDate> = bars.iter().map(|b| b.date).collect();
    let mut close: Vec<f64> = bars.iter().map(|b| b.close).collect();

    // --- Derived series, full precision, NaN where undefined -----------------
    let mut sma_50 = sma(&close, SMA_SHORT);
    let mut sma_200 = sma(&close, SMA_LONG);
    let mut rsi_14 = rsi(&close, RSI_PERIOD);
    let (mut macd_line, mut signal_line) = macd(&close, MACD_FAST, MACD_SLOW, MACD_SIGNAL);

    let summary = summarize(bars, ticker);

    // --- Sentinel policy: non-finite positions become 0.0 ---------------------
    for series in [
        &mut close,
        &mut sma_50,
        &mut sma_200,
        &mut rsi_14,
        &mut macd_line,
        &mut signal_line,
    ] {
        sanitize(series);
    }

    Ok(StockAnalysis {
        summary,
        series: IndicatorSeries {
            dates,
            close,
            sma_50,
            sma_200,
            rsi: rsi_14,
            macd: macd_line,
            signal: signal_line,
        },
    })
}

/// Build the summary block from the raw bars.
fn summarize(bars: &[PriceBar], ticker: &str) -> Summary {
    let latest_price = bars[bars.len() - 1].close;

    let daily_change_pct = if bars.len() >= 2 {
        let prev = bars[bars.len() - 2].close;
        let last = bars[bars.len() - 1].close;
        // A zero previous close makes the change undefined, not infinite.
        (prev != 0.0).then(|| (last - prev) / prev * 100.0)
    } else {
        None
    };

    let period_high = bars.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
    let period_low = bars.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);

    Summary {
        ticker: ticker.to_string(),
        latest_price,
        daily_change_pct,
        period_high,
        period_low,
    }
}

/// Replace every non-finite value with the 0.0 sentinel, in place.
fn sanitize(series: &mut [f64]) {
    for v in series.iter_mut() {
        if !v.is_finite() {
            *v = 0.0;
        }
    }
}
