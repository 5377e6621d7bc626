// =============================================================================
// CSV Export
// =============================================================================
//
// Renders a computed analysis as the dashboard's downloadable dataset: one
// row per bar, full-precision values, ISO-8601 dates.  Column labels match
// the dashboard table headers.

use crate::engine::StockAnalysis;

/// CSV header row.
const HEADER: &str = "Date,Close,SMA 50,SMA 200,RSI,MACD,Signal";

/// Render `analysis` as a CSV document: header first, one row per bar.
pub fn to_csv(analysis: &StockAnalysis) -> String {
    let series = &analysis.series;

    let mut out = String::with_capacity(HEADER.len() + 1 + series.dates.len() * 64);
    out.push_str(HEADER);
    out.push('\n');

    for i in 0..series.dates.len() {
        // NaiveDate's Display is already YYYY-MM-DD.
        out.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            series.dates[i],
            series.close[i],
            series.sma_50[i],
            series.sma_200[i],
            series.rsi[i],
            series.macd[i],
            series.signal[i],
        ));
    }

    out
}
