// =============================================================================
// Relative Strength Index (RSI), rolling-average variant
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether an asset is overbought or oversold.
//
// Step 1 — Compute price changes (deltas) from consecutive closes.  The
//          delta at index 0 has no predecessor and stays undefined.
// Step 2 — Split deltas into gains (delta, else 0) and losses (|delta|,
//          else 0).
// Step 3 — avg_gain / avg_loss are the trailing simple moving averages of
//          the gain and loss series over `period`.  Plain rolling means,
//          not Wilder's smoothing.
// Step 4 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// Zero-division convention, fixed and tested:
//   avg_loss == 0, avg_gain > 0   => RSI = 100 (no infinity arithmetic)
//   avg_loss == 0, avg_gain == 0  => NaN (a fully flat window is undefined;
//                                   the engine's sanitation maps it to 0)
//
// Because the index-0 delta is undefined, the first defined RSI sits at
// index `period`.  Output is index-aligned with the input.
// =============================================================================

use crate::indicators::sma::sma;

/// Compute the RSI series for `closes` over `period`.
///
/// The returned vector always has the same length as `closes`; warm-up
/// positions (indices `0..period`) are NaN.
///
/// # Edge cases
/// - `period == 0` or fewer than `period + 1` closes => every position NaN.
/// - A fully flat window (no gains, no losses) => NaN at that position.
/// - A window containing only gains => exactly 100.0.
/// - A NaN close leaves the deltas touching it undefined, which propagates
///   as NaN through the covering windows.
pub fn rsi(closes: &[f64], period: usize) -> Vec<f64> {
    let n = closes.len();
    let mut out = vec![f64::NAN; n];
    if period == 0 || n < period + 1 {
        return out;
    }

    // --- Deltas split into gain / loss series; index 0 stays undefined -------
    let mut gains = vec![f64::NAN; n];
    let mut losses = vec![f64::NAN; n];
    for i in 1..n {
        let delta = closes[i] - closes[i - 1];
        if delta.is_finite() {
            gains[i] = if delta > 0.0 { delta } else { 0.0 };
            losses[i] = if delta < 0.0 { -delta } else { 0.0 };
        }
    }

    // --- Rolling averages; windows reaching index 0 come back NaN ------------
    let avg_gain = sma(&gains, period);
    let avg_loss = sma(&losses, period);

    // --- RS -> RSI with the zero-division convention --------------------------
    for i in 0..n {
        let (gain, loss) = (avg_gain[i], avg_loss[i]);
        if gain.is_nan() || loss.is_nan() {
            continue;
        }
        out[i] = if loss == 0.0 {
            if gain > 0.0 {
                100.0
            } else {
                f64::NAN // fully flat window: 0/0 is undefined
            }
        } else {
            let rs = gain / loss;
            100.0 - 100.0 / (1.0 + rs)
        };
    }

    out
}
