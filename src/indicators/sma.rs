// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
// Trailing arithmetic mean over a fixed window:
//
//   SMA[i] = mean(values[i - window + 1 ..= i])
//
// The output is index-aligned with the input.  Positions with fewer than
// `window` values behind them (the warm-up region) are NaN, and a NaN input
// anywhere inside a window makes that window's mean NaN.  Each window is
// summed independently so a NaN poisons only the windows that contain it.

/// Compute the trailing simple moving average of `values` over `window`.
///
/// The returned vector always has the same length as `values`.
///
/// # Edge cases
/// - `window == 0` => every position NaN (there is no window to average).
/// - `values.len() < window` => every position NaN.
/// - NaN input inside a window => NaN at that window's position.
pub fn sma(values: &[f64], window: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if window == 0 || values.len() < window {
        return out;
    }

    for i in (window - 1)..values.len() {
        let sum: f64 = values[i + 1 - window..=i].iter().sum();
        out[i] = sum / window as f64;
    }
    out
}
