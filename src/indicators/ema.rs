// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   alpha  = 2 / (span + 1)
//   EMA_0  = value_0
//   EMA_t  = value_t * alpha + EMA_{t-1} * (1 - alpha)
//
// The first input value seeds the recurrence directly, with no bias
// adjustment, so the series is defined from index 0 and the output is
// index-aligned with the input at every position.
// =============================================================================

/// Compute the EMA series for `values` with the given `span`.
///
/// The returned vector always has the same length as `values`.
///
/// # Edge cases
/// - `span == 0` => every position NaN (the smoothing factor is undefined).
/// - Empty input => empty output.
/// - A NaN input propagates through the recurrence from that index onward.
pub fn ema(values: &[f64], span: usize) -> Vec<f64> {
    if span == 0 {
        return vec![f64::NAN; values.len()];
    }
    let Some(&first) = values.first() else {
        return Vec::new();
    };

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    out.push(first);

    let mut prev = first;
    for &value in &values[1..] {
        let next = value * alpha + prev * (1.0 - alpha);
        out.push(next);
        prev = next;
    }
    out
}
