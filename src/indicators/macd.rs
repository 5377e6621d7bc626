// =============================================================================
// Moving Average Convergence Divergence (MACD)
// =============================================================================
//
// MACD line   = EMA(close, fast) - EMA(close, slow)
// Signal line = EMA(MACD line, signal_span)
//
// Both close EMAs seed with the first input value, so the MACD line and the
// signal line are defined from index 0 and stay index-aligned with the
// input closes.  At index 0 the two EMAs coincide and the MACD line is
// exactly zero.

use crate::indicators::ema::ema;

/// Compute the MACD line and its signal line for `closes`.
///
/// Returns `(macd_line, signal_line)`, each the same length as `closes`.
///
/// # Edge cases
/// - Empty input => two empty vectors.
/// - A zero span (fast, slow, or signal) => NaN propagates from the
///   corresponding EMA.
pub fn macd(
    closes: &[f64],
    fast: usize,
    slow: usize,
    signal_span: usize,
) -> (Vec<f64>, Vec<f64>) {
    let fast_ema = ema(closes, fast);
    let slow_ema = ema(closes, slow);

    let macd_line: Vec<f64> = fast_ema
        .iter()
        .zip(slow_ema.iter())
        .map(|(f, s)| f - s)
        .collect();

    let signal_line = ema(&macd_line, signal_span);
    (macd_line, signal_line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macd_empty_input() {
        let (macd_line, signal_line) = macd(&[], 12, 26, 9);
        assert!(macd_line.is_empty());
        assert!(signal_line.is_empty());
    }

    #[test]
    fn macd_is_ema_spread_at_every_index() {
        let closes: Vec<f64> = (0..60)
            .map(|i| 100.0 + 10.0 * (i as f64 * 0.7).sin())
            .collect();
        let (macd_line, _) = macd(&closes, 12, 26, 9);
        let fast = ema(&closes, 12);
        let slow = ema(&closes, 26);

        assert_eq!(macd_line.len(), closes.len());
        for i in 0..closes.len() {
            assert!(
                (macd_line[i] - (fast[i] - slow[i])).abs() < 1e-12,
                "index {i}"
            );
        }
    }

    #[test]
    fn macd_starts_at_zero() {
        // Both EMAs seed with the same first close, so the spread at index 0
        // is exactly zero, and so is the signal seed.
        let (macd_line, signal_line) = macd(&[101.3, 99.8, 103.4], 12, 26, 9);
        assert_eq!(macd_line[0], 0.0);
        assert_eq!(signal_line[0], 0.0);
    }

    #[test]
    fn macd_constant_series_is_all_zero() {
        let closes = vec![250.0; 30];
        let (macd_line, signal_line) = macd(&closes, 12, 26, 9);
        for i in 0..closes.len() {
            assert!(macd_line[i].abs() < 1e-10);
            assert!(signal_line[i].abs() < 1e-10);
        }
    }

    #[test]
    fn signal_lags_the_macd_line() {
        // On a trending series the fast spread moves first; the signal is a
        // smoothed copy and must differ somewhere after the seed.
        let closes: Vec<f64> = (1..=40).map(|x| x as f64 * 1.5).collect();
        let (macd_line, signal_line) = macd(&closes, 12, 26, 9);
        assert_eq!(signal_line.len(), macd_line.len());
        assert_eq!(signal_line[0], macd_line[0]);
        assert!(macd_line
            .iter()
            .zip(&signal_line)
            .any(|(m, s)| (m - s).abs() > 1e-9));
    }
}
