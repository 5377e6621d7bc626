// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicator math used by the
// engine.  Every function returns a series the same length as its input so
// positions stay aligned 1:1 with dates; warm-up positions and numerically
// undefined results are NaN until the engine sanitizes its output.

pub mod sma;
pub mod ema;
pub mod rsi;
pub mod macd;
