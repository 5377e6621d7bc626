// =============================================================================
// HTTP API Module
// =============================================================================
//
// Presentation adapters around the engine: the axum REST surface (JSON) and
// the CSV export renderer.  Response-boundary policy lives here, including
// 2-decimal rounding of summary scalars, ISO-8601 dates, and the
// `{"error": ...}` failure body.  The engine itself returns full-precision
// values.

pub mod export;
pub mod rest;
