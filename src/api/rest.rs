// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// Dataset endpoints, no authentication:
//
//   GET /                   liveness message
//   GET /stock/:ticker      indicator dataset as JSON  (?period=1mo|6mo|1y|5y)
//   GET /stock/:ticker/csv  the same dataset as a CSV attachment
//
// Cache maintenance:
//
//   POST /cache/clear                 drop every cached analysis
//   POST /cache/invalidate/:ticker    drop one (ticker, period) entry
//
// CORS is configured permissively; the dashboard is served from a different
// origin.
//
// Handlers own the request-boundary policy: period validation, ticker
// normalization, the (ticker, period) response cache, 2-decimal rounding of
// summary scalars, and the `{"error": ...}` failure body via `AppError`.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderName},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, error, info};

use crate::api::export;
use crate::app_state::AppState;
use crate::cache::CacheKey;
use crate::engine::{self, StockAnalysis};
use crate::error::AppError;
use crate::types::Period;

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // ── Dataset ─────────────────────────────────────────────────
        .route("/", get(root))
        .route("/stock/:ticker", get(get_stock))
        .route("/stock/:ticker/csv", get(get_stock_csv))
        // ── Cache maintenance ───────────────────────────────────────
        .route("/cache/clear", post(cache_clear))
        .route("/cache/invalidate/:ticker", post(cache_invalidate))
        // ── Middleware & State ──────────────────────────────────────
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Root (liveness)
// =============================================================================

async fn root() -> impl IntoResponse {
    Json(serde_json::json!({ "message": "Stock Analytics API running 🚀" }))
}

// =============================================================================
// Stock dataset (JSON)
// =============================================================================

#[derive(Debug, Deserialize)]
struct StockQuery {
    /// History window; defaults to 1y when absent.
    period: Option<String>,
}

/// The flat response shape the dashboard consumes: summary scalars rounded
/// to two decimals, followed by the aligned series.
#[derive(Debug, Serialize)]
struct StockResponse {
    ticker: String,
    latest_price: f64,
    /// Null when fewer than two bars were available.
    daily_change_pct: Option<f64>,
    period_high: f64,
    period_low: f64,
    dates: Vec<NaiveDate>,
    close: Vec<f64>,
    sma_50: Vec<f64>,
    sma_200: Vec<f64>,
    rsi: Vec<f64>,
    macd: Vec<f64>,
    signal: Vec<f64>,
}

impl StockResponse {
    fn from_analysis(analysis: &StockAnalysis) -> Self {
        let summary = &analysis.summary;
        let series = &analysis.series;
        Self {
            ticker: summary.ticker.clone(),
            latest_price: round2(summary.latest_price),
            daily_change_pct: summary.daily_change_pct.map(round2),
            period_high: round2(summary.period_high),
            period_low: round2(summary.period_low),
            dates: series.dates.clone(),
            close: series.close.clone(),
            sma_50: series.sma_50.clone(),
            sma_200: series.sma_200.clone(),
            rsi: series.rsi.clone(),
            macd: series.macd.clone(),
            signal: series.signal.clone(),
        }
    }
}

async fn get_stock(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
    Query(query): Query<StockQuery>,
) -> Result<Json<StockResponse>, AppError> {
    let analysis = analyze(&state, &ticker, query.period.as_deref()).await?;
    Ok(Json(StockResponse::from_analysis(&analysis)))
}

// =============================================================================
// Stock dataset (CSV attachment)
// =============================================================================

async fn get_stock_csv(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
    Query(query): Query<StockQuery>,
) -> Result<impl IntoResponse, AppError> {
    let analysis = analyze(&state, &ticker, query.period.as_deref()).await?;
    Ok(csv_response(&analysis))
}

/// Wrap the rendered CSV in download headers: `text/csv` content type plus
/// an attachment `Content-Disposition` of `{TICKER}_data.csv`.
fn csv_response(analysis: &StockAnalysis) -> ([(HeaderName, String); 2], String) {
    let disposition = format!(
        "attachment; filename=\"{}_data.csv\"",
        analysis.summary.ticker
    );
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        export::to_csv(analysis),
    )
}

// =============================================================================
// Cache maintenance
// =============================================================================

async fn cache_clear(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let before = state.cache.len();
    state.cache.clear();
    info!(entries = before, "response cache cleared");
    Json(serde_json::json!({ "cleared": before }))
}

async fn cache_invalidate(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
    Query(query): Query<StockQuery>,
) -> Result<impl IntoResponse, AppError> {
    let period = parse_period(query.period.as_deref())?;
    let key = CacheKey::new(ticker.trim().to_uppercase(), period);
    let removed = state.cache.invalidate(&key);
    info!(%key, removed, "cache invalidation requested");
    Ok(Json(serde_json::json!({ "invalidated": removed })))
}

// =============================================================================
// Shared request pipeline
// =============================================================================

/// Resolve one stock request: validate the period, normalize the ticker,
/// consult the cache, and on a miss fetch bars and run the engine.
///
/// Failures are never cached; only a computed analysis is inserted.
async fn analyze(
    state: &AppState,
    raw_ticker: &str,
    raw_period: Option<&str>,
) -> Result<Arc<StockAnalysis>, AppError> {
    let period = parse_period(raw_period)?;
    let ticker = raw_ticker.trim().to_uppercase();

    let key = CacheKey::new(ticker.clone(), period);
    if let Some(hit) = state.cache.get(&key) {
        debug!(%key, "serving cached analysis");
        return Ok(hit);
    }

    let bars = state
        .history
        .fetch_daily_bars(&ticker, period)
        .await
        .map_err(|e| {
            error!(ticker = %ticker, %period, error = %e, "history fetch failed");
            AppError::Provider(e.to_string())
        })?;

    let analysis = engine::compute_indicators(&bars, &ticker)?;
    info!(ticker = %ticker, %period, bars = bars.len(), "indicators computed");

    Ok(state.cache.insert(key, analysis))
}

/// Resolve the optional `period` query parameter, defaulting to 1y.
fn parse_period(raw: Option<&str>) -> Result<Period, AppError> {
    match raw {
        None => Ok(Period::default()),
        Some(raw) => Period::parse(raw).ok_or_else(|| AppError::InvalidPeriod(raw.to_string())),
    }
}

/// Round to two decimal places (ties away from zero, `f64::round` rules).
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use crate::engine::compute_indicators;
    use crate::types::PriceBar;
    use chrono::Days;

    fn analysis_for(closes: &[f64]) -> StockAnalysis {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars: Vec<PriceBar> = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PriceBar::new(start + Days::new(i as u64), c, c, c, c, None))
            .collect();
        compute_indicators(&bars, "TEST").unwrap()
    }

    // ---- parse_period ------------------------------------------------------

    #[test]
    fn absent_period_defaults_to_one_year() {
        assert_eq!(parse_period(None).unwrap(), Period::OneYear);
    }

    #[test]
    fn unrecognized_period_is_a_bad_request() {
        let err = parse_period(Some("2y")).unwrap_err();
        assert!(matches!(err, AppError::InvalidPeriod(ref v) if v == "2y"));
    }

    // ---- round2 ------------------------------------------------------------

    #[test]
    fn round2_rounds_to_cents() {
        assert!((round2(10.456) - 10.46).abs() < 1e-10);
        assert!((round2(-0.9803921568627451) - (-0.98)).abs() < 1e-10);
        assert_eq!(round2(102.0), 102.0);
        assert_eq!(round2(0.0), 0.0);
    }

    // ---- StockResponse -----------------------------------------------------

    #[test]
    fn response_rounds_summary_but_not_series() {
        let analysis = analysis_for(&[100.0, 102.0, 101.0]);
        let resp = StockResponse::from_analysis(&analysis);

        assert_eq!(resp.ticker, "TEST");
        assert!((resp.latest_price - 101.0).abs() < 1e-10);
        assert!((resp.daily_change_pct.unwrap() - (-0.98)).abs() < 1e-10);
        assert!((resp.period_high - 102.0).abs() < 1e-10);
        assert!((resp.period_low - 100.0).abs() < 1e-10);

        // Series keep full precision and full length.
        assert_eq!(resp.close, analysis.series.close);
        assert_eq!(resp.dates.len(), 3);
    }

    #[test]
    fn missing_daily_change_serializes_as_null() {
        let analysis = analysis_for(&[42.0]);
        let resp = StockResponse::from_analysis(&analysis);
        assert_eq!(resp.daily_change_pct, None);

        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value.get("daily_change_pct"), Some(&serde_json::Value::Null));
    }

    #[test]
    fn response_serializes_iso_dates() {
        let analysis = analysis_for(&[1.0, 2.0]);
        let value = serde_json::to_value(StockResponse::from_analysis(&analysis)).unwrap();
        assert_eq!(value["dates"][0], "2024-01-01");
        assert_eq!(value["dates"][1], "2024-01-02");
    }

    // ---- root & csv handlers -----------------------------------------------

    #[tokio::test]
    async fn liveness_body_carries_the_running_message() {
        let resp = root().await.into_response();
        assert_eq!(resp.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "Stock Analytics API running 🚀");
    }

    #[test]
    fn csv_download_sets_attachment_headers() {
        let analysis = analysis_for(&[10.0, 11.0]);
        let resp = csv_response(&analysis).into_response();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()[header::CONTENT_TYPE],
            "text/csv; charset=utf-8"
        );
        assert_eq!(
            resp.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"TEST_data.csv\""
        );
    }
}
