// =============================================================================
// Yahoo Finance chart API client (public, unauthenticated)
// =============================================================================
//
// Fetches daily OHLC history via GET /v8/finance/chart/{ticker} with a
// `range` from the recognized period set and a fixed 1d interval.
//
// Response shape (abridged):
//   chart.result[0].timestamp[]                 epoch seconds, one per bar
//   chart.result[0].indicators.quote[0].open[]  parallel OHLCV arrays with
//     .high[] .low[] .close[] .volume[]         null where no trade data
//   chart.error                                 set for unknown symbols
//
// An unknown symbol or an empty result produces Ok(vec![]): "no data" is a
// domain outcome, not a transport failure.

use anyhow::{Context, Result};
use chrono::DateTime;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::types::{Period, PriceBar};

/// Fixed bar interval; the service works on daily bars only.
const INTERVAL: &str = "1d";

/// HTTP client for a Yahoo-Finance-compatible chart endpoint.
#[derive(Debug, Clone)]
pub struct HistoryClient {
    base_url: String,
    client: reqwest::Client,
}

impl HistoryClient {
    /// Create a new `HistoryClient`.
    ///
    /// # Arguments
    /// * `base_url` — endpoint root with no trailing slash.
    /// * `timeout_secs` — per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        let base_url = base_url.into();

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .user_agent(concat!("stock-analytics/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("failed to build reqwest client");

        debug!(base_url = %base_url, "HistoryClient initialised");

        Self { base_url, client }
    }

    /// GET /v8/finance/chart/{ticker} for daily bars over `period`.
    ///
    /// Returns bars sorted ascending by date with duplicate dates collapsed
    /// (the later row wins).  An unknown symbol or an empty upstream result
    /// returns an empty vector.
    #[instrument(skip(self), name = "yahoo::fetch_daily_bars")]
    pub async fn fetch_daily_bars(&self, ticker: &str, period: Period) -> Result<Vec<PriceBar>> {
        let url = format!(
            "{}/v8/finance/chart/{}?range={}&interval={}",
            self.base_url, ticker, period, INTERVAL
        );

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .context("GET /v8/finance/chart request failed")?;

        let status = resp.status();
        let body: Value = resp
            .json()
            .await
            .context("failed to parse chart response")?;

        if !status.is_success() {
            // Unknown symbols come back as an HTTP error carrying a
            // chart.error object, which is the "no data" outcome.
            if let Some(desc) = chart_error_description(&body) {
                warn!(ticker, %status, error = %desc, "chart API rejected the symbol");
                return Ok(Vec::new());
            }
            anyhow::bail!("chart API returned {}: {}", status, body);
        }

        let bars = parse_chart_bars(&body)?;
        debug!(ticker, %period, count = bars.len(), "daily bars fetched");
        Ok(bars)
    }
}

// =============================================================================
// Payload parsing
// =============================================================================

/// Extract the error description from a chart payload, if one is present.
fn chart_error_description(body: &Value) -> Option<String> {
    let err = &body["chart"]["error"];
    if err.is_null() {
        return None;
    }
    Some(
        err["description"]
            .as_str()
            .unwrap_or("unspecified chart error")
            .to_string(),
    )
}

/// Parse a chart payload into ascending, duplicate-free daily bars.
///
/// Rows with a null or non-numeric OHLC value are skipped (halted sessions
/// produce them).  A payload carrying an error object or no result at all
/// parses to an empty vector; a quote block missing one of its OHLC arrays
/// is an error.
fn parse_chart_bars(body: &Value) -> Result<Vec<PriceBar>> {
    if chart_error_description(body).is_some() {
        return Ok(Vec::new());
    }

    let result = match body["chart"]["result"].as_array().and_then(|r| r.first()) {
        Some(r) => r,
        None => return Ok(Vec::new()),
    };

    // An in-range but empty window has no timestamp array at all.
    let timestamps = match result["timestamp"].as_array() {
        Some(ts) => ts,
        None => return Ok(Vec::new()),
    };

    let quote = &result["indicators"]["quote"][0];
    let opens = quote_column(quote, "open")?;
    let highs = quote_column(quote, "high")?;
    let lows = quote_column(quote, "low")?;
    let closes = quote_column(quote, "close")?;
    let volumes = quote["volume"].as_array();

    let mut bars: Vec<PriceBar> = Vec::with_capacity(timestamps.len());
    let mut skipped = 0usize;

    for (i, ts) in timestamps.iter().enumerate() {
        let Some(epoch) = ts.as_i64() else {
            skipped += 1;
            continue;
        };
        let Some(date) = DateTime::from_timestamp(epoch, 0).map(|dt| dt.date_naive()) else {
            skipped += 1;
            continue;
        };

        let (open, high, low, close) = match (
            finite_f64(opens.get(i)),
            finite_f64(highs.get(i)),
            finite_f64(lows.get(i)),
            finite_f64(closes.get(i)),
        ) {
            (Some(o), Some(h), Some(l), Some(c)) => (o, h, l, c),
            _ => {
                skipped += 1;
                continue;
            }
        };

        let volume = volumes.and_then(|v| v.get(i)).and_then(Value::as_u64);

        bars.push(PriceBar::new(date, open, high, low, close, volume));
    }

    if skipped > 0 {
        debug!(skipped, "chart rows without usable OHLC data skipped");
    }

    // Ascending order with unique dates.  The sort is stable, so for rows
    // sharing a date the later payload row supersedes the earlier one
    // (live-quote rows duplicate the current session's date).
    bars.sort_by_key(|b| b.date);
    bars.dedup_by(|later, earlier| {
        if later.date == earlier.date {
            *earlier = later.clone();
            true
        } else {
            false
        }
    });

    Ok(bars)
}

/// Fetch a named column of the quote block as an array.
fn quote_column<'a>(quote: &'a Value, name: &str) -> Result<&'a Vec<Value>> {
    quote[name]
        .as_array()
        .with_context(|| format!("chart quote block missing '{name}' array"))
}

/// Read an optional JSON number as a finite f64, treating null and
/// non-numbers as absent.
fn finite_f64(val: Option<&Value>) -> Option<f64> {
    val.and_then(Value::as_f64).filter(|v| v.is_finite())
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    // 2024-01-01T00:00:00Z and the two following midnights.
    const JAN1: i64 = 1_704_067_200;
    const JAN2: i64 = JAN1 + 86_400;
    const JAN3: i64 = JAN2 + 86_400;

    fn payload(timestamps: Value, quote: Value) -> Value {
        json!({
            "chart": {
                "result": [{
                    "timestamp": timestamps,
                    "indicators": { "quote": [quote] }
                }],
                "error": null
            }
        })
    }

    // ---- parse_chart_bars --------------------------------------------------

    #[test]
    fn parses_well_formed_payload() {
        let body = payload(
            json!([JAN1, JAN2, JAN3]),
            json!({
                "open":   [10.0, 10.5, 10.8],
                "high":   [10.6, 11.0, 11.2],
                "low":    [9.9, 10.4, 10.6],
                "close":  [10.5, 10.8, 11.0],
                "volume": [1000, 1100, null]
            }),
        );
        let bars = parse_chart_bars(&body).unwrap();

        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(bars[2].date, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
        assert!((bars[1].close - 10.8).abs() < 1e-10);
        assert_eq!(bars[0].volume, Some(1000));
        assert_eq!(bars[2].volume, None);
    }

    #[test]
    fn intraday_timestamps_floor_to_the_session_date() {
        // 14:30 UTC on Jan 2 still belongs to the Jan 2 bar.
        let body = payload(
            json!([JAN2 + 52_200]),
            json!({
                "open": [10.0], "high": [10.6], "low": [9.9], "close": [10.5],
                "volume": [500]
            }),
        );
        let bars = parse_chart_bars(&body).unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    }

    #[test]
    fn null_ohlc_rows_are_skipped() {
        let body = payload(
            json!([JAN1, JAN2, JAN3]),
            json!({
                "open":   [10.0, null, 10.8],
                "high":   [10.6, 11.0, 11.2],
                "low":    [9.9, 10.4, 10.6],
                "close":  [10.5, null, 11.0],
                "volume": [1000, null, 1200]
            }),
        );
        let bars = parse_chart_bars(&body).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(bars[1].date, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
    }

    #[test]
    fn error_payload_parses_to_no_bars() {
        let body = json!({
            "chart": {
                "result": null,
                "error": { "code": "Not Found", "description": "No data found, symbol may be delisted" }
            }
        });
        assert!(parse_chart_bars(&body).unwrap().is_empty());
    }

    #[test]
    fn missing_result_parses_to_no_bars() {
        let body = json!({ "chart": { "result": [], "error": null } });
        assert!(parse_chart_bars(&body).unwrap().is_empty());

        let body = json!({ "chart": { "result": null, "error": null } });
        assert!(parse_chart_bars(&body).unwrap().is_empty());
    }

    #[test]
    fn missing_timestamp_array_parses_to_no_bars() {
        let body = json!({
            "chart": {
                "result": [{ "indicators": { "quote": [{}] } }],
                "error": null
            }
        });
        assert!(parse_chart_bars(&body).unwrap().is_empty());
    }

    #[test]
    fn missing_quote_column_is_an_error() {
        let body = payload(
            json!([JAN1]),
            json!({ "open": [10.0], "high": [10.6], "low": [9.9] }),
        );
        let err = parse_chart_bars(&body).unwrap_err();
        assert!(err.to_string().contains("close"));
    }

    #[test]
    fn unsorted_rows_come_back_ascending() {
        let body = payload(
            json!([JAN3, JAN1, JAN2]),
            json!({
                "open":   [3.0, 1.0, 2.0],
                "high":   [3.0, 1.0, 2.0],
                "low":    [3.0, 1.0, 2.0],
                "close":  [3.0, 1.0, 2.0],
                "volume": [3, 1, 2]
            }),
        );
        let bars = parse_chart_bars(&body).unwrap();
        let dates: Vec<_> = bars.iter().map(|b| b.date).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted);
        assert!((bars[0].close - 1.0).abs() < 1e-10);
    }

    #[test]
    fn duplicate_dates_keep_the_later_row() {
        // Two rows on Jan 2: the live-quote row (later in the payload)
        // must win.
        let body = payload(
            json!([JAN1, JAN2, JAN2 + 52_200]),
            json!({
                "open":   [10.0, 10.5, 10.5],
                "high":   [10.6, 11.0, 11.4],
                "low":    [9.9, 10.4, 10.4],
                "close":  [10.5, 10.8, 11.3],
                "volume": [1000, 1100, 1150]
            }),
        );
        let bars = parse_chart_bars(&body).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[1].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert!((bars[1].close - 11.3).abs() < 1e-10);
        assert_eq!(bars[1].volume, Some(1150));
    }

    // ---- chart_error_description -------------------------------------------

    #[test]
    fn error_description_extraction() {
        let body = json!({
            "chart": { "error": { "description": "symbol may be delisted" } }
        });
        assert_eq!(
            chart_error_description(&body).as_deref(),
            Some("symbol may be delisted")
        );

        let clean = json!({ "chart": { "error": null } });
        assert!(chart_error_description(&clean).is_none());
    }
}
