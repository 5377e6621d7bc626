// =============================================================================
// API error taxonomy
// =============================================================================
//
// Every failure leaving a handler is one of these variants, serialized as an
// `{"error": "<message>"}` body, which is the shape the dashboard consumes.
// The engine itself only ever produces `NoData`; fetch and parse failures
// surface as `Provider` carrying the underlying message verbatim.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// The provider returned zero bars for the ticker.
    #[error("No data found for {0}")]
    NoData(String),

    /// The `period` query parameter is outside the recognized set.
    #[error("invalid period '{0}': expected one of 1mo, 6mo, 1y, 5y")]
    InvalidPeriod(String),

    /// The market-data provider failed: network, HTTP status, or a payload
    /// the parser could not work with.
    #[error("market data provider error: {0}")]
    Provider(String),

    /// Anything else.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NoData(_) => StatusCode::NOT_FOUND,
            AppError::InvalidPeriod(_) => StatusCode::BAD_REQUEST,
            AppError::Provider(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_user_facing() {
        assert_eq!(
            AppError::NoData("ZZZZ".into()).to_string(),
            "No data found for ZZZZ"
        );
        assert_eq!(
            AppError::InvalidPeriod("2y".into()).to_string(),
            "invalid period '2y': expected one of 1mo, 6mo, 1y, 5y"
        );
    }

    #[tokio::test]
    async fn body_is_the_error_object_the_dashboard_reads() {
        let resp = AppError::NoData("ZZZZ".into()).into_response();
        assert_eq!(resp.headers()["content-type"], "application/json");

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "error": "No data found for ZZZZ" }));
    }

    #[test]
    fn status_codes_match_variants() {
        assert_eq!(
            AppError::NoData("X".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::InvalidPeriod("x".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Provider("timeout".into()).into_response().status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::Internal("boom".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
