// =============================================================================
// Shared types: price bars and recognized history periods
// =============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single daily OHLC price bar for one ticker.
///
/// Bars are immutable once fetched. A bar sequence is always time-ordered
/// ascending with no duplicate dates; the provider enforces both before the
/// engine ever sees the data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Traded volume. Upstream omits it for some instruments and sessions.
    pub volume: Option<u64>,
}

impl PriceBar {
    pub fn new(
        date: NaiveDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: Option<u64>,
    ) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// The recognized history window for a stock request.
///
/// The engine treats the period as opaque: it only ever sees however many
/// bars the provider returned. Only the provider (as the `range` request
/// parameter) and the response cache (as part of the key) look inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    OneMonth,
    SixMonths,
    OneYear,
    FiveYears,
}

impl Period {
    /// Parse a period string. Case-insensitive, surrounding whitespace
    /// ignored. Returns `None` for anything outside the recognized set
    /// (`1mo`, `6mo`, `1y`, `5y`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "1mo" => Some(Self::OneMonth),
            "6mo" => Some(Self::SixMonths),
            "1y" => Some(Self::OneYear),
            "5y" => Some(Self::FiveYears),
            _ => None,
        }
    }

    /// The wire string sent to the provider.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneMonth => "1mo",
            Self::SixMonths => "6mo",
            Self::OneYear => "1y",
            Self::FiveYears => "5y",
        }
    }
}

impl Default for Period {
    fn default() -> Self {
        Self::OneYear
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
