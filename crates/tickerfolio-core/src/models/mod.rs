//! Data models for the portfolio API.
//!
//! - `HistoricalPrice`: one point of a symbol's adjusted closing series
//! - `PortfolioSummary`: aggregate value and ROI per user
//! - `Holding`: a held position as listed on the dashboard
//!
//! All fields are optional; the backend sends `Decimal` values as
//! either JSON numbers or strings, and missing data must render as a
//! placeholder rather than fail the whole payload.

pub mod portfolio;
pub mod stock;

pub use portfolio::{Holding, HoldingsResponse, PortfolioSummary};
pub use stock::HistoricalPrice;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accept a number, a numeric string, or null.
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Accept an integer, a float with no fractional part, a numeric string, or null.
pub(crate) fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_f64(deserializer)?
        .filter(|f| f.fract() == 0.0)
        .map(|f| f as i64))
}

/// Accept an identifier or label sent as either a JSON string or number.
pub(crate) fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
