use std::cmp::Reverse;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date formats the history endpoint has been seen to emit.
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%b %d, %Y"];

/// One adjusted closing price for a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPrice {
    #[serde(default, deserialize_with = "super::lenient_id")]
    pub date: Option<String>,
    #[serde(
        rename = "adjustedClosingPrice",
        default,
        deserialize_with = "super::lenient_f64"
    )]
    pub adjusted_closing_price: Option<f64>,
}

impl HistoricalPrice {
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        let date = self.date.as_deref()?.trim();
        DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(date, fmt).ok())
    }

    /// Sort newest first. Rows whose date cannot be parsed go last, in
    /// their original order.
    pub fn sort_newest_first(prices: &mut [HistoricalPrice]) {
        prices.sort_by_key(|p| Reverse(p.parsed_date()));
    }
}
