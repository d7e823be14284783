use tickerfolio_core::models::HistoricalPrice;
use tickerfolio_core::utils::NOT_AVAILABLE;

use super::ViewState;

const LOAD_ERROR: &str = "Failed to load data";
const EMPTY: &str = "No data available.";

/// Historical table for one symbol, one row per date.
pub fn render(symbol: &str, state: &ViewState<Vec<HistoricalPrice>>) -> Vec<String> {
    let mut lines = vec![
        format!("Stock Details for {}", symbol),
        "Date | Closing Price ($)".to_string(),
    ];

    match state {
        ViewState::Failed => lines.push(LOAD_ERROR.to_string()),
        ViewState::Ready(prices) if prices.is_empty() => lines.push(EMPTY.to_string()),
        ViewState::Ready(prices) => lines.extend(prices.iter().map(row)),
    }
    lines
}

fn row(price: &HistoricalPrice) -> String {
    let date = price.date.as_deref().unwrap_or(NOT_AVAILABLE);
    match price.adjusted_closing_price {
        Some(value) => format!("{} | ${}", date, value),
        None => format!("{} | {}", date, NOT_AVAILABLE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_row() {
        let prices = vec![HistoricalPrice {
            date: Some("2024-01-01".to_string()),
            adjusted_closing_price: Some(150.25),
        }];
        let lines = render("AAPL", &ViewState::Ready(prices));
        assert_eq!(
            lines,
            ["Stock Details for AAPL", "Date | Closing Price ($)", "2024-01-01 | $150.25"]
        );
    }

    #[test]
    fn test_whole_dollar_and_missing_values() {
        let prices = vec![
            HistoricalPrice {
                date: Some("Mar 28, 2024".to_string()),
                adjusted_closing_price: Some(171.0),
            },
            HistoricalPrice {
                date: Some("Feb 29, 2024".to_string()),
                adjusted_closing_price: None,
            },
            HistoricalPrice {
                date: None,
                adjusted_closing_price: Some(168.5),
            },
        ];
        let lines = render("AAPL", &ViewState::Ready(prices));
        assert_eq!(lines[2], "Mar 28, 2024 | $171");
        assert_eq!(lines[3], "Feb 29, 2024 | N/A");
        assert_eq!(lines[4], "N/A | $168.5");
    }

    #[test]
    fn test_empty_and_failed() {
        assert_eq!(render("X", &ViewState::Ready(vec![]))[2], "No data available.");
        assert_eq!(render("X", &ViewState::Failed)[2], "Failed to load data");
    }
}
