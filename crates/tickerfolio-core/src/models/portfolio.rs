use serde::{Deserialize, Serialize};

/// Aggregate portfolio figures for a user, as computed by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    #[serde(default, deserialize_with = "super::lenient_f64")]
    pub total_portfolio_value: Option<f64>,
    /// Return on investment, in percent
    #[serde(default, deserialize_with = "super::lenient_f64")]
    pub roi: Option<f64>,
}

/// A held position with its share of the portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    #[serde(default, deserialize_with = "super::lenient_id")]
    pub symbol: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default, deserialize_with = "super::lenient_i64")]
    pub quantity: Option<i64>,
    #[serde(default, deserialize_with = "super::lenient_f64")]
    pub portfolio_percentage: Option<f64>,
    #[serde(default, deserialize_with = "super::lenient_f64")]
    pub last_closing_price: Option<f64>,
}

/// Body of the assets endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HoldingsResponse {
    #[serde(default)]
    pub stocks_details: Option<Vec<Holding>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_portfolio_summary() {
        let json = r#"{
            "total_portfolio_value": "15234.50",
            "roi": 12.3456,
            "stocks_details": [
                {"symbol": "AAPL", "quantity": 10, "last_closing_price": "150.25", "total_stock_value": "1502.50"}
            ]
        }"#;
        let summary: PortfolioSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.total_portfolio_value, Some(15234.5));
        assert_eq!(summary.roi, Some(12.3456));
    }

    #[test]
    fn test_portfolio_summary_ignores_malformed_positions() {
        let json = r#"{"total_portfolio_value": 100, "roi": 5, "stocks_details": [{"quantity": 1}]}"#;
        let summary: PortfolioSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.total_portfolio_value, Some(100.0));
        assert_eq!(summary.roi, Some(5.0));
    }

    #[test]
    fn test_portfolio_summary_missing_fields() {
        let summary: PortfolioSummary = serde_json::from_str(r#"{"roi": null}"#).unwrap();
        assert_eq!(summary, PortfolioSummary::default());

        let summary: PortfolioSummary = serde_json::from_str(r#"{"roi": "n/a"}"#).unwrap();
        assert_eq!(summary.roi, None);
    }

    #[test]
    fn test_parse_holdings() {
        let json = r#"{
            "total_portfolio_value": 3000,
            "stocks_details": [
                {"symbol": "MSFT", "company_name": "Microsoft", "quantity": 5,
                 "portfolio_percentage": 41.234, "last_closing_price": 410.1},
                {"symbol": "XYZ"},
                {"quantity": 2, "company_name": null}
            ]
        }"#;
        let resp: HoldingsResponse = serde_json::from_str(json).unwrap();
        let holdings = resp.stocks_details.unwrap();
        assert_eq!(holdings.len(), 3);
        assert_eq!(holdings[0].symbol.as_deref(), Some("MSFT"));
        assert_eq!(holdings[0].company_name.as_deref(), Some("Microsoft"));
        assert_eq!(holdings[1].quantity, None);
        assert_eq!(holdings[1].last_closing_price, None);
        assert_eq!(holdings[2].symbol, None);
        assert_eq!(holdings[2].quantity, Some(2));
    }

    #[test]
    fn test_holdings_without_details() {
        let resp: HoldingsResponse = serde_json::from_str(r#"{"total_portfolio_value": 0}"#).unwrap();
        assert!(resp.stocks_details.is_none());
    }
}
