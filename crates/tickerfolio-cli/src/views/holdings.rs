use tickerfolio_core::models::Holding;
use tickerfolio_core::utils::{format_percent, NOT_AVAILABLE};

use super::ViewState;

const LOAD_ERROR: &str = "Failed to load holdings";
const EMPTY: &str = "No holdings yet.";

/// Placeholder while a price has not been fetched by the backend
const PRICE_PENDING: &str = "Loading...";

/// One block per held position.
pub fn render(state: &ViewState<Vec<Holding>>) -> Vec<String> {
    let holdings = match state {
        ViewState::Failed => return vec![LOAD_ERROR.to_string()],
        ViewState::Ready(holdings) if holdings.is_empty() => return vec![EMPTY.to_string()],
        ViewState::Ready(holdings) => holdings,
    };

    let mut lines = vec!["Holdings".to_string()];
    for holding in holdings {
        lines.push(format!(
            "{} - {}",
            holding.symbol.as_deref().unwrap_or(NOT_AVAILABLE),
            holding.company_name.as_deref().unwrap_or("Unknown")
        ));
        lines.push(format!(
            "  Shares: {}",
            holding
                .quantity
                .map(|q| q.to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string())
        ));
        lines.push(format!(
            "  Portfolio %: {}",
            format_percent(holding.portfolio_percentage)
        ));
        lines.push(format!(
            "  Last Close: {}",
            holding
                .last_closing_price
                .map(|p| format!("${:.2}", p))
                .unwrap_or_else(|| PRICE_PENDING.to_string())
        ));
    }
    lines
}
