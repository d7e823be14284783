use tickerfolio_core::models::PortfolioSummary;
use tickerfolio_core::utils::{format_grouped, format_percent, NOT_AVAILABLE};

use super::ViewState;

const VALUE_ERROR: &str = "Unable to load portfolio value. Please try again later.";
const ROI_ERROR: &str = "Unable to load ROI. Please try again later.";

/// Total portfolio value card.
pub fn render_value_card(state: &ViewState<PortfolioSummary>) -> Vec<String> {
    let value = match state {
        ViewState::Failed => return vec![VALUE_ERROR.to_string()],
        ViewState::Ready(summary) => summary.total_portfolio_value,
    };
    let display = match value {
        Some(v) if v.is_finite() => format!("${}", format_grouped(v)),
        _ => format!("${}", NOT_AVAILABLE),
    };
    vec!["Total Portfolio Value".to_string(), display]
}

/// Return-on-investment card.
pub fn render_roi_card(state: &ViewState<PortfolioSummary>) -> Vec<String> {
    match state {
        ViewState::Failed => vec![ROI_ERROR.to_string()],
        ViewState::Ready(summary) => vec!["ROI".to_string(), format_percent(summary.roi)],
    }
}
