//! Text renderings of the portfolio views.
//!
//! Each view takes the outcome of its fetch and turns it into lines for the
//! terminal. Failures become the view's fixed user-facing copy; missing
//! values become placeholders.

pub mod auth;
pub mod dashboard;
pub mod history;
pub mod holdings;

/// Outcome of a view's fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Ready(T),
    Failed,
}

impl<T, E> From<Result<T, E>> for ViewState<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => ViewState::Ready(data),
            Err(_) => ViewState::Failed,
        }
    }
}
