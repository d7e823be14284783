//! Utility functions for display formatting.

pub mod format;

// Re-export commonly used functions at module level
pub use format::{format_grouped, format_percent, NOT_AVAILABLE};
