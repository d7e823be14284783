//! Core library for tickerfolio.
//!
//! Provides the session/authentication core (token expiry, persisted
//! credential, shared session context), the authenticated request
//! dispatcher over the portfolio REST API, the API models, and the
//! application configuration.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod utils;

pub use api::{ApiClient, ApiError, ApiResponse, Failure, FailureKind};
pub use auth::{AuthState, Credential, SessionContext, SessionStore};
pub use config::Config;
