//! REST API client module for the portfolio backend.
//!
//! This module provides the `ApiClient`, the single gateway for outbound
//! calls. Authenticated calls are refused locally when the session is not
//! valid, carry the session token as a bearer credential otherwise, and
//! report every failure as an `ApiError` that reduces to the uniform
//! `Failure { error, status }` shape.

pub mod client;
pub mod error;

pub use client::{ApiClient, ApiResponse};
pub use error::{ApiError, Failure, FailureKind};
