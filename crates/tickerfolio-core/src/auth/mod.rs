//! Authentication module for managing the user session.
//!
//! This module provides:
//! - `token`: JWT expiry evaluation (fail-closed on anything undecodable)
//! - `SessionStore`: the credential owner, persisting through a `SessionStorage`
//! - `SessionContext`: the shared handle every consumer clones
//! - Storage backends: JSON file, OS keychain, in-memory
//!
//! Expiry is checked lazily on every read; there is no refresh timer.

pub mod credentials;
pub mod session;
pub mod storage;
pub mod token;
pub mod validation;

pub use credentials::KeyringStorage;
pub use session::{AuthState, Clock, Credential, SessionContext, SessionStore, SystemClock};
pub use storage::{FileStorage, MemoryStorage, SessionStorage, TOKEN_KEY, USER_ID_KEY};
pub use token::{TokenClaims, TokenError};
