use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Message returned when a call is refused locally for lack of a session
pub const NOT_AUTHENTICATED_MESSAGE: &str = "User is not authenticated";

/// Message returned when a request went out but nothing came back
pub const NO_RESPONSE_MESSAGE: &str = "No response from the server";

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Refused locally; no request was sent.
    #[error("User is not authenticated")]
    Unauthenticated,

    /// The server answered with a non-success status.
    #[error("Server responded with {}: {}", .status, summarize_body(.body))]
    Server { status: u16, body: Value },

    /// The request went out but no response came back.
    #[error("No response from the server")]
    NoResponse(#[source] reqwest::Error),

    /// The request could not be built or sent.
    #[error("{0}")]
    Client(String),

    /// A success response whose payload did not have the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Explicit discriminant for the uniform failure shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Unauthenticated,
    Server,
    Network,
    Client,
    InvalidResponse,
}

/// Uniform `{ error, status }` value every failed call can be reduced to.
///
/// `status` is `None` when no response was received.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Failure {
    pub error: Value,
    pub status: Option<u16>,
    pub kind: FailureKind,
}

impl ApiError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ApiError::Unauthenticated => FailureKind::Unauthenticated,
            ApiError::Server { .. } => FailureKind::Server,
            ApiError::NoResponse(_) => FailureKind::Network,
            ApiError::Client(_) => FailureKind::Client,
            ApiError::InvalidResponse(_) => FailureKind::InvalidResponse,
        }
    }

    /// HTTP status, present only when one applies.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthenticated => Some(401),
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn to_failure(&self) -> Failure {
        let error = match self {
            ApiError::Unauthenticated => Value::String(NOT_AUTHENTICATED_MESSAGE.to_string()),
            ApiError::Server { body, .. } => body.clone(),
            ApiError::NoResponse(_) => Value::String(NO_RESPONSE_MESSAGE.to_string()),
            ApiError::Client(message) | ApiError::InvalidResponse(message) => {
                Value::String(message.clone())
            }
        };
        Failure {
            error,
            status: self.status(),
            kind: self.kind(),
        }
    }

    /// The `message` (or `error`) field of a server error body, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Server { body, .. } => body_message(body),
            _ => None,
        }
    }
}

fn body_message(body: &Value) -> Option<&str> {
    ["message", "error"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .or_else(|| body.as_str())
        .filter(|m| !m.is_empty())
}

/// Short human-readable form of an error body for logs and `Display`.
fn summarize_body(body: &Value) -> String {
    let text = match body_message(body) {
        Some(message) => message.to_string(),
        None => body.to_string(),
    };
    truncate_body(&text)
}

/// Truncate a response body to avoid logging excessive data
fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LENGTH {
        body.to_string()
    } else {
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }
}
