use tickerfolio_core::ApiError;

const NO_RESPONSE: &str = "No response from the server. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Login,
    Register,
}

impl Flow {
    fn noun(self) -> &'static str {
        match self {
            Flow::Login => "Login",
            Flow::Register => "Registration",
        }
    }
}

/// User-facing text for a failed login or registration.
///
/// Branches on whether a status came back: a server answer shows the
/// server's own message, silence gets the connectivity copy, anything else
/// the generic one.
pub fn failure_message(flow: Flow, err: &anyhow::Error) -> String {
    let Some(api_err) = err.downcast_ref::<ApiError>() else {
        return unexpected(flow);
    };
    match api_err {
        ApiError::Server { .. } => api_err
            .server_message()
            .map(str::to_string)
            .unwrap_or_else(|| format!("{} failed. Please try again.", flow.noun())),
        ApiError::NoResponse(_) => NO_RESPONSE.to_string(),
        _ => unexpected(flow),
    }
}

fn unexpected(flow: Flow) -> String {
    format!(
        "{} failed due to an unexpected error. Please try again.",
        flow.noun()
    )
}
