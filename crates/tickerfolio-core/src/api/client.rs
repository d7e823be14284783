//! API client for communicating with the portfolio REST API.
//!
//! All data calls go through `get`/`post`, which consult the session
//! before anything is sent. Login and register are the only calls made
//! without a session.

use std::time::Duration;

use anyhow::Result;
use reqwest::{Client, Method, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use crate::auth::{token, Credential, SessionContext};
use crate::models::{HistoricalPrice, Holding, HoldingsResponse, PortfolioSummary};

use super::ApiError;

const LOGIN_PATH: &str = "/handle_login";
const REGISTER_PATH: &str = "/handle_register";
const LOGOUT_PATH: &str = "/handle_logout";

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    name: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    token: String,
    #[serde(rename = "userId", default, deserialize_with = "crate::models::lenient_id")]
    user_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct BuyRequest<'a> {
    symbol: &'a str,
    quantity: u32,
}

#[derive(Debug, Serialize)]
struct SellRequest<'a> {
    #[serde(rename = "userId")]
    user_id: &'a str,
    symbol: &'a str,
}

/// A successful response: status and payload, unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub data: Value,
}

impl ApiResponse {
    /// Deserialize the payload into a typed model.
    pub fn json<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        serde_json::from_value(self.data).map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    /// The `message` field of the payload, if any.
    pub fn message(&self) -> Option<&str> {
        self.data.get("message").and_then(Value::as_str)
    }
}

/// Gateway for every call to the backend.
/// Clone is cheap - reqwest::Client and the session context are both shared.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: SessionContext,
}

impl ApiClient {
    /// Create a new API client with the transport's default timeouts
    pub fn new(base_url: impl Into<String>, session: SessionContext) -> Result<Self> {
        Self::with_timeout(base_url, session, None)
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        session: SessionContext,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    // ===== Dispatcher =====

    /// Authenticated GET.
    pub async fn get(&self, path: &str) -> Result<ApiResponse, ApiError> {
        self.dispatch(Method::GET, path, None).await
    }

    /// Authenticated POST with a JSON body.
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse, ApiError> {
        let body = serde_json::to_value(body)
            .map_err(|e| ApiError::Client(format!("Failed to serialize request body: {}", e)));
        self.dispatch(Method::POST, path, Some(body)).await
    }

    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        body: Option<Result<Value, ApiError>>,
    ) -> Result<ApiResponse, ApiError> {
        let result = self.try_dispatch(method.clone(), path, body).await;
        if let Err(ref e) = result {
            error!(
                method = %method,
                path = path,
                status = ?e.status(),
                error = %e,
                "Error in authenticated request"
            );
        }
        result
    }

    async fn try_dispatch(
        &self,
        method: Method,
        path: &str,
        body: Option<Result<Value, ApiError>>,
    ) -> Result<ApiResponse, ApiError> {
        // The session lock is released before the request goes out
        let Some(token) = self.session.bearer_token().await else {
            return Err(ApiError::Unauthenticated);
        };

        let mut request = self.client.request(method, self.url(path)).bearer_auth(token);
        if let Some(body) = body {
            request = request.json(&body?);
        }
        Self::send(request).await
    }

    /// Unauthenticated POST, for the login and register endpoints only.
    async fn post_public<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse, ApiError> {
        let result = Self::send(self.client.post(self.url(path)).json(body)).await;
        if let Err(ref e) = result {
            error!(path = path, status = ?e.status(), error = %e, "Error in request");
        }
        result
    }

    /// Send a request and sort the outcome into success, server error,
    /// no response, or a request that never left.
    async fn send(request: RequestBuilder) -> Result<ApiResponse, ApiError> {
        let response = request.send().await.map_err(Self::classify)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(ApiError::NoResponse)?;
        let data = Self::parse_body(&bytes);

        if status.is_success() {
            Ok(ApiResponse {
                status: status.as_u16(),
                data,
            })
        } else {
            Err(ApiError::Server {
                status: status.as_u16(),
                body: data,
            })
        }
    }

    fn classify(err: reqwest::Error) -> ApiError {
        if err.is_builder() {
            ApiError::Client(err.to_string())
        } else {
            ApiError::NoResponse(err)
        }
    }

    /// JSON if it parses, the raw text otherwise, `null` when empty.
    fn parse_body(bytes: &[u8]) -> Value {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Value::Null;
        }
        serde_json::from_slice(bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
    }

    // ===== Session Flows =====

    /// Log in and store the returned token and user id.
    pub async fn login(&self, name: &str, password: &str) -> Result<Credential> {
        let response = self
            .post_public(LOGIN_PATH, &LoginRequest { name, password })
            .await?;
        let credential = self.establish_session(response).await?;
        info!(user_id = ?credential.user_id, "Login successful");
        Ok(credential)
    }

    /// Register a new account and store the returned token and user id.
    pub async fn register(&self, name: &str, password: &str) -> Result<Credential> {
        let response = self
            .post_public(REGISTER_PATH, &LoginRequest { name, password })
            .await?;
        let credential = self.establish_session(response).await?;
        info!(user_id = ?credential.user_id, "Registration successful");
        Ok(credential)
    }

    async fn establish_session(&self, response: ApiResponse) -> Result<Credential> {
        let auth: AuthResponse = response.json()?;

        // Registration answers without a userId; the token carries it
        let user_id = match auth.user_id {
            Some(id) => id,
            None => token::decode_claims(&auth.token)
                .ok()
                .and_then(|claims| claims.user_id())
                .ok_or_else(|| {
                    ApiError::InvalidResponse("Response did not include a user id".to_string())
                })?,
        };

        self.session.set_token(&auth.token).await?;
        self.session.set_user(&user_id).await?;
        Ok(self.session.snapshot().await)
    }

    /// Tell the backend we are leaving, then clear the local session
    /// whatever the backend said.
    pub async fn logout(&self) -> Result<()> {
        match self.post(LOGOUT_PATH, &json!({})).await {
            Ok(_) => debug!("Backend acknowledged logout"),
            Err(e) => warn!(error = %e, "Logout notification failed, clearing session anyway"),
        }
        self.session.clear().await
    }

    // ===== Data Fetching Methods =====

    /// Adjusted closing prices for a symbol, newest first.
    pub async fn fetch_historical_prices(
        &self,
        symbol: &str,
    ) -> Result<Vec<HistoricalPrice>, ApiError> {
        let path = format!("/stocks/{}/", symbol.trim());
        let response = self.get(&path).await?;
        let parsed = if response.data.is_array() {
            response.json::<Vec<HistoricalPrice>>()
        } else {
            Err(ApiError::InvalidResponse("Invalid data structure".to_string()))
        };
        let mut prices = Self::log_invalid(&path, parsed)?;
        HistoricalPrice::sort_newest_first(&mut prices);
        Ok(prices)
    }

    /// Total value and ROI for a user.
    pub async fn fetch_portfolio_summary(
        &self,
        user_id: &str,
    ) -> Result<PortfolioSummary, ApiError> {
        let path = format!("user/{}/", user_id);
        let response = self.get(&path).await?;
        let parsed = if response.data.is_object() {
            response.json()
        } else {
            Err(ApiError::InvalidResponse("Failed to fetch data".to_string()))
        };
        Self::log_invalid(&path, parsed)
    }

    /// Held positions for a user.
    pub async fn fetch_holdings(&self, user_id: &str) -> Result<Vec<Holding>, ApiError> {
        let path = format!("assets/{}/", user_id);
        let response = self.get(&path).await?;
        let parsed: HoldingsResponse = Self::log_invalid(&path, response.json())?;
        match parsed.stocks_details {
            Some(holdings) => Ok(holdings),
            None => {
                warn!(path = %path, "Unexpected holdings response structure");
                Ok(Vec::new())
            }
        }
    }

    /// Log a body that arrived but could not be used. Transport and status
    /// failures were already logged by the dispatcher.
    fn log_invalid<T>(path: &str, result: Result<T, ApiError>) -> Result<T, ApiError> {
        if let Err(ApiError::InvalidResponse(ref reason)) = result {
            error!(path = path, reason = %reason, "Error in response body");
        }
        result
    }

    pub async fn buy(
        &self,
        user_id: &str,
        symbol: &str,
        quantity: u32,
    ) -> Result<ApiResponse, ApiError> {
        self.post(
            &format!("/users/{}/stocks/buy", user_id),
            &BuyRequest { symbol, quantity },
        )
        .await
    }

    /// Sell every share of `symbol`.
    pub async fn sell_all(&self, user_id: &str, symbol: &str) -> Result<ApiResponse, ApiError> {
        self.post(
            &format!("/users/{}/stocks/remove", user_id),
            &SellRequest { user_id, symbol },
        )
        .await
    }
}
