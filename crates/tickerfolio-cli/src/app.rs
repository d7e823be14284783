//! Application state and command handlers for the tickerfolio CLI.
//!
//! `App` owns the configuration and the one `SessionContext` every command
//! reads through. The API client is built only for commands that reach the
//! backend, so local commands work without an API URL.

use std::io::{self, Write};

use anyhow::{bail, Result};
use chrono::Local;
use futures::future;
use tracing::{debug, error, info, warn};

use tickerfolio_core::auth::validation::{validate_login, validate_registration};
use tickerfolio_core::auth::SessionStorage;
use tickerfolio_core::{ApiClient, Config, SessionContext};

use crate::cli::Command;
use crate::views::auth::{failure_message, Flow};
use crate::views::{dashboard, history, holdings, ViewState};

/// Environment variable consulted before prompting for a login name
const USERNAME_ENV: &str = "TICKERFOLIO_USERNAME";

/// Environment variable consulted before prompting for a password
const PASSWORD_ENV: &str = "TICKERFOLIO_PASSWORD";

const NOT_LOGGED_IN: &str = "Not logged in. Run `tickerfolio login` first.";

pub struct App {
    pub config: Config,
    session: SessionContext,
}

impl App {
    /// Create a new application instance
    pub fn new() -> Result<Self> {
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };
        debug!(storage = ?config.storage, "Config loaded");

        let storage = config.open_storage()?;
        Self::with_storage(config, storage)
    }

    pub fn with_storage(config: Config, storage: Box<dyn SessionStorage>) -> Result<Self> {
        let session = SessionContext::initialize(storage)?;
        Ok(Self { config, session })
    }

    /// Client for the configured backend, sharing this app's session.
    fn connect(&self) -> Result<ApiClient> {
        ApiClient::with_timeout(
            self.config.api_base_url()?,
            self.session.clone(),
            self.config.request_timeout(),
        )
    }

    /// Run one command and return the lines to print.
    pub async fn run(&mut self, command: Command) -> Result<Vec<String>> {
        match command {
            Command::Status => Ok(self.status().await),
            Command::Help => Ok(vec![crate::cli::USAGE.to_string()]),
            Command::Login => {
                let api = self.connect()?;
                self.login(&api).await
            }
            Command::Register => {
                let api = self.connect()?;
                self.register(&api).await
            }
            Command::Logout => self.logout(&self.connect()?).await,
            Command::Dashboard => self.dashboard(&self.connect()?).await,
            Command::History { symbol } => Ok(Self::history(&self.connect()?, &symbol).await),
            Command::Buy { symbol, quantity } => {
                self.buy(&self.connect()?, &symbol, quantity).await
            }
            Command::Sell { symbol } => self.sell(&self.connect()?, &symbol).await,
        }
    }

    // =========================================================================
    // Session
    // =========================================================================

    async fn login(&mut self, api: &ApiClient) -> Result<Vec<String>> {
        let (name, password) = self.prompt_credentials()?;
        if let Err(e) = validate_login(&name, &password) {
            bail!("{}", e);
        }

        match api.login(&name, &password).await {
            Ok(credential) => {
                self.remember_username(name);
                Ok(vec![format!(
                    "Logged in as user {}.",
                    credential.user_id.as_deref().unwrap_or("?")
                )])
            }
            Err(e) => {
                error!(error = %e, "Login failed");
                bail!("{}", failure_message(Flow::Login, &e))
            }
        }
    }

    async fn register(&mut self, api: &ApiClient) -> Result<Vec<String>> {
        let (name, password) = self.prompt_credentials()?;
        if let Err(e) = validate_registration(&name, &password) {
            bail!("{}", e);
        }

        match api.register(&name, &password).await {
            Ok(credential) => {
                self.remember_username(name);
                Ok(vec![format!(
                    "Registered and logged in as user {}.",
                    credential.user_id.as_deref().unwrap_or("?")
                )])
            }
            Err(e) => {
                error!(error = %e, "Registration failed");
                bail!("{}", failure_message(Flow::Register, &e))
            }
        }
    }

    async fn logout(&self, api: &ApiClient) -> Result<Vec<String>> {
        api.logout().await?;
        info!("Logged out");
        Ok(vec!["Logged out.".to_string()])
    }

    async fn status(&self) -> Vec<String> {
        let credential = self.session.snapshot().await;
        let mut lines = vec![format!(
            "User: {}",
            credential.user_id.as_deref().unwrap_or("none")
        )];

        if credential.is_authenticated {
            lines.push("Session: authenticated".to_string());
        } else if credential.token.is_some() {
            lines.push("Session: expired".to_string());
        } else {
            lines.push("Session: not logged in".to_string());
        }

        if let Some(expiry) = credential.expires_at() {
            lines.push(format!(
                "Token expires: {}",
                expiry.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")
            ));
        }
        lines
    }

    fn remember_username(&mut self, name: String) {
        self.config.last_username = Some(name);
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to save config");
        }
    }

    fn prompt_credentials(&self) -> Result<(String, String)> {
        let name = match std::env::var(USERNAME_ENV) {
            Ok(name) if !name.is_empty() => name,
            _ => self.prompt_username()?,
        };
        let password = match std::env::var(PASSWORD_ENV) {
            Ok(password) if !password.is_empty() => password,
            _ => rpassword::prompt_password("Password: ")?,
        };
        Ok((name, password))
    }

    fn prompt_username(&self) -> Result<String> {
        match self.config.last_username {
            Some(ref last) => print!("Name [{}]: ", last),
            None => print!("Name: "),
        }
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim();

        Ok(match (input.is_empty(), &self.config.last_username) {
            (true, Some(last)) => last.clone(),
            _ => input.to_string(),
        })
    }

    /// User id of a live session, or the not-logged-in error.
    async fn require_user(&self) -> Result<String> {
        match self.session.user_id().await {
            Some(user_id) if self.session.is_authenticated().await => Ok(user_id),
            _ => bail!(NOT_LOGGED_IN),
        }
    }

    // =========================================================================
    // Views
    // =========================================================================

    async fn dashboard(&self, api: &ApiClient) -> Result<Vec<String>> {
        let user_id = self.require_user().await?;

        let (summary, positions) = future::join(
            api.fetch_portfolio_summary(&user_id),
            api.fetch_holdings(&user_id),
        )
        .await;

        let summary = ViewState::from(summary);
        let positions = ViewState::from(positions);

        let mut lines = dashboard::render_value_card(&summary);
        lines.push(String::new());
        lines.extend(dashboard::render_roi_card(&summary));
        lines.push(String::new());
        lines.extend(holdings::render(&positions));
        Ok(lines)
    }

    async fn history(api: &ApiClient, symbol: &str) -> Vec<String> {
        let prices = api.fetch_historical_prices(symbol).await;
        history::render(symbol, &ViewState::from(prices))
    }

    async fn buy(&self, api: &ApiClient, symbol: &str, quantity: u32) -> Result<Vec<String>> {
        let user_id = self.require_user().await?;
        match api.buy(&user_id, symbol, quantity).await {
            Ok(response) => Ok(vec![response
                .message()
                .unwrap_or("Purchase submitted.")
                .to_string()]),
            Err(e) => bail!(
                "Failed to buy {}: {}",
                symbol,
                e.server_message().map(str::to_string).unwrap_or_else(|| e.to_string())
            ),
        }
    }

    async fn sell(&self, api: &ApiClient, symbol: &str) -> Result<Vec<String>> {
        let user_id = self.require_user().await?;
        match api.sell_all(&user_id, symbol).await {
            Ok(response) => Ok(vec![response
                .message()
                .unwrap_or("Sale submitted.")
                .to_string()]),
            Err(e) => bail!(
                "Failed to sell {}: {}",
                symbol,
                e.server_message().map(str::to_string).unwrap_or_else(|| e.to_string())
            ),
        }
    }
}
