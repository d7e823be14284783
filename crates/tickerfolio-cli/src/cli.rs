//! Command-line argument parsing.

use anyhow::{bail, Context, Result};

/// Symbol shown when `history` is given none
pub const DEFAULT_SYMBOL: &str = "AAPL";

pub const USAGE: &str = "\
Usage: tickerfolio <command>

Commands:
  login                 Log in and store the session
  register              Create an account and store the session
  logout                End the session
  status                Show the current session
  dashboard             Portfolio value, ROI and holdings
  history [SYMBOL]      Historical closing prices (default AAPL)
  buy SYMBOL QUANTITY   Buy shares of a symbol
  sell SYMBOL           Sell all shares of a symbol
  help                  Show this message

Environment:
  TICKERFOLIO_API_URL   API base URL (overrides config file)
  TICKERFOLIO_USERNAME  Login name used instead of prompting
  TICKERFOLIO_PASSWORD  Password used instead of prompting
  RUST_LOG              Log filter (default: warn)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login,
    Register,
    Logout,
    Status,
    Dashboard,
    History { symbol: String },
    Buy { symbol: String, quantity: u32 },
    Sell { symbol: String },
    Help,
}

impl Command {
    /// Parse arguments, not including the program name.
    pub fn parse<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|a| a.as_ref().to_string()).collect();
        let rest = args.get(1..).unwrap_or_default();

        let command = match args.first().map(String::as_str) {
            None | Some("help") | Some("--help") | Some("-h") => Command::Help,
            Some("login") => Command::Login,
            Some("register") => Command::Register,
            Some("logout") => Command::Logout,
            Some("status") => Command::Status,
            Some("dashboard") => Command::Dashboard,
            Some("history") => Command::History {
                symbol: rest
                    .first()
                    .map(|s| normalize_symbol(s))
                    .unwrap_or_else(|| DEFAULT_SYMBOL.to_string()),
            },
            Some("buy") => {
                let [symbol, quantity] = rest else {
                    bail!("Usage: tickerfolio buy SYMBOL QUANTITY");
                };
                let quantity: u32 = quantity
                    .parse()
                    .with_context(|| format!("Invalid quantity: {}", quantity))?;
                if quantity == 0 {
                    bail!("Quantity must be at least 1");
                }
                Command::Buy {
                    symbol: normalize_symbol(symbol),
                    quantity,
                }
            }
            Some("sell") => {
                let [symbol] = rest else {
                    bail!("Usage: tickerfolio sell SYMBOL");
                };
                Command::Sell {
                    symbol: normalize_symbol(symbol),
                }
            }
            Some(other) => bail!("Unknown command: {}\n\n{}", other, USAGE),
        };
        Ok(command)
    }
}

fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_ascii_uppercase()
}
