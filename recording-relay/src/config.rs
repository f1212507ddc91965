//! Configuration module for environment variable parsing.
//!
//! Configuration is read once at process start and shared read-only
//! with every request handler.

use std::env;
use tracing::warn;

/// Default Telegram Bot API endpoint.
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    /// Telegram bot token used to authenticate against the Bot API
    pub telegram_bot_token: Option<String>,

    /// Chat that receives every relayed recording
    pub telegram_chat_id: Option<String>,

    /// Base URL of the Bot API (overridable for staging or local testing)
    pub telegram_api_url: String,
}

/// The pair of credentials required before anything is sent to Telegram.
#[derive(Clone, PartialEq, Eq)]
pub struct TelegramCredentials {
    pub bot_token: String,
    pub chat_id: String,
}

impl std::fmt::Debug for TelegramCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramCredentials")
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Config {
            port: parse_port("PORT", 8080),

            telegram_bot_token: parse_secret("TELEGRAM_BOT_TOKEN"),

            telegram_chat_id: parse_secret("TELEGRAM_CHAT_ID"),

            telegram_api_url: env::var("TELEGRAM_API_URL")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string()),
        }
    }

    /// Both Telegram credentials, or `None` if either one is missing.
    pub fn telegram_credentials(&self) -> Option<TelegramCredentials> {
        match (&self.telegram_bot_token, &self.telegram_chat_id) {
            (Some(bot_token), Some(chat_id)) => Some(TelegramCredentials {
                bot_token: bot_token.clone(),
                chat_id: chat_id.clone(),
            }),
            _ => None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            telegram_bot_token: None,
            telegram_chat_id: None,
            telegram_api_url: DEFAULT_TELEGRAM_API_URL.to_string(),
        }
    }
}

/// Parse a port number, falling back to the default on bad input.
fn parse_port(name: &str, default: u16) -> u16 {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().parse::<u16>() {
        Ok(port) => port,
        Err(_) => {
            warn!(env_var = name, value = %raw, "Invalid port, using default");
            default
        }
    }
}

/// Read a credential, trimmed. Empty and whitespace-only values are unset.
fn parse_secret(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
