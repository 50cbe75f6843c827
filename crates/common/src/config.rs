use std::fmt;
use std::time::Duration;

/// Telegram delivery settings. Present only when a bot token is configured.
#[derive(Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: i64,
}

// Never print the bot token.
impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

/// All configuration loaded from environment variables at startup.
/// Malformed values cause an immediate panic with a clear message.
#[derive(Debug, Clone)]
pub struct Config {
    // Telegram (alerts are only logged when absent)
    pub telegram: Option<TelegramConfig>,

    // Webhook server
    pub webhook_port: u16,

    // Request defaults
    pub default_symbol: String,
    pub default_timeframe: String,

    // Strategy config file path
    pub strategy_config_path: String,

    // Collaborator timeouts
    pub data_timeout: Duration,
    pub notify_timeout: Duration,

    // Public IP discovery endpoint
    pub public_ip_url: String,
}

impl Config {
    /// Load all configuration from environment variables.
    /// Loads `.env` if present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // ignore error if .env not present

        let telegram = optional_env("TELEGRAM_BOT_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .map(|bot_token| {
                let raw = required_env("TELEGRAM_CHAT_ID");
                let chat_id = raw.trim().parse::<i64>().unwrap_or_else(|_| {
                    panic!("TELEGRAM_CHAT_ID must be a numeric chat id, got: '{raw}'")
                });
                TelegramConfig { bot_token, chat_id }
            });

        Config {
            telegram,
            webhook_port: parsed_env("WEBHOOK_PORT", 5000),
            default_symbol: optional_env("DEFAULT_SYMBOL")
                .unwrap_or_else(|| "RELIANCE.NS".to_string()),
            default_timeframe: optional_env("DEFAULT_TIMEFRAME")
                .unwrap_or_else(|| "30min".to_string()),
            strategy_config_path: optional_env("STRATEGY_CONFIG_PATH")
                .unwrap_or_else(|| "config/strategies.toml".to_string()),
            data_timeout: Duration::from_secs(parsed_env("DATA_TIMEOUT_SECS", 10)),
            notify_timeout: Duration::from_secs(parsed_env("NOTIFY_TIMEOUT_SECS", 2)),
            public_ip_url: optional_env("PUBLIC_IP_URL")
                .unwrap_or_else(|| "https://api.ipify.org".to_string()),
        }
    }
}

fn required_env(key: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| {
        panic!("Required environment variable '{key}' is not set. Check your .env file.")
    })
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn parsed_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    match optional_env(key) {
        Some(v) => v
            .trim()
            .parse()
            .unwrap_or_else(|_| panic!("Environment variable '{key}' has an invalid value: '{v}'")),
        None => default,
    }
}
