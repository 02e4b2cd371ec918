//! Telegram transport settings.

use cardgen_core::config::CardGenSettings;
use config::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Telegram transport settings loaded from environment variables.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct TelegramSettings {
    /// Telegram Bot API token.
    #[serde(default)]
    pub telegram_token: String,
    /// Legacy name for the token, used when `TELEGRAM_TOKEN` is unset.
    #[serde(default)]
    pub bot_token: Option<String>,
    /// Comma-separated list of allowed user IDs. Unset means open access.
    #[serde(rename = "allowed_users")]
    pub allowed_users_str: Option<String>,
}

/// Combined settings used by the Telegram transport layer.
#[derive(Clone)]
pub struct BotSettings {
    /// Generation settings shared across transport handlers.
    pub core: Arc<CardGenSettings>,
    /// Telegram-specific settings.
    pub telegram: Arc<TelegramSettings>,
}

impl BotSettings {
    /// Create a new combined settings bundle.
    #[must_use]
    pub fn new(core: CardGenSettings, telegram: TelegramSettings) -> Self {
        Self {
            core: Arc::new(core),
            telegram: Arc::new(telegram),
        }
    }
}

impl TelegramSettings {
    /// Create new settings by loading from environment and files.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if loading fails or no token is configured.
    pub fn new() -> Result<Self, ConfigError> {
        let mut settings: Self = cardgen_core::config::build_config()?.try_deserialize()?;
        if settings.telegram_token.trim().is_empty() {
            if let Some(token) = settings.bot_token.take() {
                settings.telegram_token = token;
            }
        }
        if settings.telegram_token.trim().is_empty() {
            return Err(ConfigError::Message(
                "TELEGRAM_TOKEN (or BOT_TOKEN) is not set".to_string(),
            ));
        }
        Ok(settings)
    }

    /// Returns the set of allowed user IDs.
    #[must_use]
    pub fn allowed_users(&self) -> HashSet<i64> {
        self.allowed_users_str
            .as_ref()
            .map(|s| {
                s.split(|c: char| c == ',' || c == ';' || c.is_whitespace())
                    .filter(|token| !token.is_empty())
                    .filter_map(|id| id.parse::<i64>().ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Whether `user_id` may use the bot.
    ///
    /// An unset or blank `ALLOWED_USERS` admits everyone. A set list admits
    /// only its parseable ids.
    #[must_use]
    pub fn is_allowed(&self, user_id: i64) -> bool {
        let configured = self
            .allowed_users_str
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty());
        !configured || self.allowed_users().contains(&user_id)
    }
}

/// Maximum retry attempts for Telegram API calls.
pub const TELEGRAM_API_MAX_RETRIES: usize = 3;
/// Initial backoff between Telegram API retries, in milliseconds.
pub const TELEGRAM_API_INITIAL_BACKOFF_MS: u64 = 500;
/// Upper bound on the backoff between retries, in milliseconds.
pub const TELEGRAM_API_MAX_BACKOFF_MS: u64 = 4_000;

#[cfg(test)]
mod tests {
    use super::TelegramSettings;

    #[test]
    fn test_list_parsing() {
        let mut settings = TelegramSettings {
            telegram_token: "dummy".to_string(),
            bot_token: None,
            allowed_users_str: None,
        };

        // Test comma
        settings.allowed_users_str = Some("123,456".to_string());
        let allowed = settings.allowed_users();
        assert!(allowed.contains(&123));
        assert!(allowed.contains(&456));
        assert_eq!(allowed.len(), 2);

        // Test semicolon and mixed
        settings.allowed_users_str = Some("333; 444, 555".to_string());
        let allowed = settings.allowed_users();
        assert_eq!(allowed.len(), 3);

        // Test empty/bad parsing
        settings.allowed_users_str = Some("abc, 777".to_string());
        let allowed = settings.allowed_users();
        assert!(allowed.contains(&777));
        assert_eq!(allowed.len(), 1);
    }

    #[test]
    fn test_open_access_without_list() {
        let mut settings = TelegramSettings::default();
        assert!(settings.is_allowed(42));

        settings.allowed_users_str = Some("1 2".to_string());
        assert!(settings.is_allowed(2));
        assert!(!settings.is_allowed(42));

        settings.allowed_users_str = Some("  ".to_string());
        assert!(settings.is_allowed(42));

        // A list with no valid ids admits nobody
        settings.allowed_users_str = Some("nobody".to_string());
        assert!(!settings.is_allowed(42));
    }
}
