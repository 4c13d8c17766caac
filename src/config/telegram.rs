//! Telegram configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use super::error::ValidationError;

/// Telegram configuration (bot credentials, group, operator)
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    /// Bot API token
    pub bot_token: Secret<String>,

    /// Identifier of the restricted group. Supergroup ids are negative.
    pub group_id: i64,

    /// Account id of the single operator allowed admin commands
    pub operator_id: i64,

    /// Lifetime of minted invite links in seconds; unset = unbounded
    #[serde(default)]
    pub invite_link_ttl_secs: Option<u64>,
}

impl TelegramConfig {
    /// Validate telegram configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let token = self.bot_token.expose_secret();
        if token.is_empty() {
            return Err(ValidationError::MissingRequired("TELEGRAM__BOT_TOKEN"));
        }
        // Bot tokens look like "<bot_id>:<secret>".
        if !token.contains(':') {
            return Err(ValidationError::InvalidBotToken);
        }
        if self.operator_id <= 0 {
            return Err(ValidationError::InvalidOperatorId);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> TelegramConfig {
        TelegramConfig {
            bot_token: Secret::new("123456:ABC-DEF".to_string()),
            group_id: -1003184123814,
            operator_id: 777000,
            invite_link_ttl_secs: None,
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn token_without_colon_fails() {
        let mut config = config();
        config.bot_token = Secret::new("not-a-token".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_positive_operator_fails() {
        let mut config = config();
        config.operator_id = 0;
        assert!(config.validate().is_err());
    }
}
