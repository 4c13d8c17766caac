//! Payment provider configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use super::error::ValidationError;

/// Payment provider configuration (webhook verification, payment link)
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Shared secret for webhook signature verification
    pub webhook_secret: Secret<String>,

    /// Hosted payment page the correlation token is appended to
    pub link_base_url: String,

    /// Prefix of the correlation token carried in tx_ref
    #[serde(default = "default_tx_ref_prefix")]
    pub tx_ref_prefix: String,
}

impl PaymentConfig {
    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.webhook_secret.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__WEBHOOK_SECRET"));
        }
        if !self.link_base_url.starts_with("http://") && !self.link_base_url.starts_with("https://")
        {
            return Err(ValidationError::InvalidPaymentLinkBase);
        }
        if self.tx_ref_prefix.is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__TX_REF_PREFIX"));
        }
        Ok(())
    }
}

fn default_tx_ref_prefix() -> String {
    "tg_".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PaymentConfig {
        PaymentConfig {
            webhook_secret: Secret::new("flw_secret_xxx".to_string()),
            link_base_url: "https://sandbox.flutterwave.com/pay/oryrdela2fvy".to_string(),
            tx_ref_prefix: default_tx_ref_prefix(),
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn empty_secret_fails() {
        let mut config = config();
        config.webhook_secret = Secret::new(String::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_http_link_base_fails() {
        let mut config = config();
        config.link_base_url = "ftp://example.com/pay".to_string();
        assert!(config.validate().is_err());
    }
}
