//! Payment-link construction and correlation-token parsing.
//!
//! The account id rides along in the payment link's `tx_ref` query
//! parameter as `<prefix><accountId>`. The webhook verifier parses the
//! same token back out, so both directions live here.

use crate::domain::foundation::{AccountId, ValidationError};

/// Builds hosted payment links carrying the account correlation token.
#[derive(Debug, Clone)]
pub struct PaymentLinkBuilder {
    base_url: String,
    tx_ref_prefix: String,
}

impl PaymentLinkBuilder {
    pub fn new(base_url: impl Into<String>, tx_ref_prefix: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            tx_ref_prefix: tx_ref_prefix.into(),
        }
    }

    /// The correlation token for an account, e.g. `tg_12345`.
    pub fn correlation_token(&self, account: AccountId) -> String {
        format!("{}{}", self.tx_ref_prefix, account)
    }

    /// The full hosted payment link for an account.
    pub fn link_for(&self, account: AccountId) -> String {
        format!(
            "{}?tx_ref={}",
            self.base_url,
            self.correlation_token(account)
        )
    }
}

/// Parses a correlation token back into an account id.
///
/// The token must carry the expected prefix and a plausible (positive
/// integer) account id; anything else is rejected rather than trusted.
pub fn parse_correlation_token(
    token: &str,
    prefix: &str,
) -> Result<AccountId, ValidationError> {
    let raw = token.strip_prefix(prefix).ok_or_else(|| {
        ValidationError::invalid_format(
            "tx_ref",
            format!("expected prefix '{}', got '{}'", prefix, token),
        )
    })?;
    raw.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> PaymentLinkBuilder {
        PaymentLinkBuilder::new("https://sandbox.flutterwave.com/pay/oryrdela2fvy", "tg_")
    }

    #[test]
    fn link_embeds_correlation_token() {
        let account = AccountId::new(12345).unwrap();
        assert_eq!(
            builder().link_for(account),
            "https://sandbox.flutterwave.com/pay/oryrdela2fvy?tx_ref=tg_12345"
        );
    }

    #[test]
    fn token_roundtrips_through_parse() {
        let account = AccountId::new(12345).unwrap();
        let token = builder().correlation_token(account);

        assert_eq!(parse_correlation_token(&token, "tg_").unwrap(), account);
    }

    #[test]
    fn parse_rejects_wrong_prefix() {
        assert!(parse_correlation_token("order_12345", "tg_").is_err());
    }

    #[test]
    fn parse_rejects_non_numeric_id() {
        assert!(parse_correlation_token("tg_abc", "tg_").is_err());
    }

    #[test]
    fn parse_rejects_implausible_id() {
        assert!(parse_correlation_token("tg_0", "tg_").is_err());
        assert!(parse_correlation_token("tg_-5", "tg_").is_err());
    }
}
