//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Payment link base must be an http(s) URL")]
    InvalidPaymentLinkBase,

    #[error("Telegram bot token has invalid format")]
    InvalidBotToken,

    #[error("Operator id must be a positive account id")]
    InvalidOperatorId,

    #[error("Coupon pool size must be at least 1")]
    InvalidPoolSize,

    #[error("Coupon TTL must be positive")]
    InvalidCouponTtl,

    #[error("Invite issuance timeout must be positive")]
    InvalidInviteTimeout,
}
