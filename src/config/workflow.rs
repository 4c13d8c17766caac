//! Workflow tuning configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Workflow tuning (coupon pool, referral bonuses, issuance deadline)
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowConfig {
    /// Maximum live coupons at any instant
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,

    /// Coupon lifetime in seconds
    #[serde(default = "default_coupon_ttl_secs")]
    pub coupon_ttl_secs: u64,

    /// Referral bonus when the referred account used a coupon, minor units
    #[serde(default = "default_coupon_bonus_minor")]
    pub coupon_bonus_minor: i64,

    /// Referral bonus for a full-price referred account, minor units
    #[serde(default = "default_full_bonus_minor")]
    pub full_bonus_minor: i64,

    /// Deadline for invite issuance before it counts as a partial failure
    #[serde(default = "default_invite_timeout_secs")]
    pub invite_timeout_secs: u64,
}

impl WorkflowConfig {
    /// Validate workflow configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.pool_size == 0 {
            return Err(ValidationError::InvalidPoolSize);
        }
        if self.coupon_ttl_secs == 0 {
            return Err(ValidationError::InvalidCouponTtl);
        }
        if self.invite_timeout_secs == 0 {
            return Err(ValidationError::InvalidInviteTimeout);
        }
        Ok(())
    }
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            pool_size: default_pool_size(),
            coupon_ttl_secs: default_coupon_ttl_secs(),
            coupon_bonus_minor: default_coupon_bonus_minor(),
            full_bonus_minor: default_full_bonus_minor(),
            invite_timeout_secs: default_invite_timeout_secs(),
        }
    }
}

fn default_pool_size() -> u32 {
    10
}

fn default_coupon_ttl_secs() -> u64 {
    86_400
}

fn default_coupon_bonus_minor() -> i64 {
    50_000
}

fn default_full_bonus_minor() -> i64 {
    100_000
}

fn default_invite_timeout_secs() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(WorkflowConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_pool_size_fails() {
        let config = WorkflowConfig {
            pool_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_coupon_ttl_fails() {
        let config = WorkflowConfig {
            coupon_ttl_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
