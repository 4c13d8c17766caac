//! Normalized payment events produced by the verifier.

use crate::domain::foundation::AccountId;
use serde::{Deserialize, Serialize};

/// A verified, terminal payment confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentConfirmed {
    /// Account the payment was made for, recovered from the
    /// correlation token embedded at payment-link creation time.
    pub account: AccountId,

    /// The provider's transaction reference.
    pub external_ref: String,
}

/// Outcome of verifying a webhook delivery.
///
/// Deliveries that authenticate but describe a non-terminal or
/// unrelated payment lifecycle stage are dropped silently - they are
/// acknowledged, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// A successful payment for a known account.
    Confirmed(PaymentConfirmed),

    /// Authentic but not a terminal success event.
    Ignored,
}
