//! Account domain events.
//!
//! Emitted by the grant workflow alongside its outcome so a
//! notification boundary can tell the payer (and the operator) what
//! happened without the workflow knowing about messaging.
//!
//! Events are named in past tense: something that has already happened.

use crate::domain::foundation::{AccountId, Amount, Timestamp};
use serde::{Deserialize, Serialize};

use super::DecisionSource;

/// Events that occur during the account payment lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountEvent {
    /// The payment was confirmed and the account approved.
    Approved {
        account: AccountId,
        source: DecisionSource,
        occurred_at: Timestamp,
    },

    /// The payment was rejected after operator review.
    Rejected {
        account: AccountId,
        occurred_at: Timestamp,
    },

    /// The account's coupon was consumed at approval.
    CouponConsumed {
        account: AccountId,
        code: String,
        occurred_at: Timestamp,
    },

    /// A referral bonus was credited to the referrer's wallet.
    ReferralCredited {
        referrer: AccountId,
        referred: AccountId,
        amount: Amount,
        occurred_at: Timestamp,
    },

    /// A single-use invite credential was minted for the account.
    InviteIssued {
        account: AccountId,
        link: String,
        occurred_at: Timestamp,
    },
}

impl AccountEvent {
    /// Returns the event type string for routing and filtering.
    pub fn event_type(&self) -> &'static str {
        match self {
            AccountEvent::Approved { .. } => "account.approved",
            AccountEvent::Rejected { .. } => "account.rejected",
            AccountEvent::CouponConsumed { .. } => "account.coupon_consumed",
            AccountEvent::ReferralCredited { .. } => "account.referral_credited",
            AccountEvent::InviteIssued { .. } => "account.invite_issued",
        }
    }

    /// Returns the account the event is primarily about.
    pub fn account(&self) -> AccountId {
        match self {
            AccountEvent::Approved { account, .. }
            | AccountEvent::Rejected { account, .. }
            | AccountEvent::CouponConsumed { account, .. }
            | AccountEvent::InviteIssued { account, .. } => *account,
            AccountEvent::ReferralCredited { referrer, .. } => *referrer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account_id(id: i64) -> AccountId {
        AccountId::new(id).unwrap()
    }

    #[test]
    fn event_types_are_namespaced() {
        let events = vec![
            AccountEvent::Approved {
                account: account_id(1),
                source: DecisionSource::AdminCommand,
                occurred_at: Timestamp::now(),
            },
            AccountEvent::Rejected {
                account: account_id(1),
                occurred_at: Timestamp::now(),
            },
            AccountEvent::InviteIssued {
                account: account_id(1),
                link: "https://t.me/+abc".to_string(),
                occurred_at: Timestamp::now(),
            },
        ];

        for event in events {
            assert!(event.event_type().starts_with("account."));
        }
    }

    #[test]
    fn referral_credited_points_at_referrer() {
        let event = AccountEvent::ReferralCredited {
            referrer: account_id(9),
            referred: account_id(1),
            amount: Amount::from_minor(100_000).unwrap(),
            occurred_at: Timestamp::now(),
        };

        assert_eq!(event.account(), account_id(9));
    }

    #[test]
    fn events_round_trip_through_json() {
        let event = AccountEvent::Approved {
            account: account_id(12345),
            source: DecisionSource::Webhook {
                external_ref: "8812734".to_string(),
            },
            occurred_at: Timestamp::now(),
        };

        let json = serde_json::to_string(&event).unwrap();
        let restored: AccountEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, restored);
    }
}
