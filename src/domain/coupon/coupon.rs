//! Discount coupon drawn from a capacity-bounded pool.
//!
//! A coupon is live while it is neither consumed nor past its expiry.
//! Expiry is evaluated lazily: whoever reads an expired, unconsumed
//! coupon frees it, returning its capacity to the pool. There is no
//! background sweep.

use crate::domain::foundation::{AccountId, Timestamp};
use serde::{Deserialize, Serialize};

/// A time-bounded discount coupon owned by exactly one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coupon {
    /// Globally unique code, derived from the owner's account id.
    pub code: String,

    /// Account this coupon belongs to.
    pub owner: AccountId,

    /// Instant after which the coupon no longer counts against the pool.
    pub expires_at: Timestamp,

    /// True once consumed at approval, or freed after expiry.
    pub consumed: bool,
}

impl Coupon {
    /// Mints a coupon for the given owner with the given lifetime.
    pub fn issue(owner: AccountId, issued_at: Timestamp, ttl_secs: u64) -> Self {
        Self {
            code: Self::code_for(owner),
            owner,
            expires_at: issued_at.plus_secs(ttl_secs),
            consumed: false,
        }
    }

    /// Deterministic coupon code for an account.
    ///
    /// Account ids are globally unique, so codes are too.
    pub fn code_for(owner: AccountId) -> String {
        format!("GG-{}", owner)
    }

    /// True if the coupon's lifetime has elapsed.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now.is_after(&self.expires_at)
    }

    /// True if the coupon still counts against pool capacity.
    pub fn is_live(&self, now: Timestamp) -> bool {
        !self.consumed && !self.is_expired(now)
    }

    /// Marks the coupon consumed (used at approval or freed on expiry).
    pub fn mark_consumed(&mut self) {
        self.consumed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> AccountId {
        AccountId::new(12345).unwrap()
    }

    #[test]
    fn code_is_derived_from_owner_id() {
        let coupon = Coupon::issue(owner(), Timestamp::from_unix_secs(1000), 3600);
        assert_eq!(coupon.code, "GG-12345");
        assert_eq!(Coupon::code_for(owner()), coupon.code);
    }

    #[test]
    fn fresh_coupon_is_live() {
        let issued = Timestamp::from_unix_secs(1000);
        let coupon = Coupon::issue(owner(), issued, 3600);

        assert!(coupon.is_live(issued.plus_secs(10)));
        assert!(!coupon.is_expired(issued.plus_secs(10)));
    }

    #[test]
    fn coupon_expires_after_ttl() {
        let issued = Timestamp::from_unix_secs(1000);
        let coupon = Coupon::issue(owner(), issued, 3600);

        let after_expiry = issued.plus_secs(3601);
        assert!(coupon.is_expired(after_expiry));
        assert!(!coupon.is_live(after_expiry));
    }

    #[test]
    fn coupon_live_exactly_at_expiry_boundary() {
        let issued = Timestamp::from_unix_secs(1000);
        let coupon = Coupon::issue(owner(), issued, 3600);

        // Not yet strictly after expires_at.
        assert!(coupon.is_live(issued.plus_secs(3600)));
    }

    #[test]
    fn consumed_coupon_is_not_live() {
        let issued = Timestamp::from_unix_secs(1000);
        let mut coupon = Coupon::issue(owner(), issued, 3600);

        coupon.mark_consumed();

        assert!(!coupon.is_live(issued.plus_secs(10)));
    }
}
