//! Coupon repository port.

use async_trait::async_trait;

use crate::domain::coupon::Coupon;
use crate::domain::foundation::{AccountId, DomainError, Timestamp};

/// Repository interface for coupon persistence.
#[async_trait]
pub trait CouponRepository: Send + Sync {
    /// Persists a freshly issued coupon.
    async fn save(&self, coupon: &Coupon) -> Result<(), DomainError>;

    /// Finds the coupon owned by an account, expired or not.
    async fn find_by_owner(&self, owner: AccountId) -> Result<Option<Coupon>, DomainError>;

    /// Persists changes to an existing coupon.
    async fn update(&self, coupon: &Coupon) -> Result<(), DomainError>;

    /// Counts coupons that are live at `now` (unexpired and not
    /// consumed). Expired coupons do not count against capacity.
    async fn count_live(&self, now: Timestamp) -> Result<u32, DomainError>;

    /// Returns every stored coupon.
    async fn list_all(&self) -> Result<Vec<Coupon>, DomainError>;
}
