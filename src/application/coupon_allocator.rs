//! Capacity-bounded coupon allocation.
//!
//! At most `pool_size` coupons are live at any instant. Expiry is
//! lazy: whoever reads an expired, unconsumed coupon frees it, and the
//! freed slot is immediately reusable. All capacity checks run under a
//! single pool gate so concurrent claims cannot overshoot the bound.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::domain::coupon::Coupon;
use crate::domain::foundation::{AccountId, DomainError, Timestamp};
use crate::ports::CouponRepository;

/// Snapshot of pool occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    pub capacity: u32,
    pub live: u32,
    pub available: u32,
}

/// Errors from coupon allocation.
#[derive(Debug, Error)]
pub enum CouponError {
    /// Every slot is occupied by a live coupon.
    #[error("Coupon pool exhausted ({capacity} live)")]
    PoolExhausted { capacity: u32 },

    #[error(transparent)]
    Storage(#[from] DomainError),
}

/// Allocates coupons against a fixed-capacity pool.
pub struct CouponAllocator {
    coupons: Arc<dyn CouponRepository>,
    pool_size: u32,
    ttl_secs: u64,

    /// Serializes the check-then-issue sequence.
    pool_gate: Mutex<()>,
}

impl CouponAllocator {
    pub fn new(coupons: Arc<dyn CouponRepository>, pool_size: u32, ttl_secs: u64) -> Self {
        Self {
            coupons,
            pool_size,
            ttl_secs,
            pool_gate: Mutex::new(()),
        }
    }

    /// Issues a coupon to `owner` if the pool has a free slot.
    ///
    /// Re-claiming while a live coupon exists returns that same coupon
    /// rather than spending a second slot. An expired, unconsumed
    /// coupon found on the way is freed first, so its slot can go to
    /// this claim.
    pub async fn try_issue(
        &self,
        owner: AccountId,
        now: Timestamp,
    ) -> Result<Coupon, CouponError> {
        let _gate = self.pool_gate.lock().await;

        if let Some(mut existing) = self.coupons.find_by_owner(owner).await? {
            if existing.is_live(now) {
                debug!(account = %owner, code = %existing.code, "returning existing live coupon");
                return Ok(existing);
            }
            if !existing.consumed {
                existing.mark_consumed();
                self.coupons.update(&existing).await?;
                debug!(account = %owner, code = %existing.code, "freed expired coupon");
            }
        }

        let live = self.coupons.count_live(now).await?;
        if live >= self.pool_size {
            info!(account = %owner, live, capacity = self.pool_size, "coupon pool exhausted");
            return Err(CouponError::PoolExhausted {
                capacity: self.pool_size,
            });
        }

        let coupon = Coupon::issue(owner, now, self.ttl_secs);
        self.coupons.save(&coupon).await?;
        info!(account = %owner, code = %coupon.code, "issued coupon");
        Ok(coupon)
    }

    /// Consumes the owner's live coupon, if one exists.
    ///
    /// Returns whether a coupon was actually consumed; an expired or
    /// absent coupon consumes nothing.
    pub async fn mark_consumed(
        &self,
        owner: AccountId,
        now: Timestamp,
    ) -> Result<bool, CouponError> {
        let _gate = self.pool_gate.lock().await;

        let Some(mut coupon) = self.coupons.find_by_owner(owner).await? else {
            return Ok(false);
        };
        if !coupon.is_live(now) {
            if !coupon.consumed {
                // Expired but never freed; release the slot in passing.
                coupon.mark_consumed();
                self.coupons.update(&coupon).await?;
            }
            return Ok(false);
        }

        coupon.mark_consumed();
        self.coupons.update(&coupon).await?;
        debug!(account = %owner, code = %coupon.code, "consumed coupon");
        Ok(true)
    }

    /// Reports pool occupancy, sweeping any expired coupons it finds.
    pub async fn pool_stats(&self, now: Timestamp) -> Result<PoolStats, CouponError> {
        let _gate = self.pool_gate.lock().await;

        let mut live = 0u32;
        for mut coupon in self.coupons.list_all().await? {
            if coupon.is_live(now) {
                live += 1;
            } else if !coupon.consumed {
                coupon.mark_consumed();
                self.coupons.update(&coupon).await?;
            }
        }

        Ok(PoolStats {
            capacity: self.pool_size,
            live,
            available: self.pool_size.saturating_sub(live),
        })
    }
}
