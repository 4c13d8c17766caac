//! In-memory coupon repository.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::coupon::Coupon;
use crate::domain::foundation::{AccountId, DomainError, ErrorCode, Timestamp};
use crate::ports::CouponRepository;

/// Coupon storage keyed by owner; each account holds at most one.
#[derive(Default)]
pub struct InMemoryCouponRepository {
    coupons: RwLock<HashMap<AccountId, Coupon>>,
}

impl InMemoryCouponRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CouponRepository for InMemoryCouponRepository {
    async fn save(&self, coupon: &Coupon) -> Result<(), DomainError> {
        let mut coupons = self.coupons.write().await;
        coupons.insert(coupon.owner, coupon.clone());
        Ok(())
    }

    async fn find_by_owner(&self, owner: AccountId) -> Result<Option<Coupon>, DomainError> {
        let coupons = self.coupons.read().await;
        Ok(coupons.get(&owner).cloned())
    }

    async fn update(&self, coupon: &Coupon) -> Result<(), DomainError> {
        let mut coupons = self.coupons.write().await;
        if !coupons.contains_key(&coupon.owner) {
            return Err(DomainError::new(
                ErrorCode::CouponNotFound,
                format!("No coupon for account {}", coupon.owner),
            ));
        }
        coupons.insert(coupon.owner, coupon.clone());
        Ok(())
    }

    async fn count_live(&self, now: Timestamp) -> Result<u32, DomainError> {
        let coupons = self.coupons.read().await;
        Ok(coupons.values().filter(|c| c.is_live(now)).count() as u32)
    }

    async fn list_all(&self) -> Result<Vec<Coupon>, DomainError> {
        let coupons = self.coupons.read().await;
        Ok(coupons.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner(id: i64) -> AccountId {
        AccountId::new(id).unwrap()
    }

    #[tokio::test]
    async fn save_and_find_by_owner() {
        let repo = InMemoryCouponRepository::new();
        let coupon = Coupon::issue(owner(1), Timestamp::from_unix_secs(1000), 3600);

        repo.save(&coupon).await.unwrap();

        let found = repo.find_by_owner(owner(1)).await.unwrap();
        assert_eq!(found, Some(coupon));
    }

    #[tokio::test]
    async fn count_live_excludes_expired_and_consumed() {
        let repo = InMemoryCouponRepository::new();
        let issued = Timestamp::from_unix_secs(1000);

        repo.save(&Coupon::issue(owner(1), issued, 3600)).await.unwrap();
        repo.save(&Coupon::issue(owner(2), issued, 60)).await.unwrap();
        let mut consumed = Coupon::issue(owner(3), issued, 3600);
        consumed.mark_consumed();
        repo.save(&consumed).await.unwrap();

        let live = repo.count_live(issued.plus_secs(120)).await.unwrap();
        assert_eq!(live, 1);
    }

    #[tokio::test]
    async fn update_missing_coupon_fails() {
        let repo = InMemoryCouponRepository::new();
        let coupon = Coupon::issue(owner(1), Timestamp::now(), 3600);

        assert!(repo.update(&coupon).await.is_err());
    }
}
