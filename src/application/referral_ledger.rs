//! Referral bonus crediting.
//!
//! A referrer earns a one-time bonus when someone they referred gets
//! approved. The bonus tier depends on whether the approved account
//! paid with a coupon. The caller must hold the referrer's account
//! lock while crediting, so the wallet read-modify-write here cannot
//! interleave with a withdrawal debiting the same wallet.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::account::Account;
use crate::domain::foundation::{AccountId, Amount, DomainError};
use crate::ports::AccountRepository;

/// Record of a bonus credited to a referrer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferralCredit {
    pub referrer: AccountId,
    pub amount: Amount,
}

/// Credits referral bonuses exactly once per referred account.
pub struct ReferralLedger {
    accounts: Arc<dyn AccountRepository>,

    /// Bonus when the referred account paid with a coupon discount.
    coupon_tier_bonus: Amount,

    /// Bonus when the referred account paid full price.
    full_tier_bonus: Amount,
}

impl ReferralLedger {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        coupon_tier_bonus: Amount,
        full_tier_bonus: Amount,
    ) -> Self {
        Self {
            accounts,
            coupon_tier_bonus,
            full_tier_bonus,
        }
    }

    /// Fires the referral bonus for a freshly approved account.
    ///
    /// Marks `account.referral_bonus_fired` so the caller persists the
    /// marker in the same durable step as the approval; a retried
    /// approval then skips the credit entirely. Returns what was
    /// credited, or `None` when no bonus applies.
    ///
    /// The caller must hold the referrer's account lock; the grant
    /// workflow acquires it alongside the payer's before approving.
    pub async fn on_approved(
        &self,
        account: &mut Account,
    ) -> Result<Option<ReferralCredit>, DomainError> {
        let Some(referrer_id) = account.referred_by else {
            return Ok(None);
        };
        if account.referral_bonus_fired {
            return Ok(None);
        }

        let amount = if account.used_coupon {
            self.coupon_tier_bonus
        } else {
            self.full_tier_bonus
        };

        // The referrer may not have a record yet if they were never a
        // payer themselves.
        match self.accounts.find_by_id(referrer_id).await? {
            Some(mut referrer) => {
                referrer.credit(amount);
                self.accounts.update(&referrer).await?;
            }
            None => {
                let mut referrer = Account::new(referrer_id);
                referrer.credit(amount);
                self.accounts.save(&referrer).await?;
                warn!(referrer = %referrer_id, "created wallet record for unseen referrer");
            }
        }

        account.mark_referral_fired();
        info!(
            referrer = %referrer_id,
            referred = %account.id,
            amount = %amount,
            "credited referral bonus"
        );

        Ok(Some(ReferralCredit {
            referrer: referrer_id,
            amount,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryAccountRepository;

    fn account_id(id: i64) -> AccountId {
        AccountId::new(id).unwrap()
    }

    fn amount(minor: i64) -> Amount {
        Amount::from_minor(minor).unwrap()
    }

    fn ledger(repo: Arc<InMemoryAccountRepository>) -> ReferralLedger {
        ReferralLedger::new(repo, amount(50_000), amount(100_000))
    }

    #[tokio::test]
    async fn credits_full_tier_for_full_price_approval() {
        let repo = Arc::new(InMemoryAccountRepository::new());
        let referrer = Account::new(account_id(1));
        repo.save(&referrer).await.unwrap();
        let ledger = ledger(repo.clone());

        let mut referred = Account::with_referrer(account_id(2), account_id(1));
        let credit = ledger.on_approved(&mut referred).await.unwrap();

        assert_eq!(
            credit,
            Some(ReferralCredit {
                referrer: account_id(1),
                amount: amount(100_000)
            })
        );
        assert!(referred.referral_bonus_fired);

        let stored = repo.find_by_id(account_id(1)).await.unwrap().unwrap();
        assert_eq!(stored.wallet_balance, amount(100_000));
    }

    #[tokio::test]
    async fn credits_coupon_tier_when_coupon_was_used() {
        let repo = Arc::new(InMemoryAccountRepository::new());
        repo.save(&Account::new(account_id(1))).await.unwrap();
        let ledger = ledger(repo.clone());

        let mut referred = Account::with_referrer(account_id(2), account_id(1));
        referred.mark_coupon_used();

        let credit = ledger.on_approved(&mut referred).await.unwrap().unwrap();
        assert_eq!(credit.amount, amount(50_000));
    }

    #[tokio::test]
    async fn fires_at_most_once() {
        let repo = Arc::new(InMemoryAccountRepository::new());
        repo.save(&Account::new(account_id(1))).await.unwrap();
        let ledger = ledger(repo.clone());

        let mut referred = Account::with_referrer(account_id(2), account_id(1));
        ledger.on_approved(&mut referred).await.unwrap();
        let second = ledger.on_approved(&mut referred).await.unwrap();

        assert_eq!(second, None);
        let stored = repo.find_by_id(account_id(1)).await.unwrap().unwrap();
        assert_eq!(stored.wallet_balance, amount(100_000));
    }

    #[tokio::test]
    async fn no_credit_without_referrer() {
        let repo = Arc::new(InMemoryAccountRepository::new());
        let ledger = ledger(repo);

        let mut account = Account::new(account_id(2));
        assert_eq!(ledger.on_approved(&mut account).await.unwrap(), None);
        assert!(!account.referral_bonus_fired);
    }

    #[tokio::test]
    async fn creates_record_for_unseen_referrer() {
        let repo = Arc::new(InMemoryAccountRepository::new());
        let ledger = ledger(repo.clone());

        let mut referred = Account::with_referrer(account_id(2), account_id(9));
        ledger.on_approved(&mut referred).await.unwrap();

        let referrer = repo.find_by_id(account_id(9)).await.unwrap().unwrap();
        assert_eq!(referrer.wallet_balance, amount(100_000));
    }

    #[tokio::test]
    async fn mutual_referrals_both_get_credited() {
        let repo = Arc::new(InMemoryAccountRepository::new());
        let mut a = Account::with_referrer(account_id(1), account_id(2));
        let b = Account::with_referrer(account_id(2), account_id(1));
        repo.save(&a).await.unwrap();
        repo.save(&b).await.unwrap();
        let ledger = ledger(repo.clone());

        ledger.on_approved(&mut a).await.unwrap();
        repo.update(&a).await.unwrap();
        // B's wallet was just credited; reload before B's own approval.
        let mut b = repo.find_by_id(account_id(2)).await.unwrap().unwrap();
        ledger.on_approved(&mut b).await.unwrap();
        repo.update(&b).await.unwrap();

        let a_stored = repo.find_by_id(account_id(1)).await.unwrap().unwrap();
        let b_stored = repo.find_by_id(account_id(2)).await.unwrap().unwrap();
        assert_eq!(a_stored.wallet_balance, amount(100_000));
        assert_eq!(b_stored.wallet_balance, amount(100_000));
    }
}
